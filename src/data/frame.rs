//! Tabular panel container for target and exogenous data.
//!
//! Purpose
//! -------
//! Provide the single validated container through which tabular data enters
//! the effect framework. A [`PanelFrame`] holds one or more identified series
//! over a shared, strictly increasing time index, with named columns stacked
//! into a dense `(series, time, features)` value block. Single-series data is
//! the `series == 1` case of the same container, so every downstream consumer
//! handles one layout.
//!
//! Key behaviors
//! -------------
//! - [`PanelFrame::new`] enforces the container invariants (unique non-empty
//!   series ids and column names free of `'/'`, strictly increasing index,
//!   dimension agreement, finite values).
//! - [`PanelFrame::select`] subsets columns in the order given; the
//!   broadcasting engine passes selector match order through it.
//! - [`PanelFrame::filter_index`] restricts rows to a forecast horizon,
//!   failing on any horizon timestamp absent from the index.
//! - [`PanelFrame::series_frame`] extracts one series as a single-series
//!   frame for per-series broadcasting.
//!
//! Invariants & assumptions
//! ------------------------
//! - `series_ids` is non-empty, with unique, non-empty identifiers; the order
//!   is first-appearance order and is the broadcast order.
//! - `index` is non-empty and strictly increasing; all series share it.
//! - `columns` may be empty (an effect that needs no exogenous input still
//!   receives the index through a zero-column frame); names are unique and
//!   non-empty.
//! - Series identifiers and column names never contain `'/'`: both feed the
//!   `effect/series/column` sampling-site paths, and a `'/'` inside one
//!   segment could alias two replicas onto one site.
//! - `values` has shape `(series_ids.len(), index.len(), columns.len())` and
//!   contains only finite values.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no logging; all diagnostics travel in
//!   [`DataError`] values.
//! - Fields are public; consumers rely on the construction-time invariants
//!   and must not mutate frames in place.
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction (happy path and each rejection), column
//!   selection order, horizon filtering, and series extraction.
use crate::data::{
    errors::{DataError, DataResult},
    horizon::{ForecastHorizon, Timestamp},
};
use ndarray::{Array2, Array3, Axis};

/// `PanelFrame` — validated panel of named series over a shared time index.
///
/// Purpose
/// -------
/// Represent target or exogenous data for any number of series in one dense,
/// validated block. The effect framework routes, selects, filters, and slices
/// frames; effects receive them already prepared.
///
/// Fields
/// ------
/// - `series_ids`: `Vec<String>`
///   Unique series identifiers in first-appearance order (the broadcast
///   order).
/// - `index`: `Vec<Timestamp>`
///   Shared strictly increasing time index.
/// - `columns`: `Vec<String>`
///   Unique column names; may be empty.
/// - `values`: `Array3<f64>`
///   Dense block shaped `(series, time, features)`, all values finite.
///
/// Invariants
/// ----------
/// - `values.dim() == (series_ids.len(), index.len(), columns.len())`.
/// - `series_ids.len() >= 1` and `index.len() >= 1`.
/// - All entries in `values` are finite.
///
/// Performance
/// -----------
/// - Validation is a single O(series × time × features) scan at construction.
/// - `select`, `filter_index`, and `series_frame` copy the requested portion
///   of the block; frames are otherwise plain data with no hidden state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    /// Unique series identifiers in first-appearance order.
    pub series_ids: Vec<String>,
    /// Shared strictly increasing time index.
    pub index: Vec<Timestamp>,
    /// Unique column names; may be empty.
    pub columns: Vec<String>,
    /// Dense value block shaped `(series, time, features)`.
    pub values: Array3<f64>,
}

impl PanelFrame {
    /// Construct a validated panel frame.
    ///
    /// Parameters
    /// ----------
    /// - `series_ids`: `Vec<String>`
    ///   Series identifiers; must be unique, non-empty, and `'/'`-free, in
    ///   the order the series should broadcast.
    /// - `index`: `Vec<Timestamp>`
    ///   Shared time index; must be non-empty and strictly increasing.
    /// - `columns`: `Vec<String>`
    ///   Column names; must be unique, non-empty, `'/'`-free strings, but
    ///   the list itself may be empty.
    /// - `values`: `Array3<f64>`
    ///   Dense block shaped `(series, time, features)`; every value must be
    ///   finite.
    ///
    /// Returns
    /// -------
    /// `DataResult<PanelFrame>`
    ///   - `Ok(PanelFrame)` if all invariants are satisfied.
    ///   - `Err(DataError)` naming the first violation otherwise.
    ///
    /// Errors
    /// ------
    /// - `DataError::EmptyFrame` when there are no series or no time points.
    /// - `DataError::EmptySeriesId` / `DataError::DuplicateSeries` /
    ///   `DataError::SeparatorInSeriesId` for invalid identifiers.
    /// - `DataError::UnsortedIndex` at the first non-increasing position.
    /// - `DataError::EmptyColumnName` / `DataError::DuplicateColumn` /
    ///   `DataError::SeparatorInColumnName` for invalid column names.
    /// - `DataError::DimensionMismatch` when `values` disagrees with the
    ///   declared layout (axis named `"series"`, `"time"`, or `"features"`).
    /// - `DataError::NonFiniteValue` at the first NaN/±inf entry.
    ///
    /// Panics
    /// ------
    /// - Never panics. All invalid inputs are reported via `DataError`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::Array3;
    /// # use ts_effects::data::frame::PanelFrame;
    /// let frame = PanelFrame::new(
    ///     vec!["store_a".into(), "store_b".into()],
    ///     vec![0, 1, 2],
    ///     vec!["price".into()],
    ///     Array3::zeros((2, 3, 1)),
    /// )
    /// .unwrap();
    /// assert_eq!(frame.series_count(), 2);
    /// assert_eq!(frame.len(), 3);
    /// ```
    pub fn new(
        series_ids: Vec<String>, index: Vec<Timestamp>, columns: Vec<String>, values: Array3<f64>,
    ) -> DataResult<Self> {
        if series_ids.is_empty() || index.is_empty() {
            return Err(DataError::EmptyFrame);
        }

        for (position, id) in series_ids.iter().enumerate() {
            if id.is_empty() {
                return Err(DataError::EmptySeriesId { position });
            }
            if id.contains('/') {
                return Err(DataError::SeparatorInSeriesId { id: id.clone() });
            }
            if series_ids[..position].contains(id) {
                return Err(DataError::DuplicateSeries { id: id.clone() });
            }
        }

        for position in 1..index.len() {
            if index[position] <= index[position - 1] {
                return Err(DataError::UnsortedIndex { position });
            }
        }

        for (position, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(DataError::EmptyColumnName { position });
            }
            if name.contains('/') {
                return Err(DataError::SeparatorInColumnName { name: name.clone() });
            }
            if columns[..position].contains(name) {
                return Err(DataError::DuplicateColumn { name: name.clone() });
            }
        }

        let (n_series, n_time, n_features) = values.dim();
        if n_series != series_ids.len() {
            return Err(DataError::DimensionMismatch {
                axis: "series",
                expected: series_ids.len(),
                actual: n_series,
            });
        }
        if n_time != index.len() {
            return Err(DataError::DimensionMismatch {
                axis: "time",
                expected: index.len(),
                actual: n_time,
            });
        }
        if n_features != columns.len() {
            return Err(DataError::DimensionMismatch {
                axis: "features",
                expected: columns.len(),
                actual: n_features,
            });
        }

        for ((series, row, column), &value) in values.indexed_iter() {
            if !value.is_finite() {
                return Err(DataError::NonFiniteValue {
                    series: series_ids[series].clone(),
                    row,
                    column: columns[column].clone(),
                    value,
                });
            }
        }

        Ok(PanelFrame { series_ids, index, columns, values })
    }

    /// Construct a single-series frame from a `(time, features)` block.
    ///
    /// Equivalent to [`PanelFrame::new`] with one series; same validation and
    /// errors.
    pub fn single(
        series_id: impl Into<String>, index: Vec<Timestamp>, columns: Vec<String>,
        values: Array2<f64>,
    ) -> DataResult<Self> {
        PanelFrame::new(vec![series_id.into()], index, columns, values.insert_axis(Axis(0)))
    }

    /// Construct a frame with zero columns over the given series and index.
    ///
    /// Effects that route exogenous data but require none still receive the
    /// panel layout and time index through such a frame.
    pub fn empty(series_ids: Vec<String>, index: Vec<Timestamp>) -> DataResult<Self> {
        let values = Array3::zeros((series_ids.len(), index.len(), 0));
        PanelFrame::new(series_ids, index, Vec::new(), values)
    }

    /// Number of series in the panel.
    pub fn series_count(&self) -> usize {
        self.series_ids.len()
    }

    /// Number of time points in the shared index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false`; a validated frame has at least one time point.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns (the feature axis).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Position of `name` in the column list, if present.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    /// Subset columns by name, in the order given.
    ///
    /// The broadcasting engine passes selector match order through this
    /// method, so the result's column order is the match order. An empty
    /// `names` list yields a zero-column frame that keeps the index.
    ///
    /// # Errors
    /// - [`DataError::UnknownColumn`] when a requested name is absent.
    /// - [`DataError::DuplicateColumn`] when a name is requested twice.
    pub fn select(&self, names: &[String]) -> DataResult<PanelFrame> {
        let mut positions = Vec::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if names[..position].contains(name) {
                return Err(DataError::DuplicateColumn { name: name.clone() });
            }
            match self.column_position(name) {
                Some(found) => positions.push(found),
                None => return Err(DataError::UnknownColumn { name: name.clone() }),
            }
        }
        Ok(PanelFrame {
            series_ids: self.series_ids.clone(),
            index: self.index.clone(),
            columns: names.to_vec(),
            values: self.values.select(Axis(2), &positions),
        })
    }

    /// Restrict rows to the forecast horizon, in horizon order.
    ///
    /// # Errors
    /// - [`DataError::HorizonOutsideIndex`] naming the first horizon
    ///   timestamp absent from the frame index.
    pub fn filter_index(&self, horizon: &ForecastHorizon) -> DataResult<PanelFrame> {
        let mut positions = Vec::with_capacity(horizon.len());
        for &timestamp in horizon.timestamps() {
            match self.index.binary_search(&timestamp) {
                Ok(found) => positions.push(found),
                Err(_) => return Err(DataError::HorizonOutsideIndex { timestamp }),
            }
        }
        Ok(PanelFrame {
            series_ids: self.series_ids.clone(),
            index: horizon.timestamps().to_vec(),
            columns: self.columns.clone(),
            values: self.values.select(Axis(1), &positions),
        })
    }

    /// Extract one series as a single-series frame.
    ///
    /// # Errors
    /// - [`DataError::UnknownSeries`] when `id` is not in the panel.
    pub fn series_frame(&self, id: &str) -> DataResult<PanelFrame> {
        let position = self
            .series_ids
            .iter()
            .position(|series| series == id)
            .ok_or_else(|| DataError::UnknownSeries { id: id.to_string() })?;
        let block = self.values.index_axis(Axis(0), position).to_owned().insert_axis(Axis(0));
        Ok(PanelFrame {
            series_ids: vec![id.to_string()],
            index: self.index.clone(),
            columns: self.columns.clone(),
            values: block,
        })
    }

    /// Subset series by identifier, in the order given.
    ///
    /// Prediction passes use this to restrict the stored training target to
    /// the series actually requested, in the requested order.
    ///
    /// # Errors
    /// - [`DataError::EmptyFrame`] when `ids` is empty; a frame always holds
    ///   at least one series.
    /// - [`DataError::UnknownSeries`] when a requested identifier is absent.
    /// - [`DataError::DuplicateSeries`] when an identifier is requested
    ///   twice.
    pub fn select_series(&self, ids: &[String]) -> DataResult<PanelFrame> {
        if ids.is_empty() {
            return Err(DataError::EmptyFrame);
        }
        let mut positions = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            if ids[..position].contains(id) {
                return Err(DataError::DuplicateSeries { id: id.clone() });
            }
            match self.series_ids.iter().position(|series| series == id) {
                Some(found) => positions.push(found),
                None => return Err(DataError::UnknownSeries { id: id.clone() }),
            }
        }
        Ok(PanelFrame {
            series_ids: ids.to_vec(),
            index: self.index.clone(),
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), &positions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction behavior of `PanelFrame::new` (happy path and each
    //   rejected invariant).
    // - Column selection semantics (order, unknown names, empty selection).
    // - Horizon filtering (row subset, out-of-index timestamps).
    // - Single-series extraction and series subsetting.
    // -------------------------------------------------------------------------

    // Purpose
    // -------
    // Provide a small two-series, three-row, two-column frame whose values
    // encode their own coordinates for easy assertions.
    //
    // Given
    // -----
    // - Series "a" and "b", index [0, 1, 2], columns "x0" and "x1".
    // - Value at (series, row, column) is `100*series + 10*row + column`.
    //
    // Expect
    // ------
    // - A valid `PanelFrame` usable across tests.
    fn make_frame() -> PanelFrame {
        let values = Array3::from_shape_fn((2, 3, 2), |(series, row, column)| {
            (100 * series + 10 * row + column) as f64
        });
        PanelFrame::new(
            vec!["a".into(), "b".into()],
            vec![0, 1, 2],
            vec!["x0".into(), "x1".into()],
            values,
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that `PanelFrame::new` succeeds on valid input and preserves the
    // declared layout.
    //
    // Given
    // -----
    // - The coordinate-encoded frame from `make_frame`.
    //
    // Expect
    // ------
    // - Accessors report two series, three rows, two columns.
    fn new_returns_ok_for_valid_input() {
        let frame = make_frame();

        assert_eq!(frame.series_count(), 2);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.values[(1, 2, 1)], 121.0);
    }

    #[test]
    // Purpose
    // -------
    // Ensure each construction invariant is enforced with the matching error.
    //
    // Given
    // -----
    // - Variations of a valid frame breaking one invariant at a time.
    //
    // Expect
    // ------
    // - `EmptyFrame`, `DuplicateSeries`, `UnsortedIndex`,
    //   `DimensionMismatch`, and `NonFiniteValue` respectively.
    fn new_rejects_each_invariant_violation() {
        let no_series = PanelFrame::new(vec![], vec![0], vec![], Array3::zeros((0, 1, 0)));
        assert_eq!(no_series.unwrap_err(), DataError::EmptyFrame);

        let duplicate = PanelFrame::new(
            vec!["a".into(), "a".into()],
            vec![0],
            vec![],
            Array3::zeros((2, 1, 0)),
        );
        assert_eq!(duplicate.unwrap_err(), DataError::DuplicateSeries { id: "a".into() });

        let unsorted =
            PanelFrame::new(vec!["a".into()], vec![1, 1], vec![], Array3::zeros((1, 2, 0)));
        assert_eq!(unsorted.unwrap_err(), DataError::UnsortedIndex { position: 1 });

        let wrong_dim = PanelFrame::new(
            vec!["a".into()],
            vec![0, 1],
            vec!["x0".into()],
            Array3::zeros((1, 3, 1)),
        );
        assert_eq!(
            wrong_dim.unwrap_err(),
            DataError::DimensionMismatch { axis: "time", expected: 2, actual: 3 }
        );

        let non_finite = PanelFrame::new(
            vec!["a".into()],
            vec![0, 1],
            vec!["x0".into()],
            array![[[1.0], [f64::NAN]]],
        );
        assert!(matches!(
            non_finite.unwrap_err(),
            DataError::NonFiniteValue { row: 1, .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Ensure identifiers containing '/' are rejected at construction. Series
    // ids and column names become segments of '/'-delimited sampling-site
    // paths; a '/' inside a segment could alias two replicas onto one site,
    // e.g. series "x" with column "y/z" against series "x/y" with column "z".
    //
    // Given
    // -----
    // - A frame with series id "x/y" and a frame with column name "y/z".
    //
    // Expect
    // ------
    // - `SeparatorInSeriesId` and `SeparatorInColumnName` naming the
    //   offending identifier.
    fn new_rejects_identifiers_containing_the_scope_separator() {
        let scoped_series = PanelFrame::new(
            vec!["x".into(), "x/y".into()],
            vec![0],
            vec!["z".into()],
            Array3::zeros((2, 1, 1)),
        );
        let scoped_column = PanelFrame::new(
            vec!["x".into()],
            vec![0],
            vec!["y/z".into(), "z".into()],
            Array3::zeros((1, 1, 2)),
        );

        assert_eq!(
            scoped_series.unwrap_err(),
            DataError::SeparatorInSeriesId { id: "x/y".into() }
        );
        assert_eq!(
            scoped_column.unwrap_err(),
            DataError::SeparatorInColumnName { name: "y/z".into() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that `select` reorders columns to the requested order and that
    // an empty selection keeps the index with zero columns.
    //
    // Given
    // -----
    // - The coordinate-encoded frame; request `["x1", "x0"]` and `[]`.
    //
    // Expect
    // ------
    // - Reversed column order with values following the columns.
    // - The empty selection has width 0 but the full index.
    fn select_follows_requested_order_and_allows_empty() {
        let frame = make_frame();

        let reversed = frame.select(&["x1".to_string(), "x0".to_string()]).unwrap();
        let none = frame.select(&[]).unwrap();

        assert_eq!(reversed.columns, vec!["x1".to_string(), "x0".to_string()]);
        assert_eq!(reversed.values[(0, 0, 0)], 1.0);
        assert_eq!(reversed.values[(0, 0, 1)], 0.0);
        assert_eq!(none.width(), 0);
        assert_eq!(none.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Ensure `select` rejects unknown column names.
    //
    // Given
    // -----
    // - The coordinate-encoded frame; request a missing column.
    //
    // Expect
    // ------
    // - `DataError::UnknownColumn` naming the missing column.
    fn select_rejects_unknown_columns() {
        let frame = make_frame();

        let result = frame.select(&["x9".to_string()]);

        assert_eq!(result.unwrap_err(), DataError::UnknownColumn { name: "x9".into() });
    }

    #[test]
    // Purpose
    // -------
    // Verify horizon filtering keeps exactly the horizon rows, in horizon
    // order, and errors on timestamps outside the index.
    //
    // Given
    // -----
    // - The coordinate-encoded frame with index [0, 1, 2].
    // - Horizon [1, 2] and horizon [2, 3].
    //
    // Expect
    // ------
    // - Filtering to [1, 2] keeps rows 1 and 2 for every series.
    // - Filtering to [2, 3] fails with `HorizonOutsideIndex { timestamp: 3 }`.
    fn filter_index_keeps_horizon_rows_and_rejects_outsiders() {
        let frame = make_frame();
        let inside = ForecastHorizon::new(vec![1, 2]).unwrap();
        let outside = ForecastHorizon::new(vec![2, 3]).unwrap();

        let filtered = frame.filter_index(&inside).unwrap();
        let failed = frame.filter_index(&outside);

        assert_eq!(filtered.index, vec![1, 2]);
        assert_eq!(filtered.values[(0, 0, 0)], 10.0);
        assert_eq!(filtered.values[(1, 1, 1)], 121.0);
        assert_eq!(failed.unwrap_err(), DataError::HorizonOutsideIndex { timestamp: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Verify single-series extraction and the unknown-series error.
    //
    // Given
    // -----
    // - The coordinate-encoded frame; extract "b" and then "c".
    //
    // Expect
    // ------
    // - "b" comes back as a one-series frame holding the second slice.
    // - "c" fails with `UnknownSeries`.
    fn series_frame_extracts_one_series() {
        let frame = make_frame();

        let second = frame.series_frame("b").unwrap();
        let missing = frame.series_frame("c");

        assert_eq!(second.series_ids, vec!["b".to_string()]);
        assert_eq!(second.series_count(), 1);
        assert_eq!(second.values[(0, 0, 0)], 100.0);
        assert_eq!(missing.unwrap_err(), DataError::UnknownSeries { id: "c".into() });
    }

    #[test]
    // Purpose
    // -------
    // Verify that `select_series` follows the requested order and rejects an
    // empty or unknown request.
    //
    // Given
    // -----
    // - The coordinate-encoded frame; request `["b", "a"]`, `[]`, and
    //   `["c"]`.
    //
    // Expect
    // ------
    // - Reversed series order with values following the series.
    // - `EmptyFrame` for the empty request, `UnknownSeries` for "c".
    fn select_series_follows_requested_order() {
        let frame = make_frame();

        let reversed = frame.select_series(&["b".to_string(), "a".to_string()]).unwrap();
        let none = frame.select_series(&[]);
        let missing = frame.select_series(&["c".to_string()]);

        assert_eq!(reversed.series_ids, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(reversed.values[(0, 0, 0)], 100.0);
        assert_eq!(reversed.values[(1, 0, 0)], 0.0);
        assert_eq!(none.unwrap_err(), DataError::EmptyFrame);
        assert_eq!(missing.unwrap_err(), DataError::UnknownSeries { id: "c".into() });
    }
}
