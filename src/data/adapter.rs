//! Conversion between prepared frames and the dense tensors effects consume.
//!
//! Purpose
//! -------
//! Bridge the tabular container and the tensor contract: compose column
//! selection with horizon filtering ([`prepare`]) and convert a prepared
//! frame into the tensor layout an effect's capabilities demand
//! ([`frame_to_tensor`]). The default `transform` of the effect contract is
//! exactly `frame_to_tensor` applied with the effect's panel capability.
//!
//! Conventions
//! -----------
//! - Panel-capable effects receive the full `(series, time, features)` block
//!   even for a single series; everyone else receives `(time, features)` and
//!   the caller is responsible for slicing panels down to one series first.
use crate::data::{
    errors::{DataError, DataResult},
    frame::PanelFrame,
    horizon::ForecastHorizon,
    tensor::Tensor,
};
use ndarray::Axis;

/// Compose column selection and horizon filtering over a frame.
///
/// `columns: None` keeps every column; `horizon: None` keeps every row. The
/// selection order is the order of `columns`, matching how the broadcasting
/// engine passes selector match order through.
///
/// # Errors
/// - Selection errors from [`PanelFrame::select`].
/// - Filtering errors from [`PanelFrame::filter_index`].
pub fn prepare(
    frame: &PanelFrame, columns: Option<&[String]>, horizon: Option<&ForecastHorizon>,
) -> DataResult<PanelFrame> {
    let selected = match columns {
        Some(names) => frame.select(names)?,
        None => frame.clone(),
    };
    match horizon {
        Some(window) => selected.filter_index(window),
        None => Ok(selected),
    }
}

/// Convert a prepared frame into the tensor layout the effect consumes.
///
/// With `panel == true` the full `(series, time, features)` block is returned
/// as [`Tensor::Panel`]. With `panel == false` the frame must hold exactly one
/// series, which is squeezed into a `(time, features)` [`Tensor::Single`].
///
/// # Errors
/// - [`DataError::DimensionMismatch`] (axis `"series"`) when a multi-series
///   frame is converted with `panel == false`.
pub fn frame_to_tensor(frame: &PanelFrame, panel: bool) -> DataResult<Tensor> {
    if panel {
        return Ok(Tensor::Panel(frame.values.clone()));
    }
    if frame.series_count() != 1 {
        return Err(DataError::DimensionMismatch {
            axis: "series",
            expected: 1,
            actual: frame.series_count(),
        });
    }
    Ok(Tensor::Single(frame.values.index_axis(Axis(0), 0).to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `prepare` composing selection and filtering.
    // - `frame_to_tensor` for both capability layouts and the multi-series
    //   rejection.
    // -------------------------------------------------------------------------

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
    // Verify that `prepare` applies selection first and filtering second.
    //
    // Given
    // -----
    // - The coordinate-encoded frame, column subset ["x1"], horizon [1, 2].
    //
    // Expect
    // ------
    // - A one-column frame over rows 1 and 2 whose values come from column 1.
    fn prepare_composes_selection_and_filtering() {
        let frame = make_frame();
        let horizon = ForecastHorizon::new(vec![1, 2]).unwrap();
        let columns = vec!["x1".to_string()];

        let prepared = prepare(&frame, Some(&columns), Some(&horizon)).unwrap();

        assert_eq!(prepared.columns, columns);
        assert_eq!(prepared.index, vec![1, 2]);
        assert_eq!(prepared.values[(0, 0, 0)], 11.0);
        assert_eq!(prepared.values[(1, 1, 0)], 121.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `prepare` with neither columns nor horizon is the identity.
    //
    // Given
    // -----
    // - The coordinate-encoded frame.
    //
    // Expect
    // ------
    // - An equal frame back.
    fn prepare_without_arguments_is_identity() {
        let frame = make_frame();

        let prepared = prepare(&frame, None, None).unwrap();

        assert_eq!(prepared, frame);
    }

    #[test]
    // Purpose
    // -------
    // Verify tensor conversion for both capability layouts.
    //
    // Given
    // -----
    // - The two-series frame and its single-series "a" slice.
    //
    // Expect
    // ------
    // - `panel == true` yields the full `(2, 3, 2)` panel tensor.
    // - `panel == false` on the slice yields the `(3, 2)` single tensor.
    fn frame_to_tensor_honors_capability_layout() {
        let frame = make_frame();
        let slice = frame.series_frame("a").unwrap();

        let panel = frame_to_tensor(&frame, true).unwrap();
        let single = frame_to_tensor(&slice, false).unwrap();

        assert_eq!(panel.dims(), vec![2, 3, 2]);
        assert_eq!(
            single,
            Tensor::Single(array![[0.0, 1.0], [10.0, 11.0], [20.0, 21.0]])
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure a multi-series frame cannot be squeezed into the single-series
    // layout.
    //
    // Given
    // -----
    // - The two-series frame converted with `panel == false`.
    //
    // Expect
    // ------
    // - `DataError::DimensionMismatch` on the series axis.
    fn frame_to_tensor_rejects_multi_series_for_single_layout() {
        let frame = make_frame();

        let result = frame_to_tensor(&frame, false);

        assert_eq!(
            result.unwrap_err(),
            DataError::DimensionMismatch { axis: "series", expected: 1, actual: 2 }
        );
    }
}
