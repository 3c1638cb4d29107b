//! Broadcast planning: mapping one effect onto series and column slices.
//!
//! Purpose
//! -------
//! An effect declares what it can consume natively (a full panel, several
//! columns at once); the data decides what is actually there. This module
//! closes the gap: [`BroadcastPlan::build`] partitions a routed frame into
//! the slices an effect's resolved tags call for, and the check helpers
//! enforce the tensor contracts on what comes back out of `transform` and
//! `predict`.
//!
//! Key behaviors
//! -------------
//! - Series partition first: panel-capable effects get one group holding the
//!   whole frame; others get one group per series, always keyed by series
//!   identifier even when only one series exists.
//! - Column partition second, inside each group: multivariate-capable
//!   effects get one slice holding every selected column; others get one
//!   slice per column, keyed by column name. A zero-width frame yields a
//!   single unkeyed slice either way.
//! - Each slice becomes one replica with independent fitted state; the
//!   ([`ReplicaKey`]) is how fitted replicas are found again at predict
//!   time, so slicing a subset of series later still resolves.
//!
//! Invariants & assumptions
//! ------------------------
//! - The frame handed to `build` is already routed, column-selected, and
//!   horizon-filtered; the plan never consults selectors or horizons.
//! - Group and slice order follow frame order, which keeps replica fitting
//!   and context composition deterministic.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::composite` builds one plan per effect per pass and walks it
//!   for both fitting and prediction.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the four capability combinations, the zero-width case,
//!   and both check helpers' failure payloads.
use crate::contract::errors::{EffectError, EffectResult};
use crate::contract::tags::EffectTags;
use crate::contract::transform::TransformOutput;
use crate::data::errors::DataResult;
use crate::data::frame::PanelFrame;
use crate::data::tensor::Tensor;

// ---- Plan types -------------------------------------------------------------

/// Identity of one replica: which series and which column it owns.
///
/// `None` in a component means the replica spans that axis natively. Keys
/// are assigned at fit time and matched again at predict time, so fitted
/// state survives predicting a subset or reordering of series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaKey {
    /// Series identifier; `None` for panel-capable effects.
    pub series: Option<String>,
    /// Column name; `None` for multivariate-capable effects and zero-width
    /// frames.
    pub column: Option<String>,
}

/// One replica's input: its key and the frame slice it consumes.
#[derive(Debug, Clone)]
pub struct DataSlice {
    pub key: ReplicaKey,
    pub frame: PanelFrame,
}

/// Column slices sharing one series partition.
///
/// Per-column contributions inside a group are recombined through the
/// effect's `combine_columns` before groups are stacked.
#[derive(Debug, Clone)]
pub struct SeriesGroup {
    /// Series identifier; `None` when the group holds the whole panel.
    pub series: Option<String>,
    pub slices: Vec<DataSlice>,
}

/// Full slicing of one routed frame for one effect.
#[derive(Debug, Clone)]
pub struct BroadcastPlan {
    pub groups: Vec<SeriesGroup>,
}

impl BroadcastPlan {
    /// Partition `frame` into the slices the resolved `tags` call for.
    ///
    /// Parameters
    /// ----------
    /// - `frame`: `&PanelFrame`
    ///     Routed, column-selected, horizon-filtered input.
    /// - `tags`: `&EffectTags`
    ///     Resolved capability tags of the effect being planned.
    ///
    /// Returns
    /// -------
    /// - `DataResult<BroadcastPlan>`:
    ///     Groups in frame series order, slices in frame column order.
    ///
    /// # Errors
    /// Propagates frame slicing failures; none occur for identifiers and
    /// names taken from the frame itself.
    pub fn build(frame: &PanelFrame, tags: &EffectTags) -> DataResult<BroadcastPlan> {
        let mut groups = Vec::new();
        if tags.panel_capable {
            groups.push(SeriesGroup {
                series: None,
                slices: Self::column_slices(frame.clone(), None, tags)?,
            });
        } else {
            for id in &frame.series_ids {
                let series_frame = frame.series_frame(id)?;
                groups.push(SeriesGroup {
                    series: Some(id.clone()),
                    slices: Self::column_slices(series_frame, Some(id.clone()), tags)?,
                });
            }
        }
        Ok(BroadcastPlan { groups })
    }

    /// Total number of replicas across all groups.
    pub fn replica_count(&self) -> usize {
        self.groups.iter().map(|group| group.slices.len()).sum()
    }

    fn column_slices(
        frame: PanelFrame, series: Option<String>, tags: &EffectTags,
    ) -> DataResult<Vec<DataSlice>> {
        if tags.multivariate_capable || frame.width() == 0 {
            return Ok(vec![DataSlice {
                key: ReplicaKey { series, column: None },
                frame,
            }]);
        }
        let mut slices = Vec::with_capacity(frame.width());
        for column in &frame.columns {
            slices.push(DataSlice {
                key: ReplicaKey { series: series.clone(), column: Some(column.clone()) },
                frame: frame.select(std::slice::from_ref(column))?,
            });
        }
        Ok(slices)
    }
}

// ---- Output contract checks -------------------------------------------------

/// Check a `transform` output against the effect's panel capability and the
/// slice's row count, returning its primary tensor.
///
/// # Errors
/// - [`EffectError::MissingBundleData`] when a keyed bundle lacks the
///   reserved primary entry.
/// - [`EffectError::PanelContractViolated`] when the tensor variant
///   disagrees with the declared panel capability.
/// - [`EffectError::ShapeMismatch`] when the row axis disagrees with the
///   slice. Feature and series axes stay free here; `transform` may reshape
///   them.
pub fn check_transform_output<'a>(
    effect: &str, tags: &EffectTags, output: &'a TransformOutput, rows: usize,
) -> EffectResult<&'a Tensor> {
    let primary = output
        .primary()
        .ok_or_else(|| EffectError::MissingBundleData { effect: effect.to_string() })?;
    if primary.is_panel() != tags.panel_capable {
        return Err(EffectError::PanelContractViolated {
            effect: effect.to_string(),
            expected_panel: tags.panel_capable,
        });
    }
    if primary.rows() != rows {
        let mut expected = primary.dims();
        let row_axis = if primary.is_panel() { 1 } else { 0 };
        expected[row_axis] = rows;
        return Err(EffectError::ShapeMismatch {
            effect: effect.to_string(),
            expected,
            actual: primary.dims(),
        });
    }
    Ok(primary)
}

/// Check one replica's contribution against the slice it was produced from.
///
/// Contributions carry a trailing axis of one: `(series, rows, 1)` from
/// panel-capable effects and `(rows, 1)` otherwise.
///
/// # Errors
/// - [`EffectError::PanelContractViolated`] on a variant mismatch.
/// - [`EffectError::ShapeMismatch`] on any dimension mismatch.
pub fn check_contribution(
    effect: &str, tags: &EffectTags, tensor: &Tensor, series: usize, rows: usize,
) -> EffectResult<()> {
    if tensor.is_panel() != tags.panel_capable {
        return Err(EffectError::PanelContractViolated {
            effect: effect.to_string(),
            expected_panel: tags.panel_capable,
        });
    }
    let expected =
        if tags.panel_capable { vec![series, rows, 1] } else { vec![rows, 1] };
    if tensor.dims() != expected {
        return Err(EffectError::ShapeMismatch {
            effect: effect.to_string(),
            expected,
            actual: tensor.dims(),
        });
    }
    Ok(())
}
