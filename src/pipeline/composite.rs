//! Composite pipeline: registration, shared fitting, and composed prediction.
//!
//! Purpose
//! -------
//! [`EffectPipeline`] is the outer surface of the framework. Components are
//! registered in composition order, fitted in one shared pass over the
//! training data, and predicted in one shared pass per horizon. The pipeline
//! owns everything effects should not have to think about: routing frames by
//! the applies-to tag, column selection, horizon filtering, replication
//! across series and columns, sampler scoping, contribution bookkeeping, and
//! the fold into one aggregate.
//!
//! Key behaviors
//! -------------
//! - Registration order is composition order. Contributions enter the
//!   context and the aggregate strictly in that order, so an effect can read
//!   every earlier contribution and none later.
//! - Fitting replicates each effect per broadcast slice and keys every
//!   replica by series and column; predicting a subset or reordering of the
//!   trained series finds the same replicas again.
//! - An exogenous-requiring effect whose selector matches nothing is skipped
//!   for the whole pass: no fit, no contribution, no context entry.
//! - Additive contributions are added to the aggregate; multiplicative ones
//!   scale it by `1 + c`, so multiplicative effects apply to whatever was
//!   composed before them.
//! - `predict_all` takes `&self`. Fitted state is never touched at predict
//!   time, and unfitted replicas of effects that tolerate it run as
//!   throwaway replicas of the registered prototype.
//!
//! Invariants & assumptions
//! ------------------------
//! - The pipeline is single-threaded; a pass borrows the pipeline for its
//!   whole duration and the context is rebuilt from empty every pass.
//! - A failed `fit_all` leaves the pipeline unfitted (input validation
//!   failures leave the previous fit intact; failures while fitting clear
//!   it).
//! - Sampling sites are scoped `effect/series/column/site` with absent parts
//!   omitted. Effect names (at registration) and series/column names (at
//!   frame construction) are `/`-free, so distinct replicas always draw
//!   distinct sites under one sampler.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no logging; all diagnostics travel in
//!   [`EffectError`] values.
//!
//! Testing notes
//! -------------
//! - Unit tests cover registration guards, fit validation and failure
//!   cleanup, replica keying, the skip path, and the aggregate arithmetic;
//!   multi-effect scenarios live in the integration tests.
use crate::contract::context::CompositionContext;
use crate::contract::effect::{Effect, EffectMode, ParamMap};
use crate::contract::errors::{EffectError, EffectResult};
use crate::contract::tags::{AppliesTo, EffectTags};
use crate::data::errors::DataError;
use crate::data::frame::PanelFrame;
use crate::data::horizon::{ForecastHorizon, Timestamp};
use crate::data::selector::ColumnSelector;
use crate::data::tensor::Tensor;
use crate::pipeline::broadcast::{
    check_contribution, check_transform_output, BroadcastPlan, ReplicaKey,
};
use crate::sampling::sampler::{Sampler, ScopedSampler};

// ---- Pipeline state ---------------------------------------------------------

/// Training inputs retained by `fit_all` for later passes.
///
/// The target is kept so target-routed effects can be predicted in-sample
/// and so `predict_all` can size a pass when no exogenous frame is given.
#[derive(Debug, Clone)]
struct TrainingData {
    y: PanelFrame,
    x: Option<PanelFrame>,
    scale: f64,
}

/// One registered effect with its resolved configuration and fitted
/// replicas.
struct EffectNode {
    name: String,
    tags: EffectTags,
    mode: EffectMode,
    prototype: Box<dyn Effect>,
    replicas: Vec<(ReplicaKey, Box<dyn Effect>)>,
}

impl EffectNode {
    fn replica(&self, key: &ReplicaKey) -> Option<&dyn Effect> {
        self.replicas
            .iter()
            .find(|(known, _)| known == key)
            .map(|(_, replica)| replica.as_ref())
    }
}

/// Result of one prediction pass: per-effect contributions plus their fold.
#[derive(Debug, Clone)]
pub struct PredictOutcome {
    /// Contributions in composition order, keyed by effect name. Skipped
    /// effects have no entry.
    pub contributions: CompositionContext,
    /// Fold of all contributions: additive effects added, multiplicative
    /// effects applied as `1 + c` factors, starting from zero.
    pub aggregate: Tensor,
}

/// Ordered collection of effects sharing fit and predict passes.
///
/// Examples
/// --------
/// ```
/// # use ts_effects::contract::AffineEffect;
/// # use ts_effects::data::{ForecastHorizon, PanelFrame, Tensor};
/// # use ts_effects::pipeline::EffectPipeline;
/// # use ts_effects::sampling::FixedSampler;
/// # use ndarray::array;
/// let y = PanelFrame::single(
///     "store", vec![0, 1, 2], vec!["sales".into()],
///     array![[10.0], [20.0], [30.0]],
/// ).unwrap();
/// let x = PanelFrame::single(
///     "store", vec![0, 1, 2], vec!["tv".into()],
///     array![[1.0], [2.0], [3.0]],
/// ).unwrap();
///
/// let mut pipeline = EffectPipeline::new();
/// pipeline.register("media", Box::new(AffineEffect::new(2.0, 1.0).unwrap())).unwrap();
/// pipeline.fit_all(&y, Some(&x), 1.0).unwrap();
///
/// let horizon = ForecastHorizon::new(vec![0, 1, 2]).unwrap();
/// let mut sampler = FixedSampler::new(0.0);
/// let outcome = pipeline.predict_all(Some(&x), &horizon, &mut sampler).unwrap();
/// assert_eq!(outcome.aggregate, Tensor::Single(array![[3.0], [5.0], [7.0]]));
/// ```
#[derive(Default)]
pub struct EffectPipeline {
    nodes: Vec<EffectNode>,
    train: Option<TrainingData>,
}

impl EffectPipeline {
    /// Empty pipeline.
    pub fn new() -> EffectPipeline {
        EffectPipeline::default()
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no effect has been registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a fit pass has completed since the last failure.
    pub fn is_fitted(&self) -> bool {
        self.train.is_some()
    }

    /// Registered effect names in composition order.
    pub fn effect_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.name.as_str())
    }

    /// Keys of the fitted replicas for `name`, in fit order; `None` for an
    /// unregistered name.
    pub fn replica_keys(&self, name: &str) -> Option<Vec<&ReplicaKey>> {
        self.nodes
            .iter()
            .find(|node| node.name == name)
            .map(|node| node.replicas.iter().map(|(key, _)| key).collect())
    }

    /// Append `effect` under `name` at the end of the composition order.
    ///
    /// Tags are resolved and validated here, once; the stored result is what
    /// every later pass plans against. Effects registered after a fit stay
    /// unfitted until the next `fit_all`.
    ///
    /// # Errors
    /// - [`EffectError::InvalidEffectName`] when `name` is empty or contains
    ///   `'/'`, the sampling scope delimiter.
    /// - [`EffectError::DuplicateEffectName`] when `name` is taken.
    /// - [`EffectError::InvalidTagCombination`] when the resolved tags are
    ///   contradictory.
    pub fn register(&mut self, name: impl Into<String>, effect: Box<dyn Effect>) -> EffectResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(EffectError::InvalidEffectName { name, reason: "name must not be empty" });
        }
        if name.contains('/') {
            return Err(EffectError::InvalidEffectName {
                name,
                reason: "name must not contain '/', the sampling scope delimiter",
            });
        }
        if self.nodes.iter().any(|node| node.name == name) {
            return Err(EffectError::DuplicateEffectName { name });
        }
        let tags = EffectTags::resolve(effect.as_ref());
        tags.validate(&name)?;
        let mode = effect.mode();
        self.nodes.push(EffectNode { name, tags, mode, prototype: effect, replicas: Vec::new() });
        Ok(())
    }

    /// Fit every registered effect on one shared pass over the training
    /// data.
    ///
    /// Each effect is routed by its applies-to tag, column-selected, sliced
    /// per its capabilities, and fitted once per slice on a fresh replica.
    /// Exogenous-requiring effects with no matching columns are skipped.
    ///
    /// Parameters
    /// ----------
    /// - `y`: `&PanelFrame`
    ///     Training target.
    /// - `x`: `Option<&PanelFrame>`
    ///     Exogenous data aligned with `y`, or `None` when the model has
    ///     none.
    /// - `scale`: `f64`
    ///     Positive, finite target scale passed through to every fit.
    ///
    /// # Errors
    /// - [`EffectError::InvalidScale`] on a non-finite or non-positive
    ///   scale.
    /// - [`DataError::MisalignedPanels`] (wrapped) when `x` disagrees with
    ///   `y` on series or index.
    /// - Any error an effect's `fit` raises; the pipeline is left unfitted.
    pub fn fit_all(&mut self, y: &PanelFrame, x: Option<&PanelFrame>, scale: f64) -> EffectResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EffectError::InvalidScale { value: scale });
        }
        if let Some(x) = x {
            if x.series_ids != y.series_ids {
                return Err(DataError::MisalignedPanels {
                    reason: "series identifiers differ between target and exogenous data",
                }
                .into());
            }
            if x.index != y.index {
                return Err(DataError::MisalignedPanels {
                    reason: "time index differs between target and exogenous data",
                }
                .into());
            }
        }
        let result = self.fit_nodes(y, x, scale);
        match result {
            Ok(()) => {
                self.train = Some(TrainingData { y: y.clone(), x: x.cloned(), scale });
                Ok(())
            }
            Err(error) => {
                for node in &mut self.nodes {
                    node.replicas.clear();
                }
                self.train = None;
                Err(error)
            }
        }
    }

    fn fit_nodes(&mut self, y: &PanelFrame, x: Option<&PanelFrame>, scale: f64) -> EffectResult<()> {
        for node in &mut self.nodes {
            node.replicas.clear();
            let routed = match node.tags.applies_to {
                AppliesTo::Target => Some(y.clone()),
                AppliesTo::Exogenous => route_exogenous(
                    x,
                    &node.prototype.selector(),
                    &node.tags,
                    &y.series_ids,
                    &y.index,
                )?,
            };
            let Some(routed) = routed else { continue };
            let plan = BroadcastPlan::build(&routed, &node.tags)?;
            for group in &plan.groups {
                let y_slice = match &group.series {
                    Some(id) => y.series_frame(id)?,
                    None => y.clone(),
                };
                for slice in &group.slices {
                    let mut replica = node.prototype.replicate();
                    let x_slice = match node.tags.applies_to {
                        AppliesTo::Exogenous => Some(&slice.frame),
                        AppliesTo::Target => None,
                    };
                    replica.fit(&y_slice, x_slice, scale)?;
                    node.replicas.push((slice.key.clone(), replica));
                }
            }
        }
        Ok(())
    }

    /// Predict every registered effect over `horizon` and fold the
    /// contributions.
    ///
    /// The pass runs in composition order. Per effect: route, horizon-filter
    /// (unless its tags opt out), slice per capabilities, transform and
    /// predict each replica under a scoped sampler, recombine columns
    /// through the effect's hook, stack series, and fold into the aggregate.
    /// Fitted state is read, never written; repeating a pass with an
    /// identically seeded sampler reproduces it exactly.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `Option<&PanelFrame>`
    ///     Exogenous data covering the horizon. Its series define the pass;
    ///     when `None`, the training series are used.
    /// - `horizon`: `&ForecastHorizon`
    ///     Timestamps to predict, defining the contribution row count.
    /// - `sampler`: `&mut dyn Sampler`
    ///     Site-addressed randomness shared by the whole pass.
    ///
    /// Returns
    /// -------
    /// - `EffectResult<PredictOutcome>`:
    ///     Per-effect contributions and their fold, shaped `(series, time,
    ///     1)` for multi-series passes and `(time, 1)` otherwise.
    ///
    /// # Errors
    /// - [`EffectError::MissingPredictionInput`] when neither `x` nor a
    ///   prior fit can size the pass.
    /// - [`EffectError::TargetUnavailable`] for a target-routed effect
    ///   before any fit.
    /// - [`EffectError::NotFitted`] for a missing replica of an effect that
    ///   requires fit, naming the series and column that missed.
    /// - Shape and lookup errors from the engine checks, each naming the
    ///   offending effect.
    pub fn predict_all(
        &self, x: Option<&PanelFrame>, horizon: &ForecastHorizon, sampler: &mut dyn Sampler,
    ) -> EffectResult<PredictOutcome> {
        let series_ids: Vec<String> = match x {
            Some(x) => x.series_ids.clone(),
            None => match &self.train {
                Some(train) => train.y.series_ids.clone(),
                None => return Err(EffectError::MissingPredictionInput),
            },
        };
        let series_count = series_ids.len();
        let rows = horizon.len();
        let mut context = CompositionContext::new();
        let mut aggregate = Tensor::zeros(series_count, rows);

        for node in &self.nodes {
            let routed = match node.tags.applies_to {
                AppliesTo::Target => match &self.train {
                    Some(train) => Some(train.y.select_series(&series_ids)?),
                    None => {
                        return Err(EffectError::TargetUnavailable { effect: node.name.clone() })
                    }
                },
                AppliesTo::Exogenous => route_exogenous(
                    x,
                    &node.prototype.selector(),
                    &node.tags,
                    &series_ids,
                    horizon.timestamps(),
                )?,
            };
            let Some(routed) = routed else { continue };
            let routed = if node.tags.filter_horizon_at_transform {
                routed.filter_index(horizon)?
            } else {
                routed
            };

            let plan = BroadcastPlan::build(&routed, &node.tags)?;
            let mut group_outputs: Vec<Tensor> = Vec::with_capacity(plan.groups.len());
            for group in &plan.groups {
                let mut column_parts: Vec<Tensor> = Vec::with_capacity(group.slices.len());
                let partitioned = group
                    .slices
                    .first()
                    .map_or(false, |slice| slice.key.column.is_some());
                for slice in &group.slices {
                    let transient;
                    let replica: &dyn Effect = match node.replica(&slice.key) {
                        Some(fitted) => fitted,
                        None if node.tags.requires_fit_before_transform => {
                            return Err(EffectError::NotFitted {
                                effect: node.name.clone(),
                                series: slice.key.series.clone(),
                                column: slice.key.column.clone(),
                            });
                        }
                        None => {
                            transient = node.prototype.replicate();
                            transient.as_ref()
                        }
                    };
                    let output = replica.transform(&slice.frame, horizon)?;
                    check_transform_output(&node.name, &node.tags, &output, slice.frame.len())?;

                    let mut scope = node.name.clone();
                    if let Some(series) = &slice.key.series {
                        scope.push('/');
                        scope.push_str(series);
                    }
                    if let Some(column) = &slice.key.column {
                        scope.push('/');
                        scope.push_str(column);
                    }
                    let mut scoped = ScopedSampler::new(&mut *sampler, scope);
                    let view = context.view_for(&node.name);
                    let contribution = replica.predict(&output, &view, &mut scoped)?;
                    check_contribution(
                        &node.name,
                        &node.tags,
                        &contribution,
                        slice.frame.series_count(),
                        rows,
                    )?;
                    column_parts.push(contribution);
                }
                let combined = if partitioned {
                    node.prototype.combine_columns(column_parts)?
                } else {
                    Tensor::sum_of(column_parts).map_err(EffectError::from)?
                };
                let group_series = match &group.series {
                    Some(_) => 1,
                    None => routed.series_count(),
                };
                check_contribution(&node.name, &node.tags, &combined, group_series, rows)?;
                group_outputs.push(combined);
            }

            let contribution = if node.tags.panel_capable || group_outputs.len() == 1 {
                Tensor::sum_of(group_outputs).map_err(EffectError::from)?
            } else {
                Tensor::stack_series(&group_outputs).map_err(EffectError::from)?
            };
            let contribution = contribution.conform(series_count);
            let expected =
                if series_count > 1 { vec![series_count, rows, 1] } else { vec![rows, 1] };
            if contribution.dims() != expected {
                return Err(EffectError::ShapeMismatch {
                    effect: node.name.clone(),
                    expected,
                    actual: contribution.dims(),
                });
            }

            context.insert(&node.name, contribution.clone())?;
            match node.mode {
                EffectMode::Additive => {
                    aggregate.zip_apply(&contribution, |acc, c| *acc += c)?;
                }
                EffectMode::Multiplicative => {
                    aggregate.zip_apply(&contribution, |acc, c| *acc *= 1.0 + c)?;
                }
            }
        }

        Ok(PredictOutcome { contributions: context, aggregate })
    }

    /// Named hyperparameter sets of every registered effect, in composition
    /// order.
    pub fn get_test_params(&self, parameter_set: &str) -> Vec<(String, Vec<ParamMap>)> {
        self.nodes
            .iter()
            .map(|node| (node.name.clone(), node.prototype.get_test_params(parameter_set)))
            .collect()
    }
}

// ---- Routing ----------------------------------------------------------------

/// Route the exogenous block for one effect: apply its selector, or decide
/// to skip.
///
/// Returns `None` when the effect requires exogenous data and none of it
/// matched; that effect sits out the whole pass. Effects that tolerate
/// missing exogenous data receive a zero-column frame carrying the pass's
/// series and index.
fn route_exogenous(
    x: Option<&PanelFrame>, selector: &ColumnSelector, tags: &EffectTags,
    fallback_series: &[String], fallback_index: &[Timestamp],
) -> EffectResult<Option<PanelFrame>> {
    match x {
        Some(x) => {
            let matched = selector.matches(&x.columns);
            if matched.is_empty() && tags.requires_exogenous {
                return Ok(None);
            }
            Ok(Some(x.select(&matched)?))
        }
        None => {
            if tags.requires_exogenous {
                return Ok(None);
            }
            let empty = PanelFrame::empty(fallback_series.to_vec(), fallback_index.to_vec())?;
            Ok(Some(empty))
        }
    }
}
