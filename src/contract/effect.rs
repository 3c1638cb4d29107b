//! Effect lifecycle contract: the trait every model component implements.
//!
//! Purpose
//! -------
//! An effect is one additive or multiplicative component of a structural
//! time-series model (a trend, a seasonality, an exogenous regressor). This
//! module defines the [`Effect`] trait: the three-phase lifecycle
//! (`fit` -> `transform` -> `predict`), the declarative hooks the pipeline
//! reads (tags, column selector, combination mode), and the cloning seam
//! (`replicate`) the broadcasting engine uses to give every series/column
//! slice its own fitted state.
//!
//! Key behaviors
//! -------------
//! - `fit` and `transform` have working defaults; a minimal effect implements
//!   only `replicate` and `predict`.
//! - The default `transform` converts the routed frame into a tensor shaped
//!   by the effect's resolved panel capability and performs no other work.
//! - `combine_columns` defaults to elementwise summation of per-column
//!   contributions; saturating or interacting effects override it.
//! - `get_test_params` exposes named hyperparameter sets so harnesses can
//!   instantiate effects generically.
//!
//! Invariants & assumptions
//! ------------------------
//! - `fit` receives the raw target and exogenous frames before any routing
//!   or filtering; `transform` receives the routed, column-selected,
//!   horizon-filtered frame for one replica's slice.
//! - `transform` and `predict` take `&self`: prediction never mutates fitted
//!   state, so repeated passes from one fitted pipeline are reproducible.
//! - All randomness flows through the [`Sampler`] handed to `predict`;
//!   effects hold prior specifications, never generators.
//!
//! Conventions
//! -----------
//! - Effects are infallible to construct only when they have no
//!   hyperparameters; validated constructors return
//!   `EffectResult<Self>` otherwise.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::composite` drives the lifecycle; `pipeline::broadcast` calls
//!   `replicate` once per slice and `combine_columns` once per series group.
//!
//! Testing notes
//! -------------
//! - Unit tests here exercise the trait defaults through a minimal
//!   implementation; reference implementations live in
//!   `contract::reference`.
use crate::contract::context::ContextView;
use crate::contract::errors::{EffectError, EffectResult};
use crate::contract::tags::{EffectTags, TagOverrides};
use crate::contract::transform::TransformOutput;
use crate::data::adapter;
use crate::data::frame::PanelFrame;
use crate::data::horizon::ForecastHorizon;
use crate::data::selector::ColumnSelector;
use crate::data::tensor::Tensor;
use crate::sampling::sampler::Sampler;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ---- Combination mode -------------------------------------------------------

/// How an effect's contribution enters the model aggregate.
///
/// Purpose
/// -------
/// Chosen per effect at registration time and read by the pipeline when it
/// folds contributions: additive contributions are added to the aggregate,
/// multiplicative contributions scale it by `1 + c` so a contribution of
/// `0.2` means a twenty percent uplift on everything composed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectMode {
    /// Contribution is added to the aggregate.
    #[default]
    Additive,
    /// Contribution scales the aggregate by `1 + c`.
    Multiplicative,
}

impl fmt::Display for EffectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectMode::Additive => write!(f, "additive"),
            EffectMode::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl FromStr for EffectMode {
    type Err = EffectError;

    /// Case-insensitive parse accepting `"additive"` and `"multiplicative"`.
    ///
    /// # Errors
    /// - [`EffectError::UnknownEffectMode`] for any other value.
    fn from_str(s: &str) -> Result<EffectMode, EffectError> {
        match s.to_ascii_lowercase().as_str() {
            "additive" => Ok(EffectMode::Additive),
            "multiplicative" => Ok(EffectMode::Multiplicative),
            _ => Err(EffectError::UnknownEffectMode { value: s.to_string() }),
        }
    }
}

// ---- Test parameter sets ----------------------------------------------------

/// One hyperparameter value inside a [`ParamMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{value}"),
            ParamValue::Int(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{value}"),
            ParamValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> ParamValue {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> ParamValue {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> ParamValue {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> ParamValue {
        ParamValue::Text(value.to_string())
    }
}

/// Named hyperparameter assignments for instantiating one effect variant.
pub type ParamMap = BTreeMap<String, ParamValue>;

// ---- Effect trait -----------------------------------------------------------

/// One composable component of a structural time-series model.
///
/// Purpose
/// -------
/// Implementations declare capabilities through tags, optionally learn state
/// in `fit`, reshape their slice of data in `transform`, and produce a
/// contribution tensor in `predict`. The pipeline owns routing, column
/// selection, horizon filtering, replication across series and columns, and
/// shape checking; effects only see the slice meant for them.
///
/// Notes
/// -----
/// - Only `replicate` and `predict` are required.
/// - `predict` always returns a contribution with a trailing axis of one:
///   `(time, 1)` for single-series slices, `(series, time, 1)` for panel
///   slices.
pub trait Effect {
    /// Capability tags baked into the effect type.
    fn declared_tags(&self) -> EffectTags {
        EffectTags::default()
    }

    /// Per-instance tag overrides; fields left `None` keep the declared
    /// value.
    fn tag_overrides(&self) -> TagOverrides {
        TagOverrides::none()
    }

    /// Which exogenous columns this effect consumes.
    fn selector(&self) -> ColumnSelector {
        ColumnSelector::All
    }

    /// How the contribution enters the aggregate.
    fn mode(&self) -> EffectMode {
        EffectMode::Additive
    }

    /// Fresh copy with hyperparameters intact and fitted state cleared.
    ///
    /// The broadcasting engine calls this once per series/column slice so
    /// replicas never share learned state.
    fn replicate(&self) -> Box<dyn Effect>;

    /// Learn state from the training target `y`, the exogenous frame `x`
    /// routed for this replica, and the target `scale`.
    ///
    /// Parameters
    /// ----------
    /// - `y`: `&PanelFrame`
    ///     Full training target, untouched by routing.
    /// - `x`: `Option<&PanelFrame>`
    ///     Exogenous slice for this replica; `None` when the effect routes
    ///     the target or no exogenous data was supplied.
    /// - `scale`: `f64`
    ///     Positive, finite scale of the target used to normalize priors.
    ///
    /// # Errors
    /// Stateless effects keep the default, which accepts everything.
    fn fit(&mut self, y: &PanelFrame, x: Option<&PanelFrame>, scale: f64) -> EffectResult<()> {
        let _ = (y, x, scale);
        Ok(())
    }

    /// Reshape the routed frame into the input `predict` expects.
    ///
    /// Parameters
    /// ----------
    /// - `data`: `&PanelFrame`
    ///     Routed, column-selected, horizon-filtered slice for this replica.
    /// - `horizon`: `&ForecastHorizon`
    ///     Prediction timestamps, already applied to `data` unless the
    ///     effect's tags opt out of horizon filtering.
    ///
    /// # Errors
    /// The default converts `data` into a tensor matching the effect's
    /// resolved panel capability and fails only on that conversion.
    fn transform(&self, data: &PanelFrame, horizon: &ForecastHorizon) -> EffectResult<TransformOutput> {
        let _ = horizon;
        let tags = self.declared_tags().merged(&self.tag_overrides());
        let tensor = adapter::frame_to_tensor(data, tags.panel_capable)?;
        Ok(TransformOutput::Tensor(tensor))
    }

    /// Produce this replica's contribution.
    ///
    /// Parameters
    /// ----------
    /// - `data`: `&TransformOutput`
    ///     Output of `transform` for this slice.
    /// - `context`: `&ContextView<'_>`
    ///     Contributions of effects earlier in registration order.
    /// - `sampler`: `&mut dyn Sampler`
    ///     Scoped sampling handle; site names are relative to this replica.
    ///
    /// Returns
    /// -------
    /// - `EffectResult<Tensor>`:
    ///     Contribution shaped `(time, 1)` or `(series, time, 1)`.
    fn predict(
        &self,
        data: &TransformOutput,
        context: &ContextView<'_>,
        sampler: &mut dyn Sampler,
    ) -> EffectResult<Tensor>;

    /// Fold per-column contributions of one series group into one tensor.
    ///
    /// # Errors
    /// The default sums elementwise and fails only when `parts` is empty or
    /// shapes disagree.
    fn combine_columns(&self, parts: Vec<Tensor>) -> EffectResult<Tensor> {
        Tensor::sum_of(parts).map_err(EffectError::from)
    }

    /// Named hyperparameter sets for generic test harnesses.
    ///
    /// The default advertises none; effects with hyperparameters override
    /// this and return at least one map for the `"default"` set.
    fn get_test_params(&self, parameter_set: &str) -> Vec<ParamMap> {
        let _ = parameter_set;
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::context::CompositionContext;
    use crate::sampling::sampler::FixedSampler;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `EffectMode` parsing and display.
    // - `ParamValue` conversions and display.
    // - Trait defaults (`fit`, `transform`, `combine_columns`,
    //   `get_test_params`) through a minimal implementation.
    // -------------------------------------------------------------------------

    /// Minimal effect: defaults everywhere, predict echoes its input.
    struct EchoEffect;

    impl Effect for EchoEffect {
        fn replicate(&self) -> Box<dyn Effect> {
            Box::new(EchoEffect)
        }

        fn predict(
            &self,
            data: &TransformOutput,
            _context: &ContextView<'_>,
            _sampler: &mut dyn Sampler,
        ) -> EffectResult<Tensor> {
            data.primary()
                .cloned()
                .ok_or(EffectError::MissingBundleData { effect: "echo".into() })
        }
    }

    fn two_column_frame() -> PanelFrame {
        PanelFrame::single(
            "main",
            vec![0, 1, 2],
            vec!["tv".into(), "radio".into()],
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify case-insensitive mode parsing and the rejection payload.
    //
    // Given
    // -----
    // - "Additive", "MULTIPLICATIVE", and "divisive".
    //
    // Expect
    // ------
    // - The first two parse; the last is `UnknownEffectMode`.
    fn effect_mode_parses_case_insensitively() {
        assert_eq!("Additive".parse::<EffectMode>().unwrap(), EffectMode::Additive);
        assert_eq!("MULTIPLICATIVE".parse::<EffectMode>().unwrap(), EffectMode::Multiplicative);
        assert_eq!(
            "divisive".parse::<EffectMode>().unwrap_err(),
            EffectError::UnknownEffectMode { value: "divisive".into() }
        );
        assert_eq!(EffectMode::default(), EffectMode::Additive);
        assert_eq!(EffectMode::Multiplicative.to_string(), "multiplicative");
    }

    #[test]
    // Purpose
    // -------
    // Verify `ParamValue` conversions and display formatting.
    //
    // Given
    // -----
    // - One value of each variant built through `From`.
    //
    // Expect
    // ------
    // - Variants and display strings match the source values.
    fn param_value_converts_and_displays() {
        assert_eq!(ParamValue::from(true), ParamValue::Bool(true));
        assert_eq!(ParamValue::from(3_i64), ParamValue::Int(3));
        assert_eq!(ParamValue::from(2.5), ParamValue::Float(2.5));
        assert_eq!(ParamValue::from("weekly"), ParamValue::Text("weekly".into()));
        assert_eq!(ParamValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Text("weekly".into()).to_string(), "weekly");
    }

    #[test]
    // Purpose
    // -------
    // Exercise the default `fit` and `transform` through a minimal effect.
    //
    // Given
    // -----
    // - `EchoEffect` (default tags, so single-series tensors) and a
    //   two-column single-series frame.
    //
    // Expect
    // ------
    // - `fit` accepts anything; `transform` yields the frame's values as a
    //   `Tensor::Single` wrapped in `TransformOutput::Tensor`.
    fn default_lifecycle_produces_single_tensor() {
        let mut effect = EchoEffect;
        let frame = two_column_frame();
        let horizon = ForecastHorizon::new(vec![0, 1, 2]).unwrap();

        effect.fit(&frame, None, 1.0).unwrap();
        let output = effect.transform(&frame, &horizon).unwrap();

        match output {
            TransformOutput::Tensor(Tensor::Single(values)) => {
                assert_eq!(values, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
            }
            other => panic!("expected a single tensor, got {other:?}"),
        }
        assert!(effect.get_test_params("default").is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Verify the default column combination is an elementwise sum.
    //
    // Given
    // -----
    // - Two `(3, 1)` contributions.
    //
    // Expect
    // ------
    // - Their elementwise sum; an empty part list is rejected.
    fn default_combine_columns_sums_parts() {
        let effect = EchoEffect;
        let parts = vec![
            Tensor::Single(array![[1.0], [2.0], [3.0]]),
            Tensor::Single(array![[10.0], [20.0], [30.0]]),
        ];

        let combined = effect.combine_columns(parts).unwrap();

        assert_eq!(combined, Tensor::Single(array![[11.0], [22.0], [33.0]]));
        assert!(effect.combine_columns(Vec::new()).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Sanity-check that a minimal predict implementation runs against the
    // default transform output.
    //
    // Given
    // -----
    // - `EchoEffect` predicting from its own transform output with a fixed
    //   sampler and an empty context.
    //
    // Expect
    // ------
    // - The input tensor comes back unchanged.
    fn minimal_predict_round_trips_transform_output() {
        let effect = EchoEffect;
        let frame = two_column_frame();
        let horizon = ForecastHorizon::new(vec![0, 1, 2]).unwrap();
        let context = CompositionContext::new();
        let mut sampler = FixedSampler::new(0.0);

        let output = effect.transform(&frame, &horizon).unwrap();
        let contribution =
            effect.predict(&output, &context.view_for("echo"), &mut sampler).unwrap();

        assert_eq!(contribution, Tensor::Single(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]));
    }
}
