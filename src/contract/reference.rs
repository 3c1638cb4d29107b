//! Reference effects: small, fully worked lifecycle implementations.
//!
//! Purpose
//! -------
//! Two effects that exist to be read, tested against, and copied when writing
//! a real component. [`AffineEffect`] is the minimal stateless case: no fit,
//! default transform, one sampled site in predict. [`MeanCenteredEffect`] is
//! the minimal stateful case: learned column means, a transform gated on fit,
//! and state-free replication.
//!
//! Key behaviors
//! -------------
//! - `AffineEffect` maps every cell through `v * scale_factor + bias +
//!   offset`, with `offset` drawn once per replica from a configurable
//!   prior. Its mode and tag overrides are instance-level knobs so one type
//!   covers additive, multiplicative, and retagged registrations.
//! - `MeanCenteredEffect` learns per-column means over all series and rows
//!   during fit, subtracts them during transform, and predicts a single
//!   coefficient times the centered column sum.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both effects keep the default single-series, single-column capability,
//!   so `predict` sees `(time, 1)` slices and returns the same shape.
//! - `MeanCenteredEffect::replicate` clears learned means; replicas fitted
//!   by the broadcasting engine never share state with the prototype.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the affine arithmetic under a constant sampler, the
//!   centering math, the fit gate, and state-free replication.
use crate::contract::context::ContextView;
use crate::contract::effect::{Effect, EffectMode, ParamMap, ParamValue};
use crate::contract::errors::{EffectError, EffectResult};
use crate::contract::tags::{EffectTags, TagOverrides};
use crate::contract::transform::TransformOutput;
use crate::data::adapter;
use crate::data::frame::PanelFrame;
use crate::data::horizon::ForecastHorizon;
use crate::data::selector::ColumnSelector;
use crate::data::tensor::Tensor;
use crate::sampling::prior::Prior;
use crate::sampling::sampler::Sampler;
use ndarray::{Array1, Axis};

// ---- Affine effect ----------------------------------------------------------

/// Stateless effect mapping cells through `v * scale_factor + bias + offset`.
///
/// Purpose
/// -------
/// The smallest complete effect: no fitted state, the default transform, and
/// a single sampled site (`"offset"`) in predict. Useful as a regressor
/// stand-in and as the template for new stateless effects.
///
/// Fields
/// ------
/// - `scale_factor`: `f64`
///     Finite multiplier applied to every cell.
/// - `bias`: `f64`
///     Finite shift added to every cell.
/// - `mode`: `EffectMode`
///     How the contribution enters the aggregate.
/// - `selector`: `ColumnSelector`
///     Which exogenous columns to consume; all by default.
/// - `offset_prior`: `Prior`
///     Prior for the per-replica offset draw; standard normal by default.
/// - `overrides`: `TagOverrides`
///     Instance-level capability overrides; empty by default.
#[derive(Debug, Clone)]
pub struct AffineEffect {
    scale_factor: f64,
    bias: f64,
    mode: EffectMode,
    selector: ColumnSelector,
    offset_prior: Prior,
    overrides: TagOverrides,
}

impl AffineEffect {
    /// Additive affine effect with a standard-normal offset prior.
    ///
    /// # Errors
    /// - [`EffectError::InvalidHyperparameter`] when `scale_factor` or
    ///   `bias` is non-finite.
    pub fn new(scale_factor: f64, bias: f64) -> EffectResult<AffineEffect> {
        if !scale_factor.is_finite() {
            return Err(EffectError::InvalidHyperparameter {
                effect: "affine",
                name: "scale_factor",
                value: scale_factor,
                reason: "must be finite",
            });
        }
        if !bias.is_finite() {
            return Err(EffectError::InvalidHyperparameter {
                effect: "affine",
                name: "bias",
                value: bias,
                reason: "must be finite",
            });
        }
        Ok(AffineEffect {
            scale_factor,
            bias,
            mode: EffectMode::Additive,
            selector: ColumnSelector::All,
            offset_prior: Prior::standard_normal(),
            overrides: TagOverrides::none(),
        })
    }

    /// Same effect with `mode` replaced.
    pub fn with_mode(mut self, mode: EffectMode) -> AffineEffect {
        self.mode = mode;
        self
    }

    /// Same effect with the column selector replaced.
    pub fn with_selector(mut self, selector: ColumnSelector) -> AffineEffect {
        self.selector = selector;
        self
    }

    /// Same effect with the offset prior replaced.
    pub fn with_offset_prior(mut self, prior: Prior) -> AffineEffect {
        self.offset_prior = prior;
        self
    }

    /// Same effect with instance-level tag overrides.
    pub fn with_overrides(mut self, overrides: TagOverrides) -> AffineEffect {
        self.overrides = overrides;
        self
    }
}

impl Effect for AffineEffect {
    fn tag_overrides(&self) -> TagOverrides {
        self.overrides
    }

    fn selector(&self) -> ColumnSelector {
        self.selector.clone()
    }

    fn mode(&self) -> EffectMode {
        self.mode
    }

    fn replicate(&self) -> Box<dyn Effect> {
        Box::new(self.clone())
    }

    fn predict(
        &self,
        data: &TransformOutput,
        _context: &ContextView<'_>,
        sampler: &mut dyn Sampler,
    ) -> EffectResult<Tensor> {
        let offset = sampler.sample("offset", &self.offset_prior)?;
        let primary = data
            .primary()
            .ok_or_else(|| EffectError::MissingBundleData { effect: "affine".into() })?;
        Ok(primary.mapv(|v| v * self.scale_factor + self.bias + offset))
    }

    fn get_test_params(&self, parameter_set: &str) -> Vec<ParamMap> {
        match parameter_set {
            "default" => {
                let mut params = ParamMap::new();
                params.insert("scale_factor".into(), ParamValue::Float(2.0));
                params.insert("bias".into(), ParamValue::Float(1.0));
                vec![params]
            }
            _ => Vec::new(),
        }
    }
}

// ---- Mean-centered effect ---------------------------------------------------

/// Stateful effect subtracting fitted column means before a linear predict.
///
/// Purpose
/// -------
/// The smallest effect with learned state. `fit` records per-column means
/// over every series and row of the exogenous slice; `transform` refuses to
/// run before fit and then centers its input; `predict` draws one
/// coefficient and returns `coef * multiplier` times the centered column
/// sum, keeping the trailing axis.
///
/// Fields
/// ------
/// - `multiplier`: `f64`
///     Finite factor on the sampled coefficient.
/// - `coef_prior`: `Prior`
///     Prior for the coefficient draw; standard normal by default.
/// - `means`: `Option<Array1<f64>>`
///     Per-column means; `None` until fitted.
///
/// Invariants
/// ----------
/// - `transform` runs only after `fit`; the effect declares
///   `requires_fit_before_transform` so the pipeline enforces the same gate
///   for unfitted replicas.
#[derive(Debug, Clone)]
pub struct MeanCenteredEffect {
    multiplier: f64,
    coef_prior: Prior,
    means: Option<Array1<f64>>,
}

impl MeanCenteredEffect {
    /// Unfitted effect with a standard-normal coefficient prior.
    ///
    /// # Errors
    /// - [`EffectError::InvalidHyperparameter`] when `multiplier` is
    ///   non-finite.
    pub fn new(multiplier: f64) -> EffectResult<MeanCenteredEffect> {
        if !multiplier.is_finite() {
            return Err(EffectError::InvalidHyperparameter {
                effect: "mean_centered",
                name: "multiplier",
                value: multiplier,
                reason: "must be finite",
            });
        }
        Ok(MeanCenteredEffect {
            multiplier,
            coef_prior: Prior::standard_normal(),
            means: None,
        })
    }

    /// Same effect with the coefficient prior replaced.
    pub fn with_coef_prior(mut self, prior: Prior) -> MeanCenteredEffect {
        self.coef_prior = prior;
        self
    }

    /// Fitted per-column means, `None` before fit.
    pub fn column_means(&self) -> Option<&Array1<f64>> {
        self.means.as_ref()
    }
}

impl Effect for MeanCenteredEffect {
    fn declared_tags(&self) -> EffectTags {
        EffectTags { requires_fit_before_transform: true, ..EffectTags::default() }
    }

    fn replicate(&self) -> Box<dyn Effect> {
        Box::new(MeanCenteredEffect {
            multiplier: self.multiplier,
            coef_prior: self.coef_prior.clone(),
            means: None,
        })
    }

    fn fit(&mut self, _y: &PanelFrame, x: Option<&PanelFrame>, _scale: f64) -> EffectResult<()> {
        self.means = Some(match x {
            Some(x) => {
                let cells = (x.series_count() * x.len()) as f64;
                x.values.sum_axis(Axis(0)).sum_axis(Axis(0)) / cells
            }
            None => Array1::zeros(0),
        });
        Ok(())
    }

    fn transform(&self, data: &PanelFrame, _horizon: &ForecastHorizon) -> EffectResult<TransformOutput> {
        let means = self.means.as_ref().ok_or_else(|| EffectError::NotFitted {
            effect: "mean_centered".into(),
            series: None,
            column: None,
        })?;
        if data.width() != means.len() {
            return Err(EffectError::ShapeMismatch {
                effect: "mean_centered".into(),
                expected: vec![means.len()],
                actual: vec![data.width()],
            });
        }
        let centered = match adapter::frame_to_tensor(data, false)? {
            Tensor::Single(values) => Tensor::Single(values - means),
            Tensor::Panel(values) => Tensor::Panel(values - means),
        };
        Ok(TransformOutput::Tensor(centered))
    }

    fn predict(
        &self,
        data: &TransformOutput,
        _context: &ContextView<'_>,
        sampler: &mut dyn Sampler,
    ) -> EffectResult<Tensor> {
        let coef = sampler.sample("coef", &self.coef_prior)?;
        let primary = data
            .primary()
            .ok_or_else(|| EffectError::MissingBundleData { effect: "mean_centered".into() })?;
        let weighted = primary.mapv(|v| v * coef * self.multiplier);
        // Collapse the feature axis, keeping the contribution's trailing 1.
        Ok(match weighted {
            Tensor::Single(values) => Tensor::Single(values.sum_axis(Axis(1)).insert_axis(Axis(1))),
            Tensor::Panel(values) => Tensor::Panel(values.sum_axis(Axis(2)).insert_axis(Axis(2))),
        })
    }

    fn get_test_params(&self, parameter_set: &str) -> Vec<ParamMap> {
        match parameter_set {
            "default" => {
                let mut params = ParamMap::new();
                params.insert("multiplier".into(), ParamValue::Float(2.0));
                vec![params]
            }
            _ => Vec::new(),
        }
    }
}
