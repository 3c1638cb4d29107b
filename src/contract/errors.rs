//! Errors for the effect contract and its enforcement (configuration, state,
//! shape, and lookup failures).
//!
//! This module defines [`EffectError`], the error type shared by the effect
//! trait, the tag registry, the composition context, and the broadcasting
//! engine. Every variant names the offending effect where one exists and
//! carries expected-vs-actual payloads where applicable, so a failed pass
//! points straight at the misbehaving component.
//!
//! ## Conventions
//! - **Configuration** errors surface at construction or registration time.
//! - **State** errors surface when a lifecycle rule is violated at run time
//!   (transform before a required fit, predicting a target-routed effect
//!   before any fit stored the target).
//! - **Shape** errors surface at the engine boundary when produced tensors
//!   disagree with declared tags.
//! - **Lookup** errors surface when a contribution read misses; the message
//!   lists the keys that were available.
//! - The requires-exogenous skip is **not** an error and has no variant here.
//! - Data-layer and prior-layer failures convert in via `From` and propagate
//!   unchanged.
use crate::data::errors::DataError;
use crate::sampling::errors::PriorError;

/// Result alias for effect-contract operations that may produce
/// [`EffectError`].
pub type EffectResult<T> = Result<T, EffectError>;

/// Unified error type for the effect framework.
///
/// Covers configuration, state, shape, and lookup failures, plus wrapped
/// data-layer and prior-layer errors.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectError {
    // ---- Configuration ----
    /// Effect name rejected at registration.
    InvalidEffectName { name: String, reason: &'static str },

    /// Effect name already registered.
    DuplicateEffectName { name: String },

    /// Resolved tags form an invalid combination.
    InvalidTagCombination { effect: String, reason: &'static str },

    /// Routing string did not parse as an applies-to value.
    UnknownAppliesTo { value: String },

    /// Mode string did not parse as an effect mode.
    UnknownEffectMode { value: String },

    /// Effect hyperparameter rejected at construction.
    InvalidHyperparameter { effect: &'static str, name: &'static str, value: f64, reason: &'static str },

    /// Fit scale must be finite and > 0.
    InvalidScale { value: f64 },

    /// Prediction needs exogenous data or a prior fit to size the pass.
    MissingPredictionInput,

    // ---- State ----
    /// Transform requested on an unfitted effect that requires fit.
    NotFitted { effect: String, series: Option<String>, column: Option<String> },

    /// Target-routed effect predicted before any fit stored the target.
    TargetUnavailable { effect: String },

    // ---- Shape ----
    /// Produced tensor dimensions disagree with the contract.
    ShapeMismatch { effect: String, expected: Vec<usize>, actual: Vec<usize> },

    /// Produced tensor variant disagrees with the declared panel capability.
    PanelContractViolated { effect: String, expected_panel: bool },

    /// Keyed transform bundle lacks the reserved primary payload.
    MissingBundleData { effect: String },

    // ---- Lookup ----
    /// Contribution read missed; `available` lists the context keys present.
    MissingContribution { effect: String, key: String, available: Vec<String> },

    /// Contribution written twice under one name.
    DuplicateContribution { name: String },

    // ---- Wrapped domain errors ----
    /// Data-layer validation failure.
    Data(DataError),

    /// Prior construction or sampling failure.
    Prior(PriorError),
}

impl std::error::Error for EffectError {}

impl std::fmt::Display for EffectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            EffectError::InvalidEffectName { name, reason } => {
                write!(f, "Invalid effect name '{name}': {reason}")
            }
            EffectError::DuplicateEffectName { name } => {
                write!(f, "Effect name '{name}' is already registered.")
            }
            EffectError::InvalidTagCombination { effect, reason } => {
                write!(f, "Effect '{effect}' declares an invalid tag combination: {reason}")
            }
            EffectError::UnknownAppliesTo { value } => {
                write!(
                    f,
                    "Unknown applies-to value '{value}'; expected 'exogenous'/'x' or 'target'/'y'."
                )
            }
            EffectError::UnknownEffectMode { value } => {
                write!(
                    f,
                    "Unknown effect mode '{value}'; expected 'additive' or 'multiplicative'."
                )
            }
            EffectError::InvalidHyperparameter { effect, name, value, reason } => {
                write!(f, "{effect} hyperparameter '{name}' {reason}; got {value}")
            }
            EffectError::InvalidScale { value } => {
                write!(f, "Fit scale must be finite and > 0; got {value}")
            }
            EffectError::MissingPredictionInput => {
                write!(
                    f,
                    "Prediction requires exogenous data or a prior fit to determine the series layout."
                )
            }
            // ---- State ----
            EffectError::NotFitted { effect, series, column } => {
                write!(f, "Effect '{effect}' must be fitted before transform")?;
                match (series, column) {
                    (Some(series), Some(column)) => {
                        write!(f, "; no fitted replica for series '{series}', column '{column}'.")
                    }
                    (Some(series), None) => {
                        write!(f, "; no fitted replica for series '{series}'.")
                    }
                    (None, Some(column)) => {
                        write!(f, "; no fitted replica for column '{column}'.")
                    }
                    (None, None) => write!(f, "."),
                }
            }
            EffectError::TargetUnavailable { effect } => {
                write!(
                    f,
                    "Effect '{effect}' routes the target, but no fit has stored training data yet."
                )
            }
            // ---- Shape ----
            EffectError::ShapeMismatch { effect, expected, actual } => {
                write!(
                    f,
                    "Effect '{effect}' produced a tensor of shape {actual:?}; expected {expected:?}"
                )
            }
            EffectError::PanelContractViolated { effect, expected_panel } => {
                if *expected_panel {
                    write!(
                        f,
                        "Effect '{effect}' returned a single-series tensor, but its tags declare panel capability."
                    )
                } else {
                    write!(
                        f,
                        "Effect '{effect}' returned a panel tensor, but its tags declare no panel capability."
                    )
                }
            }
            EffectError::MissingBundleData { effect } => {
                write!(
                    f,
                    "Effect '{effect}' returned a keyed bundle without the reserved 'data' entry."
                )
            }
            // ---- Lookup ----
            EffectError::MissingContribution { effect, key, available } => {
                write!(
                    f,
                    "Effect '{effect}' requested contribution '{key}', which is not in the context; available: {available:?}"
                )
            }
            EffectError::DuplicateContribution { name } => {
                write!(f, "Contribution '{name}' was already written to the context.")
            }
            // ---- Wrapped domain errors ----
            EffectError::Data(err) => write!(f, "{err}"),
            EffectError::Prior(err) => write!(f, "{err}"),
        }
    }
}

impl From<DataError> for EffectError {
    fn from(err: DataError) -> EffectError {
        EffectError::Data(err)
    }
}

impl From<PriorError> for EffectError {
    fn from(err: PriorError) -> EffectError {
        EffectError::Prior(err)
    }
}
