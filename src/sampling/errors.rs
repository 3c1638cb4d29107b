//! Errors for prior construction and sampling.
//!
//! This module defines [`PriorError`], the validation error for prior
//! distribution parameters. Priors are validated at construction; `draw`
//! additionally maps a rejected backing distribution to
//! [`PriorError::ConstructionFailed`], so hand-assembled variants fail with
//! an error rather than a panic.
//!
//! ## Conventions
//! - Scale-like and shape-like parameters must be **finite and strictly
//!   positive**; location-like parameters must be **finite**.
//! - Uniform supports must satisfy `low < high`.

/// Result alias for prior-construction and sampling paths that may produce
/// [`PriorError`].
pub type PriorResult<T> = Result<T, PriorError>;

/// Validation error for prior distribution parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorError {
    /// A parameter is NaN/±inf.
    NonFiniteParam { distribution: &'static str, name: &'static str, value: f64 },

    /// A scale- or shape-like parameter is ≤ 0.
    NonPositiveParam { distribution: &'static str, name: &'static str, value: f64 },

    /// A uniform support has `low >= high`.
    EmptySupport { low: f64, high: f64 },

    /// The backing distribution rejected parameters that passed validation.
    ConstructionFailed { distribution: &'static str },
}

impl std::error::Error for PriorError {}

impl std::fmt::Display for PriorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorError::NonFiniteParam { distribution, name, value } => {
                write!(f, "{distribution} prior parameter '{name}' must be finite; got {value}")
            }
            PriorError::NonPositiveParam { distribution, name, value } => {
                write!(
                    f,
                    "{distribution} prior parameter '{name}' must be finite and > 0; got {value}"
                )
            }
            PriorError::EmptySupport { low, high } => {
                write!(f, "Uniform prior support must satisfy low < high; got [{low}, {high})")
            }
            PriorError::ConstructionFailed { distribution } => {
                write!(f, "Failed to construct the {distribution} distribution.")
            }
        }
    }
}
