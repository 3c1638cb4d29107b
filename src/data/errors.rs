//! Errors for tabular inputs (panel frames, forecast horizons, column
//! selectors, and tensor assembly).
//!
//! This module defines [`DataError`], the validation error type shared by the
//! data containers. It implements `Display`/`Error` and carries diagnostic
//! fields (offending series, column, position, or value) so callers can report
//! exactly what was rejected.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to positions in the validated container.
//! - Timestamps are `i64` ordinals; indexes and horizons must be **strictly
//!   increasing**.
//! - Values must be **finite**; NaN and ±inf are rejected at construction.
//! - Series identifiers and column names must not contain `'/'`, the
//!   sampling-scope delimiter.
//! - Errors surface at the first offending element; validation stops there.

/// Result alias for data-container construction and transformation paths that
/// may produce [`DataError`].
pub type DataResult<T> = Result<T, DataError>;

/// Validation error type for the data containers.
///
/// Covers frame construction, horizon construction, column selection, and the
/// tensor assembly helpers used by the broadcasting engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Frame validation ----
    /// Frame has no series or no time points.
    EmptyFrame,

    /// Series identifier at `position` is an empty string.
    EmptySeriesId { position: usize },

    /// Series identifier appears more than once.
    DuplicateSeries { id: String },

    /// Series identifier contains `'/'`, the sampling-scope delimiter.
    SeparatorInSeriesId { id: String },

    /// Column name at `position` is an empty string.
    EmptyColumnName { position: usize },

    /// Column name appears more than once.
    DuplicateColumn { name: String },

    /// Column name contains `'/'`, the sampling-scope delimiter.
    SeparatorInColumnName { name: String },

    /// Time index is not strictly increasing at `position`.
    UnsortedIndex { position: usize },

    /// Value block dimension disagrees with the declared layout.
    DimensionMismatch { axis: &'static str, expected: usize, actual: usize },

    /// A value is NaN/±inf.
    NonFiniteValue { series: String, row: usize, column: String, value: f64 },

    // ---- Frame lookups ----
    /// Requested column does not exist in the frame.
    UnknownColumn { name: String },

    /// Requested series does not exist in the frame.
    UnknownSeries { id: String },

    /// Target and exogenous frames do not describe the same panel.
    MisalignedPanels { reason: &'static str },

    // ---- Horizon validation ----
    /// Forecast horizon has no timestamps.
    EmptyHorizon,

    /// Horizon timestamps are not strictly increasing at `position`.
    UnsortedHorizon { position: usize },

    /// A horizon timestamp is absent from the frame index.
    HorizonOutsideIndex { timestamp: i64 },

    // ---- Selector validation ----
    /// Selector pattern is an empty string.
    EmptyPattern,

    // ---- Tensor assembly ----
    /// Two tensors disagree in variant or dimensions.
    TensorShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },

    /// Tensor combination or stacking received no parts.
    EmptyStack,
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Frame validation ----
            DataError::EmptyFrame => {
                write!(f, "Frame must contain at least one series and one time point.")
            }
            DataError::EmptySeriesId { position } => {
                write!(f, "Series identifier at position {position} is empty.")
            }
            DataError::DuplicateSeries { id } => {
                write!(f, "Series identifier '{id}' appears more than once.")
            }
            DataError::SeparatorInSeriesId { id } => {
                write!(
                    f,
                    "Series identifier '{id}' must not contain '/'; it delimits sampling scopes."
                )
            }
            DataError::EmptyColumnName { position } => {
                write!(f, "Column name at position {position} is empty.")
            }
            DataError::DuplicateColumn { name } => {
                write!(f, "Column name '{name}' appears more than once.")
            }
            DataError::SeparatorInColumnName { name } => {
                write!(
                    f,
                    "Column name '{name}' must not contain '/'; it delimits sampling scopes."
                )
            }
            DataError::UnsortedIndex { position } => {
                write!(f, "Time index must be strictly increasing; violated at position {position}.")
            }
            DataError::DimensionMismatch { axis, expected, actual } => {
                write!(f, "Value block {axis} dimension mismatch: expected {expected}, got {actual}")
            }
            DataError::NonFiniteValue { series, row, column, value } => {
                write!(
                    f,
                    "Value at series '{series}', row {row}, column '{column}' is non-finite: {value}"
                )
            }
            // ---- Frame lookups ----
            DataError::UnknownColumn { name } => {
                write!(f, "Column '{name}' does not exist in the frame.")
            }
            DataError::UnknownSeries { id } => {
                write!(f, "Series '{id}' does not exist in the frame.")
            }
            DataError::MisalignedPanels { reason } => {
                write!(f, "Target and exogenous frames are misaligned: {reason}")
            }
            // ---- Horizon validation ----
            DataError::EmptyHorizon => {
                write!(f, "Forecast horizon must contain at least one timestamp.")
            }
            DataError::UnsortedHorizon { position } => {
                write!(
                    f,
                    "Horizon timestamps must be strictly increasing; violated at position {position}."
                )
            }
            DataError::HorizonOutsideIndex { timestamp } => {
                write!(f, "Horizon timestamp {timestamp} is absent from the frame index.")
            }
            // ---- Selector validation ----
            DataError::EmptyPattern => {
                write!(f, "Selector pattern must be a non-empty string.")
            }
            // ---- Tensor assembly ----
            DataError::TensorShapeMismatch { expected, actual } => {
                write!(f, "Tensor shape mismatch: expected {expected:?}, got {actual:?}")
            }
            DataError::EmptyStack => {
                write!(f, "Cannot combine or stack an empty set of tensors.")
            }
        }
    }
}
