//! Forecast horizon: the ordered set of future timestamps a prediction pass
//! covers.
//!
//! [`ForecastHorizon`] is a small validated newtype over a strictly increasing,
//! non-empty sequence of [`Timestamp`]s. The broadcasting engine uses it to
//! restrict prepared rows before `transform` and to size contribution tensors;
//! effects may read it directly (e.g. calendar features computed from the
//! timestamps themselves).
//!
//! ## Invariants
//! - At least one timestamp.
//! - Strictly increasing (no duplicates).
use crate::data::errors::{DataError, DataResult};

/// Epoch-like time ordinal shared by frame indexes and forecast horizons.
pub type Timestamp = i64;

/// Validated, strictly increasing sequence of future timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastHorizon {
    timestamps: Vec<Timestamp>,
}

impl ForecastHorizon {
    /// Construct a validated horizon from raw timestamps.
    ///
    /// # Errors
    /// - [`DataError::EmptyHorizon`] when `timestamps` is empty.
    /// - [`DataError::UnsortedHorizon`] at the first position where the
    ///   sequence fails to strictly increase.
    ///
    /// # Examples
    /// ```rust
    /// # use ts_effects::data::horizon::ForecastHorizon;
    /// let horizon = ForecastHorizon::new(vec![10, 11, 12]).unwrap();
    /// assert_eq!(horizon.len(), 3);
    /// assert!(horizon.contains(11));
    /// ```
    pub fn new(timestamps: Vec<Timestamp>) -> DataResult<Self> {
        if timestamps.is_empty() {
            return Err(DataError::EmptyHorizon);
        }
        for position in 1..timestamps.len() {
            if timestamps[position] <= timestamps[position - 1] {
                return Err(DataError::UnsortedHorizon { position });
            }
        }
        Ok(ForecastHorizon { timestamps })
    }

    /// Number of horizon timestamps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always `false`; a validated horizon is non-empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamps in increasing order.
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// First (earliest) horizon timestamp.
    pub fn first(&self) -> Timestamp {
        self.timestamps[0]
    }

    /// Last (latest) horizon timestamp.
    pub fn last(&self) -> Timestamp {
        self.timestamps[self.timestamps.len() - 1]
    }

    /// Whether `timestamp` is part of the horizon.
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.timestamps.binary_search(&timestamp).is_ok()
    }

    /// Position of `timestamp` within the horizon, if present.
    pub fn position(&self, timestamp: Timestamp) -> Option<usize> {
        self.timestamps.binary_search(&timestamp).ok()
    }
}
