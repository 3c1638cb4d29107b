//! Typed column-selection descriptors for exogenous data.
//!
//! Purpose
//! -------
//! Describe which exogenous columns an effect consumes without resorting to
//! stringly-typed patterns. Selection is total: [`ColumnSelector::matches`]
//! never fails, it simply returns the (possibly empty) list of matching
//! column names. An empty match combined with a requires-exogenous effect is
//! what triggers the engine's skip path, so "matches nothing" is a legal
//! outcome, not an error.
//!
//! Key behaviors
//! -------------
//! - [`ColumnSelector::All`] matches every column in frame order.
//! - [`ColumnSelector::Exact`] matches listed names that exist in the frame,
//!   **in listed order** (the selector defines the broadcast column order).
//! - `Prefix`/`Suffix`/`Contains` match by substring position, in frame order.
//!
//! Conventions
//! -----------
//! - Helper constructors validate their inputs (no duplicate names, no empty
//!   patterns); the enum variants themselves remain plain data.
//! - Matching is case-sensitive; column names are exact identifiers.
use crate::data::errors::{DataError, DataResult};

/// Which exogenous columns an effect consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Every column, in frame order.
    All,
    /// The listed names, in listed order; names absent from the frame simply
    /// do not match.
    Exact(Vec<String>),
    /// Columns whose name starts with the pattern, in frame order.
    Prefix(String),
    /// Columns whose name ends with the pattern, in frame order.
    Suffix(String),
    /// Columns whose name contains the pattern, in frame order.
    Contains(String),
}

impl ColumnSelector {
    /// Validated constructor for [`ColumnSelector::Exact`].
    ///
    /// An empty list is allowed and matches nothing. Duplicate or empty names
    /// are rejected.
    ///
    /// # Errors
    /// - [`DataError::EmptyColumnName`] when a listed name is empty.
    /// - [`DataError::DuplicateColumn`] when a name is listed twice.
    pub fn exact<I, S>(names: I) -> DataResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        for (position, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(DataError::EmptyColumnName { position });
            }
            if names[..position].contains(name) {
                return Err(DataError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(ColumnSelector::Exact(names))
    }

    /// Validated constructor for [`ColumnSelector::Prefix`].
    ///
    /// # Errors
    /// - [`DataError::EmptyPattern`] when the pattern is empty.
    pub fn prefix(pattern: impl Into<String>) -> DataResult<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(DataError::EmptyPattern);
        }
        Ok(ColumnSelector::Prefix(pattern))
    }

    /// Validated constructor for [`ColumnSelector::Suffix`].
    ///
    /// # Errors
    /// - [`DataError::EmptyPattern`] when the pattern is empty.
    pub fn suffix(pattern: impl Into<String>) -> DataResult<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(DataError::EmptyPattern);
        }
        Ok(ColumnSelector::Suffix(pattern))
    }

    /// Validated constructor for [`ColumnSelector::Contains`].
    ///
    /// # Errors
    /// - [`DataError::EmptyPattern`] when the pattern is empty.
    pub fn contains(pattern: impl Into<String>) -> DataResult<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(DataError::EmptyPattern);
        }
        Ok(ColumnSelector::Contains(pattern))
    }

    /// Names from `columns` matched by this selector, in match order.
    ///
    /// Match order is the listed order for [`ColumnSelector::Exact`] and the
    /// frame order for every other variant. The result may be empty.
    pub fn matches(&self, columns: &[String]) -> Vec<String> {
        match self {
            ColumnSelector::All => columns.to_vec(),
            ColumnSelector::Exact(names) => {
                names.iter().filter(|name| columns.contains(name)).cloned().collect()
            }
            ColumnSelector::Prefix(pattern) => {
                columns.iter().filter(|name| name.starts_with(pattern.as_str())).cloned().collect()
            }
            ColumnSelector::Suffix(pattern) => {
                columns.iter().filter(|name| name.ends_with(pattern.as_str())).cloned().collect()
            }
            ColumnSelector::Contains(pattern) => {
                columns.iter().filter(|name| name.contains(pattern.as_str())).cloned().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Match semantics and ordering for every selector variant.
    // - Validation behavior of the helper constructors.
    // -------------------------------------------------------------------------

    fn columns() -> Vec<String> {
        vec![
            "price".to_string(),
            "promo_tv".to_string(),
            "promo_radio".to_string(),
            "holiday".to_string(),
        ]
    }

    #[test]
    // Purpose
    // -------
    // Verify that `All` matches every column in frame order.
    //
    // Given
    // -----
    // - Four columns.
    //
    // Expect
    // ------
    // - All four names back, unchanged.
    fn all_selector_matches_every_column_in_frame_order() {
        let matched = ColumnSelector::All.matches(&columns());

        assert_eq!(matched, columns());
    }

    #[test]
    // Purpose
    // -------
    // Verify that `Exact` matches in listed order, not frame order, and
    // silently drops names absent from the frame.
    //
    // Given
    // -----
    // - Listed names `["holiday", "price", "missing"]`.
    //
    // Expect
    // ------
    // - `["holiday", "price"]` in listed order; the absent name does not
    //   match and does not error.
    fn exact_selector_matches_in_listed_order_and_drops_absent_names() {
        let selector = ColumnSelector::exact(["holiday", "price", "missing"]).unwrap();

        let matched = selector.matches(&columns());

        assert_eq!(matched, vec!["holiday".to_string(), "price".to_string()]);
    }

    #[test]
    // Purpose
    // -------
    // Verify substring variants match in frame order.
    //
    // Given
    // -----
    // - Prefix "promo_", suffix "_radio", contains "o".
    //
    // Expect
    // ------
    // - Prefix matches the two promo columns in frame order.
    // - Suffix matches only "promo_radio".
    // - Contains matches the three names containing an "o".
    fn substring_selectors_match_in_frame_order() {
        let cols = columns();

        let by_prefix = ColumnSelector::prefix("promo_").unwrap().matches(&cols);
        let by_suffix = ColumnSelector::suffix("_radio").unwrap().matches(&cols);
        let by_contains = ColumnSelector::contains("o").unwrap().matches(&cols);

        assert_eq!(by_prefix, vec!["promo_tv".to_string(), "promo_radio".to_string()]);
        assert_eq!(by_suffix, vec!["promo_radio".to_string()]);
        assert_eq!(
            by_contains,
            vec!["promo_tv".to_string(), "promo_radio".to_string(), "holiday".to_string()]
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that a selector matching nothing returns an empty list rather
    // than an error.
    //
    // Given
    // -----
    // - Prefix "weather_" against promo/price/holiday columns.
    //
    // Expect
    // ------
    // - An empty match list.
    fn non_matching_selector_returns_empty_list() {
        let matched = ColumnSelector::prefix("weather_").unwrap().matches(&columns());

        assert!(matched.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the validated constructors reject duplicate names and empty
    // patterns.
    //
    // Given
    // -----
    // - An `exact` list repeating "price".
    // - A `prefix` with an empty pattern.
    //
    // Expect
    // ------
    // - `DataError::DuplicateColumn` and `DataError::EmptyPattern`
    //   respectively.
    fn constructors_reject_duplicates_and_empty_patterns() {
        let duplicate = ColumnSelector::exact(["price", "price"]);
        let empty = ColumnSelector::prefix("");

        assert_eq!(duplicate.unwrap_err(), DataError::DuplicateColumn { name: "price".into() });
        assert_eq!(empty.unwrap_err(), DataError::EmptyPattern);
    }
}
