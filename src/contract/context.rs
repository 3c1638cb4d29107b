//! Composition context: ordered contributions threaded through the chain.
//!
//! Purpose
//! -------
//! Later effects often depend on what earlier effects produced (a saturation
//! curve over the composed trend, an uplift on a seasonal baseline). The
//! [`CompositionContext`] carries those contributions as an ordered,
//! append-only map written exactly once per effect per pass. Effects never
//! touch the context directly: `predict` receives a [`ContextView`] bound to
//! the reading effect's name, so a missed lookup produces an error naming the
//! requester, the missing key, and the keys that were available.
//!
//! Key behaviors
//! -------------
//! - Insertion preserves registration order; iteration replays it.
//! - Writing a name twice is a lookup-kind error, never an overwrite.
//! - The pipeline rebuilds the context from empty on every pass; nothing
//!   persists across passes.
//!
//! Invariants & assumptions
//! ------------------------
//! - Keys are registered effect names; uniqueness is enforced here and at
//!   registration.
//! - Entries are contribution tensors already conformed to the pipeline
//!   shape, `(series, time, 1)` or `(time, 1)`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover ordering, duplicate rejection, and the error payload
//!   of a missed view lookup.
use crate::contract::errors::{EffectError, EffectResult};
use crate::data::tensor::Tensor;
use std::collections::HashMap;

/// Ordered, append-only map from effect name to contribution tensor.
#[derive(Debug, Clone, Default)]
pub struct CompositionContext {
    entries: Vec<(String, Tensor)>,
    by_name: HashMap<String, usize>,
}

impl CompositionContext {
    /// Empty context; the pipeline builds one per pass.
    pub fn new() -> CompositionContext {
        CompositionContext::default()
    }

    /// Append a contribution under `name`.
    ///
    /// # Errors
    /// - [`EffectError::DuplicateContribution`] when `name` was already
    ///   written this pass.
    pub fn insert(&mut self, name: impl Into<String>, contribution: Tensor) -> EffectResult<()> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(EffectError::DuplicateContribution { name });
        }
        self.by_name.insert(name.clone(), self.entries.len());
        self.entries.push((name, contribution));
        Ok(())
    }

    /// Contribution under `name`, if written.
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.by_name.get(name).map(|&position| &self.entries[position].1)
    }

    /// Whether `name` has been written.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(name, tensor)| (name.as_str(), tensor))
    }

    /// Number of contributions written.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no contribution has been written yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view bound to the reading effect's name; missed lookups
    /// through the view name that effect.
    pub fn view_for<'a>(&'a self, effect: &'a str) -> ContextView<'a> {
        ContextView { effect, context: self }
    }
}

/// Read-only context handle passed to `predict`, bound to the reader's name.
#[derive(Debug, Clone, Copy)]
pub struct ContextView<'a> {
    effect: &'a str,
    context: &'a CompositionContext,
}

impl<'a> ContextView<'a> {
    /// Contribution under `key`, if written.
    pub fn get(&self, key: &str) -> Option<&'a Tensor> {
        self.context.get(key)
    }

    /// Contribution under `key`, or a lookup error naming the reader.
    ///
    /// # Errors
    /// - [`EffectError::MissingContribution`] carrying the reader's name, the
    ///   missing key, and the keys available at read time.
    pub fn require(&self, key: &str) -> EffectResult<&'a Tensor> {
        self.context.get(key).ok_or_else(|| EffectError::MissingContribution {
            effect: self.effect.to_string(),
            key: key.to_string(),
            available: self.context.names().map(str::to_string).collect(),
        })
    }

    /// Whether `key` has been written.
    pub fn contains(&self, key: &str) -> bool {
        self.context.contains(key)
    }

    /// Names written so far, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.context.names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Insertion order and duplicate rejection.
    // - View lookups: hits, misses, and the miss error payload.
    // -------------------------------------------------------------------------

    fn tensor(value: f64) -> Tensor {
        Tensor::Single(array![[value]])
    }

    #[test]
    // Purpose
    // -------
    // Verify that iteration replays insertion order and lookups hit.
    //
    // Given
    // -----
    // - Contributions "trend" then "seasonal".
    //
    // Expect
    // ------
    // - `names` yields ["trend", "seasonal"]; `get` finds both.
    fn context_preserves_insertion_order() {
        let mut context = CompositionContext::new();
        context.insert("trend", tensor(1.0)).unwrap();
        context.insert("seasonal", tensor(2.0)).unwrap();

        let names: Vec<&str> = context.names().collect();

        assert_eq!(names, vec!["trend", "seasonal"]);
        assert_eq!(context.get("trend"), Some(&tensor(1.0)));
        assert_eq!(context.get("seasonal"), Some(&tensor(2.0)));
        assert_eq!(context.len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a second write under one name is rejected, not overwritten.
    //
    // Given
    // -----
    // - "trend" written twice.
    //
    // Expect
    // ------
    // - `DuplicateContribution`; the first value survives.
    fn context_rejects_duplicate_writes() {
        let mut context = CompositionContext::new();
        context.insert("trend", tensor(1.0)).unwrap();

        let result = context.insert("trend", tensor(9.0));

        assert_eq!(result.unwrap_err(), EffectError::DuplicateContribution { name: "trend".into() });
        assert_eq!(context.get("trend"), Some(&tensor(1.0)));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a missed `require` through a view names the reader, the
    // missing key, and the available keys.
    //
    // Given
    // -----
    // - A context holding only "trend"; a view for effect "uplift" requiring
    //   "seasonal".
    //
    // Expect
    // ------
    // - `MissingContribution { effect: "uplift", key: "seasonal",
    //   available: ["trend"] }`.
    fn view_require_miss_names_reader_and_available_keys() {
        let mut context = CompositionContext::new();
        context.insert("trend", tensor(1.0)).unwrap();
        let view = context.view_for("uplift");

        let hit = view.require("trend");
        let miss = view.require("seasonal");

        assert!(hit.is_ok());
        assert_eq!(
            miss.unwrap_err(),
            EffectError::MissingContribution {
                effect: "uplift".into(),
                key: "seasonal".into(),
                available: vec!["trend".into()],
            }
        );
    }
}
