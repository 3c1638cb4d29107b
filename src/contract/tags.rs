//! Capability and behavior tags driving dispatch, broadcasting, and
//! validation.
//!
//! Purpose
//! -------
//! Every effect carries a small vocabulary of tags describing what it can
//! consume and how the engine must treat it. Tags resolve in two layers:
//! class-level defaults declared by the effect type ([`Effect::declared_tags`])
//! merged with instance-level overrides supplied at construction
//! ([`Effect::tag_overrides`]). The pipeline resolves and validates the
//! combination once at registration and freezes it for the effect's lifetime.
//!
//! Key behaviors
//! -------------
//! - [`EffectTags::default`] encodes the framework-wide defaults: effects are
//!   assumed single-series, single-column, exogenous-requiring, X-routed,
//!   horizon-filtered, and fit-optional unless they say otherwise.
//! - [`EffectTags::merged`] applies instance overrides field by field;
//!   instance wins wherever it speaks.
//! - [`EffectTags::validate`] rejects invalid combinations as configuration
//!   errors naming the effect. Requiring exogenous data while routing the
//!   target is the canonical invalid pair.
//! - [`AppliesTo`] parses case-insensitively from the conventional short and
//!   long routing names.
//!
//! Invariants & assumptions
//! ------------------------
//! - Resolved tags never change after registration; the engine caches them on
//!   the registered node and consults the cache, not the effect.
//! - `panel_hyperpriors` is informational: it signals that an effect pools
//!   hyperpriors across series but does not change dispatch.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the default table, merge precedence, combination
//!   validation, and routing parsing.
use crate::contract::{
    effect::Effect,
    errors::{EffectError, EffectResult},
};
use std::str::FromStr;

/// Which data the engine routes into an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliesTo {
    /// The exogenous block `X`, column-selected by the effect's selector.
    Exogenous,
    /// The target block `y`; at predict time this is the stored training
    /// target.
    Target,
}

impl std::fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppliesTo::Exogenous => write!(f, "exogenous"),
            AppliesTo::Target => write!(f, "target"),
        }
    }
}

impl FromStr for AppliesTo {
    type Err = EffectError;

    /// Parse a routing name, case-insensitively.
    ///
    /// Accepts `"x"`/`"exog"`/`"exogenous"` and `"y"`/`"target"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" | "exog" | "exogenous" => Ok(AppliesTo::Exogenous),
            "y" | "target" => Ok(AppliesTo::Target),
            _ => Err(EffectError::UnknownAppliesTo { value: s.to_string() }),
        }
    }
}

/// Resolved tag set for one effect.
///
/// Fields
/// ------
/// - `panel_capable`: effect natively consumes the whole
///   `(series, time, features)` block; when `false` the engine partitions by
///   series and replicates.
/// - `multivariate_capable`: effect natively consumes multiple columns; when
///   `false` the engine partitions matched columns and replicates.
/// - `requires_exogenous`: effect is skipped (no fit, no contribution) when
///   no column matches its selector or no exogenous data was supplied.
/// - `applies_to`: which block the engine routes in.
/// - `filter_horizon_at_transform`: prepared rows are restricted to the
///   forecast horizon before `transform` on prediction passes.
/// - `requires_fit_before_transform`: transforming an unfitted replica is a
///   state error.
/// - `panel_hyperpriors`: informational; the effect pools hyperpriors across
///   series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectTags {
    /// Consumes the full panel block natively.
    pub panel_capable: bool,
    /// Consumes multiple columns natively.
    pub multivariate_capable: bool,
    /// Skipped when no exogenous column matches.
    pub requires_exogenous: bool,
    /// Which block is routed in.
    pub applies_to: AppliesTo,
    /// Rows restricted to the horizon before transform on predict passes.
    pub filter_horizon_at_transform: bool,
    /// Transform before fit is a state error.
    pub requires_fit_before_transform: bool,
    /// Pools hyperpriors across series (informational).
    pub panel_hyperpriors: bool,
}

impl Default for EffectTags {
    fn default() -> EffectTags {
        EffectTags {
            panel_capable: false,
            multivariate_capable: false,
            requires_exogenous: true,
            applies_to: AppliesTo::Exogenous,
            filter_horizon_at_transform: true,
            requires_fit_before_transform: false,
            panel_hyperpriors: false,
        }
    }
}

impl EffectTags {
    /// Resolve an effect's tags: class-level declarations merged with
    /// instance-level overrides.
    pub fn resolve(effect: &dyn Effect) -> EffectTags {
        effect.declared_tags().merged(&effect.tag_overrides())
    }

    /// Apply instance overrides on top of these tags; the override wins for
    /// every field it sets.
    pub fn merged(mut self, overrides: &TagOverrides) -> EffectTags {
        if let Some(panel_capable) = overrides.panel_capable {
            self.panel_capable = panel_capable;
        }
        if let Some(multivariate_capable) = overrides.multivariate_capable {
            self.multivariate_capable = multivariate_capable;
        }
        if let Some(requires_exogenous) = overrides.requires_exogenous {
            self.requires_exogenous = requires_exogenous;
        }
        if let Some(applies_to) = overrides.applies_to {
            self.applies_to = applies_to;
        }
        if let Some(filter) = overrides.filter_horizon_at_transform {
            self.filter_horizon_at_transform = filter;
        }
        if let Some(requires_fit) = overrides.requires_fit_before_transform {
            self.requires_fit_before_transform = requires_fit;
        }
        if let Some(panel_hyperpriors) = overrides.panel_hyperpriors {
            self.panel_hyperpriors = panel_hyperpriors;
        }
        self
    }

    /// Validate the tag combination for the named effect.
    ///
    /// # Errors
    /// - [`EffectError::InvalidTagCombination`] when the effect requires
    ///   exogenous data while routing the target: the skip rule is defined by
    ///   exogenous column matching and cannot apply to `y`.
    pub fn validate(&self, effect: &str) -> EffectResult<()> {
        if self.requires_exogenous && self.applies_to == AppliesTo::Target {
            return Err(EffectError::InvalidTagCombination {
                effect: effect.to_string(),
                reason: "cannot require exogenous data while routing the target",
            });
        }
        Ok(())
    }
}

/// Instance-level tag overrides; `None` defers to the class declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagOverrides {
    /// Override for panel capability.
    pub panel_capable: Option<bool>,
    /// Override for multivariate capability.
    pub multivariate_capable: Option<bool>,
    /// Override for the requires-exogenous skip rule.
    pub requires_exogenous: Option<bool>,
    /// Override for the routing target.
    pub applies_to: Option<AppliesTo>,
    /// Override for horizon filtering before transform.
    pub filter_horizon_at_transform: Option<bool>,
    /// Override for the fit-before-transform requirement.
    pub requires_fit_before_transform: Option<bool>,
    /// Override for the hyperprior pooling flag.
    pub panel_hyperpriors: Option<bool>,
}

impl TagOverrides {
    /// Overrides that defer everything to the class declaration.
    pub fn none() -> TagOverrides {
        TagOverrides::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The framework-wide default tag table.
    // - Merge precedence of instance overrides.
    // - Combination validation.
    // - Case-insensitive routing parsing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the default tag table; broadcasting semantics depend on every one
    // of these values.
    //
    // Given
    // -----
    // - `EffectTags::default()`.
    //
    // Expect
    // ------
    // - Single-series, single-column, exogenous-requiring, X-routed,
    //   horizon-filtered, fit-optional, no hyperprior pooling.
    fn default_table_matches_framework_assumptions() {
        let tags = EffectTags::default();

        assert!(!tags.panel_capable);
        assert!(!tags.multivariate_capable);
        assert!(tags.requires_exogenous);
        assert_eq!(tags.applies_to, AppliesTo::Exogenous);
        assert!(tags.filter_horizon_at_transform);
        assert!(!tags.requires_fit_before_transform);
        assert!(!tags.panel_hyperpriors);
    }

    #[test]
    // Purpose
    // -------
    // Verify that instance overrides win field by field and leave unset
    // fields at the class declaration.
    //
    // Given
    // -----
    // - Defaults merged with overrides setting panel capability and routing.
    //
    // Expect
    // ------
    // - Overridden fields change; the rest stay at their defaults.
    fn merged_applies_instance_overrides_field_by_field() {
        let overrides = TagOverrides {
            panel_capable: Some(true),
            applies_to: Some(AppliesTo::Target),
            requires_exogenous: Some(false),
            ..TagOverrides::none()
        };

        let merged = EffectTags::default().merged(&overrides);

        assert!(merged.panel_capable);
        assert_eq!(merged.applies_to, AppliesTo::Target);
        assert!(!merged.requires_exogenous);
        assert!(!merged.multivariate_capable);
        assert!(merged.filter_horizon_at_transform);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the canonical invalid combination is rejected and names the
    // effect.
    //
    // Given
    // -----
    // - Tags routing the target while requiring exogenous data.
    //
    // Expect
    // ------
    // - `InvalidTagCombination` naming the effect.
    fn validate_rejects_target_routing_with_exogenous_requirement() {
        let tags = EffectTags { applies_to: AppliesTo::Target, ..EffectTags::default() };

        let result = tags.validate("trend");

        assert_eq!(
            result.unwrap_err(),
            EffectError::InvalidTagCombination {
                effect: "trend".into(),
                reason: "cannot require exogenous data while routing the target",
            }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify that the target routing passes validation once the exogenous
    // requirement is dropped.
    //
    // Given
    // -----
    // - Target routing with `requires_exogenous = false`.
    //
    // Expect
    // ------
    // - `Ok(())`.
    fn validate_accepts_target_routing_without_exogenous_requirement() {
        let tags = EffectTags {
            applies_to: AppliesTo::Target,
            requires_exogenous: false,
            ..EffectTags::default()
        };

        assert!(tags.validate("trend").is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify case-insensitive routing parsing and the unknown-value error.
    //
    // Given
    // -----
    // - The accepted long/short names in mixed case, plus an unknown value.
    //
    // Expect
    // ------
    // - Correct variants for every accepted spelling; `UnknownAppliesTo` for
    //   the rest.
    fn applies_to_parses_case_insensitively() {
        assert_eq!("X".parse::<AppliesTo>().unwrap(), AppliesTo::Exogenous);
        assert_eq!("Exogenous".parse::<AppliesTo>().unwrap(), AppliesTo::Exogenous);
        assert_eq!("y".parse::<AppliesTo>().unwrap(), AppliesTo::Target);
        assert_eq!("TARGET".parse::<AppliesTo>().unwrap(), AppliesTo::Target);
        assert_eq!(
            "both".parse::<AppliesTo>().unwrap_err(),
            EffectError::UnknownAppliesTo { value: "both".into() }
        );
    }
}
