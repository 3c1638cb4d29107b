//! contract — the effect lifecycle, capability tags, and composition context.
//!
//! Purpose
//! -------
//! Define what a model component is: the [`Effect`] trait with its
//! fit/transform/predict lifecycle, the declarative tag vocabulary the
//! broadcasting engine plans around, the transform output union, the ordered
//! composition context effects read each other through, and two reference
//! implementations that exist to be copied.
//!
//! Key behaviors
//! -------------
//! - Effects declare capabilities through [`EffectTags`]; instances refine
//!   them through [`TagOverrides`]; [`EffectTags::resolve`] merges the two
//!   and is the only view the pipeline consults.
//! - `transform` outputs travel as a [`TransformOutput`] union so effects
//!   can hand `predict` a plain tensor, a tensor with positional extras, or
//!   a keyed bundle.
//! - Contributions of earlier effects reach later ones through a
//!   [`ContextView`], which names the reading effect in every missed lookup.
//!
//! Invariants & assumptions
//! ------------------------
//! - `predict` is `&self` and all randomness flows through the sampler, so
//!   one fitted effect yields reproducible passes under a seeded sampler.
//! - Contributions carry a trailing axis of one; the pipeline checks this
//!   after every predict call.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no logging; all diagnostics travel in
//!   [`EffectError`] values.
//!
//! Downstream usage
//! ----------------
//! - `pipeline::composite` drives the lifecycle; effect authors implement
//!   [`Effect`] and usually nothing else.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover trait defaults, tag resolution, context
//!   bookkeeping, and the reference effects' arithmetic; end-to-end
//!   lifecycle coverage lives in the pipeline integration tests.

pub mod context;
pub mod effect;
pub mod errors;
pub mod reference;
pub mod tags;
pub mod transform;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::context::{CompositionContext, ContextView};
pub use self::effect::{Effect, EffectMode, ParamMap, ParamValue};
pub use self::errors::{EffectError, EffectResult};
pub use self::reference::{AffineEffect, MeanCenteredEffect};
pub use self::tags::{AppliesTo, EffectTags, TagOverrides};
pub use self::transform::TransformOutput;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use ts_effects::contract::prelude::*;
//
// to import the main contract surface in a single line.

pub mod prelude {
    pub use super::context::{CompositionContext, ContextView};
    pub use super::effect::{Effect, EffectMode, ParamMap, ParamValue};
    pub use super::errors::{EffectError, EffectResult};
    pub use super::reference::{AffineEffect, MeanCenteredEffect};
    pub use super::tags::{AppliesTo, EffectTags, TagOverrides};
    pub use super::transform::TransformOutput;
}
