//! pipeline — broadcast planning and the composite fit/predict surface.
//!
//! Purpose
//! -------
//! Turn a bag of registered effects into one model: plan how each effect
//! maps onto the series and columns actually present
//! ([`broadcast::BroadcastPlan`]), then run shared fit and predict passes
//! over the whole collection ([`composite::EffectPipeline`]).
//!
//! Key behaviors
//! -------------
//! - Planning is tag-driven: effects without panel or multivariate
//!   capability are replicated per series and per column, and every replica
//!   is keyed so later passes find its fitted state.
//! - Passes run in registration order; contributions flow through the
//!   composition context and fold into one aggregate.
//! - Tensor contracts are enforced at the engine boundary, after `transform`
//!   and after `predict`, with errors naming the offending effect.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything here is single-threaded; prediction borrows the pipeline
//!   immutably for the whole pass.
//!
//! Conventions
//! -----------
//! - This module performs no I/O and no logging; all diagnostics travel in
//!   error values.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover planning and the pass mechanics; whole-lifecycle
//!   scenarios live in `tests/integration_effect_pipeline.rs`.

pub mod broadcast;
pub mod composite;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::broadcast::{BroadcastPlan, DataSlice, ReplicaKey, SeriesGroup};
pub use self::composite::{EffectPipeline, PredictOutcome};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use ts_effects::pipeline::prelude::*;
//
// to import the main pipeline surface in a single line.

pub mod prelude {
    pub use super::broadcast::{BroadcastPlan, DataSlice, ReplicaKey, SeriesGroup};
    pub use super::composite::{EffectPipeline, PredictOutcome};
}
