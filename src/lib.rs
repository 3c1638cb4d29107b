//! ts_effects — composable effect framework for structural time-series models.
//!
//! Purpose
//! -------
//! Provide the component layer of a Bayesian structural time-series model:
//! trend, seasonality, and regressor terms implemented as interchangeable
//! "effects" that one pipeline fits on shared training data and predicts
//! over shared horizons. The crate owns the lifecycle contract, the
//! capability tags, the series/column broadcasting engine, and the ordered
//! composition of contributions into one aggregate; effect authors supply
//! only the mathematics of their component.
//!
//! Key behaviors
//! -------------
//! - One trait ([`contract::Effect`]) defines the whole component contract:
//!   optional `fit`, optional `transform`, mandatory `predict`.
//! - Declarative tags describe what an effect can consume; the engine
//!   replicates effects across series and columns to close the gap between
//!   declared capability and the data actually present.
//! - Effects compose in registration order through an append-only context,
//!   so later effects can transform the output of earlier ones.
//! - All randomness flows through site-addressed samplers
//!   ([`sampling::Sampler`]); seeded passes are exactly reproducible.
//!
//! Invariants & assumptions
//! ------------------------
//! - Data containers are validated at construction; the engine and effects
//!   rely on their invariants without re-checking.
//! - Prediction never mutates fitted state; `predict_all` takes `&self`.
//! - The crate is single-threaded and performs no I/O and no logging; all
//!   diagnostics travel in error values.
//!
//! Conventions
//! -----------
//! - Dense payloads are `ndarray` arrays wrapped in the two-variant
//!   [`data::Tensor`] union; contributions carry a trailing axis of one.
//! - Each domain module exposes a `prelude` for single-line imports.
//!
//! Downstream usage
//! ----------------
//! - Model builders construct [`data::PanelFrame`]s at the boundary,
//!   register effects on an [`pipeline::EffectPipeline`], and drive
//!   `fit_all`/`predict_all`; inference machinery plugs in by implementing
//!   [`sampling::Sampler`].
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; whole-lifecycle scenarios live in
//!   `tests/integration_effect_pipeline.rs`.

pub mod contract;
pub mod data;
pub mod pipeline;
pub mod sampling;
