//! sampling — priors and the injected sampling primitive.
//!
//! Purpose
//! -------
//! Define how effects obtain latent quantities: a prior family ([`Prior`])
//! over scalar latents and a by-name draw interface ([`Sampler`]) the
//! enclosing inference loop implements. The framework stays agnostic about
//! what a draw means; the standard implementations cover seeded prior
//! sampling ([`SeedSampler`]) and deterministic mocking ([`FixedSampler`]).
//!
//! Key behaviors
//! -------------
//! - Priors validate their parameters at construction and sample through
//!   `statrs` distributions with any `rand` RNG.
//! - Site names are `/`-separated paths; [`ScopedSampler`] is how the
//!   broadcasting engine gives every replica its own namespace.
//!
//! Conventions
//! -----------
//! - No I/O and no logging; all diagnostics travel in [`PriorError`] values.
//! - Reproducibility is the caller's choice of seed, never hidden state.
//!
//! Downstream usage
//! ----------------
//! - Effect authors store a [`Prior`] per latent quantity and call
//!   `sampler.sample("name", &prior)?` inside `predict`.
//! - The inference loop passes its own [`Sampler`] implementation into
//!   `predict_all`; tests pass [`FixedSampler`] to pin contributions.

pub mod errors;
pub mod prior;
pub mod sampler;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{PriorError, PriorResult};
pub use self::prior::Prior;
pub use self::sampler::{FixedSampler, Sampler, ScopedSampler, SeedSampler};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use ts_effects::sampling::prelude::*;
//
// to import the main sampling surface in a single line.

pub mod prelude {
    pub use super::errors::{PriorError, PriorResult};
    pub use super::prior::Prior;
    pub use super::sampler::{FixedSampler, Sampler, ScopedSampler, SeedSampler};
}
