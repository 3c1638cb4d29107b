//! data — tabular containers and dense tensors for the effect framework.
//!
//! Purpose
//! -------
//! Collect the data-layer building blocks every effect pass runs on: the
//! validated panel container, the forecast horizon, typed column selection,
//! the dense tensor union, and the adapter that converts between the tabular
//! and dense worlds. The contract and pipeline layers build on top of these
//! primitives.
//!
//! Key behaviors
//! -------------
//! - Represent target and exogenous data uniformly as a panel
//!   ([`PanelFrame`]): single-series data is the one-series case of the same
//!   container, so downstream code handles one layout.
//! - Describe prediction windows as validated horizons ([`ForecastHorizon`])
//!   used both to restrict prepared rows and to size contribution tensors.
//! - Select exogenous columns through typed descriptors ([`ColumnSelector`])
//!   whose empty match drives the engine's skip path.
//! - Exchange dense payloads as a two-variant union ([`Tensor`]) so shape
//!   contracts are matched on variants, not dimension counts.
//! - Convert prepared frames into the layout an effect's capabilities demand
//!   ([`adapter::frame_to_tensor`], [`adapter::prepare`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Frames and horizons are validated at construction; consumers may rely on
//!   unique identifiers, strictly increasing indexes, dimension agreement,
//!   and finite values without re-checking.
//! - Series order is first-appearance order and is the broadcast order; time
//!   indexes are shared across series.
//!
//! Conventions
//! -----------
//! - Timestamps are `i64` ordinals ([`Timestamp`]); calendar interpretation
//!   belongs to the caller.
//! - This module performs no I/O and no logging; all diagnostics travel in
//!   [`DataError`] values.
//!
//! Downstream usage
//! ----------------
//! - The enclosing model-builder constructs [`PanelFrame`]s at the boundary
//!   where tabular data enters the framework, and a [`ForecastHorizon`] per
//!   prediction pass.
//! - Effect authors mostly see already-prepared frames; custom `transform`
//!   implementations reach for [`adapter::frame_to_tensor`].
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover construction invariants, selection and
//!   filtering semantics, tensor arithmetic guards, and adapter conversion.

pub mod adapter;
pub mod errors;
pub mod frame;
pub mod horizon;
pub mod selector;
pub mod tensor;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DataError, DataResult};
pub use self::frame::PanelFrame;
pub use self::horizon::{ForecastHorizon, Timestamp};
pub use self::selector::ColumnSelector;
pub use self::tensor::Tensor;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use ts_effects::data::prelude::*;
//
// to import the main data surface in a single line.

pub mod prelude {
    pub use super::errors::{DataError, DataResult};
    pub use super::frame::PanelFrame;
    pub use super::horizon::{ForecastHorizon, Timestamp};
    pub use super::selector::ColumnSelector;
    pub use super::tensor::Tensor;
}
