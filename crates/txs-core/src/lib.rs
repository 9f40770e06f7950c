//! # txs-core — Foundational Types for txstate
//!
//! Defines the primitives every other txstate crate builds on. This crate
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **No bare strings for states.** `TxState` is a closed enum of the nine
//!    legal labels. Strings are parsed once, at the boundary, and any value
//!    outside the set is a [`TxError::Validation`].
//!
//! 2. **The empty string is a sentinel, not a state.** It is represented as
//!    `Option<TxState>::None` and accepted only where a machine bootstraps.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC, microsecond precision, and
//!    read through a `TimeSource` so versioned clocks are deterministic in
//!    tests.
//!
//! 4. **One error type.** `TxError` carries all four failure kinds; nothing
//!    in txstate panics or unwraps outside tests.

pub mod error;
pub mod state;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{ErrorKind, SetterError, TxAction, TxError};
pub use state::TxState;
pub use temporal::{ManualTime, SystemTime, TimeSource, Timestamp, TimestampError};
