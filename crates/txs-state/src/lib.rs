//! # txs-state — Transaction Life-Cycle State Machine
//!
//! Governs how an entity's status column may change, and stamps every
//! accepted change with a version and timestamps.
//!
//! ## Components
//!
//! - **Catalog** (`catalog.rs`): the fixed Approve/Cancel outcome for each
//!   of the nine states. Shared, immutable, `'static`.
//!
//! - **Engine** (`machine.rs`): `TxStateMachine` holds the current state and
//!   applies guarded SetState, unconditional ForceState, and the two verbs.
//!   Accepted changes are reported through a `StateSetter`.
//!
//! - **Clock** (`clock.rs`): `VersionClock`, a version counter that advances
//!   at most once per logical operation.
//!
//! - **Host embedding** (`field.rs`, `state_clock.rs`): `StateField` is a
//!   state column with a lazily bootstrapped machine; `StateClock` adds the
//!   versioned clock. Hosts hold one as a named field and forward verbs.
//!
//! - **Bootstrap policy** (`config.rs`): how an empty or unrecognized stored
//!   label is turned into a starting state.
//!
//! ## Concurrency
//!
//! Everything mutates through `&mut self`; callers serialize access to one
//! entity the same way they serialize access to the entity itself.
//!
//! ## Example
//!
//! ```
//! use txs_state::StateClock;
//!
//! let mut record = StateClock::new();
//! record.approve().unwrap();
//! assert_eq!(record.state(), "active");
//! assert_eq!(record.version(), 1);
//!
//! let err = record.cancel().unwrap_err();
//! assert_eq!(err.to_string(), "cannot cancel active state");
//! ```

pub mod catalog;
pub mod clock;
pub mod config;
pub mod field;
pub mod machine;
pub mod state_clock;

pub use catalog::{Outcome, TransitionCatalog, TransitionRule};
pub use clock::VersionClock;
pub use config::{BootstrapPolicy, InvalidStatePolicy};
pub use field::StateField;
pub use machine::{FnSetter, StateSetter, TxStateMachine};
pub use state_clock::StateClock;

// Core types callers need alongside the machine.
pub use txs_core::{ErrorKind, SetterError, TimeSource, Timestamp, TxAction, TxError, TxState};
