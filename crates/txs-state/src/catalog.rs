//! # Transition Catalog
//!
//! The fixed Approve/Cancel outcome for each of the nine states.
//!
//! ```text
//! state             approve                       cancel
//! ─────────────────────────────────────────────────────────────────────────
//! pending           active                        canceled
//! modify_pending    active                        active
//! active            ✗ already active              ✗ cannot cancel active state
//! canceled          ✗ already canceled            ✗ cannot cancel canceled state
//! remove_pending    removed                       active
//! removed           ✗ already removed             ✗ already removed
//! inactive_pending  inactive                      active
//! inactive          ✗ already inactive            ✗ already inactive
//! active_pending    active                        inactive
//! ```
//!
//! This table is the only place these rules are written down. The engine
//! consults it and never re-encodes any of it.

use txs_core::{TxAction, TxError, TxState};

/// Result of applying one verb in one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The verb moves the machine to this state.
    Next(TxState),
    /// The verb is refused for this reason.
    Refused(&'static str),
}

impl Outcome {
    /// The target state, if the verb is allowed.
    pub fn target(&self) -> Option<TxState> {
        match self {
            Self::Next(state) => Some(*state),
            Self::Refused(_) => None,
        }
    }
}

/// The Approve and Cancel outcomes of one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    /// Outcome of Approve.
    pub approve: Outcome,
    /// Outcome of Cancel.
    pub cancel: Outcome,
}

/// Immutable table of transition rules, indexed by state.
#[derive(Debug)]
pub struct TransitionCatalog {
    rules: [TransitionRule; 9],
}

use Outcome::{Next, Refused};

/// Rules in `TxState::ALL` order.
static CATALOG: TransitionCatalog = TransitionCatalog {
    rules: [
        // pending
        TransitionRule {
            approve: Next(TxState::Active),
            cancel: Next(TxState::Canceled),
        },
        // modify_pending
        TransitionRule {
            approve: Next(TxState::Active),
            cancel: Next(TxState::Active),
        },
        // active
        TransitionRule {
            approve: Refused("already active"),
            cancel: Refused("cannot cancel active state"),
        },
        // canceled
        TransitionRule {
            approve: Refused("already canceled"),
            cancel: Refused("cannot cancel canceled state"),
        },
        // remove_pending
        TransitionRule {
            approve: Next(TxState::Removed),
            cancel: Next(TxState::Active),
        },
        // removed
        TransitionRule {
            approve: Refused("already removed"),
            cancel: Refused("already removed"),
        },
        // inactive_pending
        TransitionRule {
            approve: Next(TxState::Inactive),
            cancel: Next(TxState::Active),
        },
        // inactive
        TransitionRule {
            approve: Refused("already inactive"),
            cancel: Refused("already inactive"),
        },
        // active_pending
        TransitionRule {
            approve: Next(TxState::Active),
            cancel: Next(TxState::Inactive),
        },
    ],
};

impl TransitionCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static TransitionCatalog {
        &CATALOG
    }

    /// The rule for `state`.
    pub fn rule(&self, state: TxState) -> &TransitionRule {
        // Discriminants follow declaration order, which is `TxState::ALL` order.
        &self.rules[state as usize]
    }

    /// Resolve Approve from `state` to its target, or the refusal as an error.
    pub fn approve(&self, state: TxState) -> Result<TxState, TxError> {
        resolve(self.rule(state).approve, TxAction::Approve, state)
    }

    /// Resolve Cancel from `state` to its target, or the refusal as an error.
    pub fn cancel(&self, state: TxState) -> Result<TxState, TxError> {
        resolve(self.rule(state).cancel, TxAction::Cancel, state)
    }
}

fn resolve(outcome: Outcome, action: TxAction, from: TxState) -> Result<TxState, TxError> {
    match outcome {
        Next(target) => Ok(target),
        Refused(reason) => Err(TxError::Transition {
            action,
            from: Some(from),
            reason,
        }),
    }
}
