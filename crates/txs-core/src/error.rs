//! # Error Types — Structured Error Hierarchy
//!
//! Defines the single error type returned by every txstate operation.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Validation errors carry the offending raw value.
//! - Transition errors carry the attempted action, the state the machine
//!   was in, and the human-readable rejection reason. The machine's state is
//!   never changed when one is returned.
//! - Setter errors wrap whatever the host's callback returned and display
//!   it verbatim.

use thiserror::Error;

use crate::state::TxState;

/// Error produced by a host's state setter callback.
pub type SetterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The action a rejected transition attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxAction {
    /// The Approve verb.
    Approve,
    /// The Cancel verb.
    Cancel,
    /// Guarded direct assignment to the given state.
    Assign(TxState),
}

impl std::fmt::Display for TxAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Cancel => f.write_str("cancel"),
            Self::Assign(state) => write!(f, "assign {state}"),
        }
    }
}

/// Coarse classification of a [`TxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A state string outside the nine legal labels.
    Validation,
    /// An illegal Approve, Cancel, or guarded assignment.
    Transition,
    /// An operation that needs a current state ran on an uninitialized machine.
    Uninitialized,
    /// The host's setter callback failed.
    Setter,
}

/// Top-level error type for txstate.
#[derive(Error, Debug)]
pub enum TxError {
    /// The value is not one of the nine legal state labels.
    #[error("invalid tx state {value:?}")]
    Validation {
        /// The rejected raw value.
        value: String,
    },

    /// The requested transition is not legal from the current state.
    #[error("{reason}")]
    Transition {
        /// What was attempted.
        action: TxAction,
        /// State at the time of the attempt (`None` when uninitialized).
        from: Option<TxState>,
        /// Human-readable rejection reason.
        reason: &'static str,
    },

    /// The machine has no current state to operate on.
    #[error("state machine not initialized")]
    Uninitialized,

    /// The host's setter callback returned an error.
    #[error(transparent)]
    Setter(SetterError),
}

impl TxError {
    /// Wrap an error returned by a setter callback.
    pub fn setter(err: impl Into<SetterError>) -> Self {
        Self::Setter(err.into())
    }

    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transition { .. } => ErrorKind::Transition,
            Self::Uninitialized => ErrorKind::Uninitialized,
            Self::Setter(_) => ErrorKind::Setter,
        }
    }

    /// The rejection reason, for transition errors.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Transition { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_displays_reason_only() {
        let err = TxError::Transition {
            action: TxAction::Approve,
            from: Some(TxState::Active),
            reason: "already active",
        };
        assert_eq!(err.to_string(), "already active");
        assert_eq!(err.reason(), Some("already active"));
        assert_eq!(err.kind(), ErrorKind::Transition);
    }

    #[test]
    fn test_validation_error_quotes_value() {
        let err = TxError::Validation {
            value: "approved".to_string(),
        };
        assert_eq!(err.to_string(), "invalid tx state \"approved\"");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.reason(), None);
    }

    #[test]
    fn test_setter_error_is_transparent() {
        let err = TxError::setter("column locked");
        assert_eq!(err.to_string(), "column locked");
        assert_eq!(err.kind(), ErrorKind::Setter);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(TxAction::Cancel.to_string(), "cancel");
        assert_eq!(
            TxAction::Assign(TxState::ModifyPending).to_string(),
            "assign modify_pending"
        );
    }
}
