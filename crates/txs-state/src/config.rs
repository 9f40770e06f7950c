//! # Bootstrap Configuration
//!
//! Decides which state a lazily-initialized machine starts from, given the
//! raw label its host loaded from storage.
//!
//! Two policies ship:
//!
//! - **Lenient** (default): empty → `pending`, unrecognized → `inactive`.
//!   Suited to existing records whose column may hold legacy values.
//! - **Strict**: empty → `pending`, unrecognized → validation error.
//!
//! The policy deserializes from any serde format, e.g. JSON:
//!
//! ```json
//! { "empty_state": "pending", "invalid_state": { "coerce": "inactive" } }
//! ```

use serde::{Deserialize, Serialize};

use txs_core::{TxError, TxState};

/// What to do with a stored label that is not one of the nine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidStatePolicy {
    /// Start from this state instead.
    Coerce(TxState),
    /// Fail initialization.
    Reject,
}

/// How a machine bootstraps from a stored label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapPolicy {
    /// State adopted when the stored label is empty.
    pub empty_state: TxState,
    /// Handling of unrecognized stored labels.
    pub invalid_state: InvalidStatePolicy,
}

impl BootstrapPolicy {
    /// Empty → `pending`, unrecognized → `inactive`.
    pub const fn lenient() -> Self {
        Self {
            empty_state: TxState::Pending,
            invalid_state: InvalidStatePolicy::Coerce(TxState::Inactive),
        }
    }

    /// Empty → `pending`, unrecognized → error.
    pub const fn strict() -> Self {
        Self {
            empty_state: TxState::Pending,
            invalid_state: InvalidStatePolicy::Reject,
        }
    }

    /// The state to bootstrap from for a stored label.
    ///
    /// # Errors
    ///
    /// [`TxError::Validation`] for an unrecognized label under
    /// [`InvalidStatePolicy::Reject`].
    pub fn resolve(&self, stored: &str) -> Result<TxState, TxError> {
        let resolved = self.peek(stored);
        if let Ok(state) = &resolved {
            if !stored.is_empty() && stored != state.as_str() {
                tracing::warn!(
                    stored,
                    fallback = state.as_str(),
                    "unrecognized stored tx state, coercing"
                );
            }
        }
        resolved
    }

    /// [`resolve`](Self::resolve) without logging, for read-only queries.
    pub fn peek(&self, stored: &str) -> Result<TxState, TxError> {
        if stored.is_empty() {
            return Ok(self.empty_state);
        }
        match (stored.parse::<TxState>(), self.invalid_state) {
            (Ok(state), _) => Ok(state),
            (Err(_), InvalidStatePolicy::Coerce(fallback)) => Ok(fallback),
            (Err(err), InvalidStatePolicy::Reject) => Err(err),
        }
    }
}

impl Default for BootstrapPolicy {
    fn default() -> Self {
        Self::lenient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txs_core::ErrorKind;

    #[test]
    fn test_lenient_resolution() {
        let policy = BootstrapPolicy::lenient();
        assert_eq!(policy.resolve("").unwrap(), TxState::Pending);
        assert_eq!(policy.resolve("removed").unwrap(), TxState::Removed);
        assert_eq!(policy.resolve("legacy_value").unwrap(), TxState::Inactive);
    }

    #[test]
    fn test_strict_resolution() {
        let policy = BootstrapPolicy::strict();
        assert_eq!(policy.resolve("").unwrap(), TxState::Pending);
        assert_eq!(policy.resolve("active").unwrap(), TxState::Active);
        let err = policy.resolve("legacy_value").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_peek_agrees_with_resolve() {
        for policy in [BootstrapPolicy::lenient(), BootstrapPolicy::strict()] {
            for stored in ["", "pending", "inactive", "garbage"] {
                assert_eq!(policy.peek(stored).ok(), policy.resolve(stored).ok());
            }
        }
    }

    #[test]
    fn test_default_is_lenient() {
        assert_eq!(BootstrapPolicy::default(), BootstrapPolicy::lenient());
    }

    #[test]
    fn test_policy_from_yaml() {
        let policy: BootstrapPolicy = serde_yaml::from_str("invalid_state: reject\n").unwrap();
        assert_eq!(policy, BootstrapPolicy::strict());

        let policy: BootstrapPolicy =
            serde_yaml::from_str("empty_state: active_pending\n").unwrap();
        assert_eq!(policy.empty_state, TxState::ActivePending);
        assert_eq!(policy.invalid_state, BootstrapPolicy::lenient().invalid_state);
    }

    #[test]
    fn test_coerce_policy_from_json() {
        let policy: BootstrapPolicy =
            serde_json::from_str(r#"{"invalid_state":{"coerce":"canceled"}}"#).unwrap();
        assert_eq!(policy.empty_state, TxState::Pending);
        assert_eq!(
            policy.invalid_state,
            InvalidStatePolicy::Coerce(TxState::Canceled)
        );
    }

    #[test]
    fn test_policy_from_json_rejects_unknown_fields() {
        let policy: BootstrapPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, BootstrapPolicy::lenient());
        assert!(serde_json::from_str::<BootstrapPolicy>(r#"{"fallback":"inactive"}"#).is_err());
    }
}
