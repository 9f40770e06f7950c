//! # Transaction State Labels
//!
//! Defines `TxState`, the closed set of nine life-cycle labels a host
//! entity's status field may hold.
//!
//! ## Lifecycle Paths
//!
//! ```text
//! pending ──▶ active (or canceled)
//! active ──▶ modify_pending ──▶ active
//! active ──▶ remove_pending ──▶ removed
//! active ──▶ inactive_pending ──▶ inactive
//! inactive ──▶ active_pending ──▶ active
//! ```
//!
//! ## Storage Invariant
//!
//! Every label is stored as its snake_case string and MUST NOT exceed
//! [`TxState::MAX_LEN`] characters. The empty string is not a label: it is
//! the "uninitialized" sentinel, which is modeled as `Option<TxState>::None`
//! at the engine level and never as a variant here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TxError;

/// One of the nine life-cycle labels of a transactional entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxState {
    /// Newly created, awaiting first approval.
    Pending,
    /// An active record with a modification awaiting approval.
    ModifyPending,
    /// Approved and live.
    Active,
    /// Rejected before it ever became active.
    Canceled,
    /// An active record with a removal awaiting approval.
    RemovePending,
    /// Removal approved.
    Removed,
    /// An active record with a deactivation awaiting approval.
    InactivePending,
    /// Deactivation approved.
    Inactive,
    /// An inactive record with a reactivation awaiting approval.
    ActivePending,
}

impl TxState {
    /// All nine labels in declaration order.
    pub const ALL: [TxState; 9] = [
        Self::Pending,
        Self::ModifyPending,
        Self::Active,
        Self::Canceled,
        Self::RemovePending,
        Self::Removed,
        Self::InactivePending,
        Self::Inactive,
        Self::ActivePending,
    ];

    /// Upper bound on the stored length of any label.
    pub const MAX_LEN: usize = 32;

    /// The stored string form of this label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ModifyPending => "modify_pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::RemovePending => "remove_pending",
            Self::Removed => "removed",
            Self::InactivePending => "inactive_pending",
            Self::Inactive => "inactive",
            Self::ActivePending => "active_pending",
        }
    }

    /// Whether this is one of the five states awaiting a follow-up decision.
    pub const fn is_pending_kind(&self) -> bool {
        matches!(
            self,
            Self::Pending
                | Self::ModifyPending
                | Self::RemovePending
                | Self::InactivePending
                | Self::ActivePending
        )
    }

    /// Parse a stored label, treating the empty string as the
    /// uninitialized sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`TxError::Validation`] for any non-empty string that is not
    /// one of the nine labels.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, TxError> {
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl FromStr for TxState {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| TxError::Validation {
                value: s.to_string(),
            })
    }
}

impl TryFrom<&str> for TxState {
    type Error = TxError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl AsRef<str> for TxState {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for TxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_labels_parse_back() {
        for state in TxState::ALL {
            assert_eq!(state.as_str().parse::<TxState>().unwrap(), state);
        }
    }

    #[test]
    fn test_labels_fit_storage_column() {
        for state in TxState::ALL {
            assert!(state.as_str().len() <= TxState::MAX_LEN);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        for bad in ["", "Active", "ACTIVE", "approved", " active", "active ", "deleted"] {
            let err = bad.parse::<TxState>().unwrap_err();
            assert!(matches!(err, TxError::Validation { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_parse_optional_empty_is_sentinel() {
        assert_eq!(TxState::parse_optional("").unwrap(), None);
        assert_eq!(
            TxState::parse_optional("inactive").unwrap(),
            Some(TxState::Inactive)
        );
        assert!(TxState::parse_optional("nope").is_err());
    }

    #[test]
    fn test_pending_kind() {
        let pending: Vec<_> = TxState::ALL
            .iter()
            .filter(|s| s.is_pending_kind())
            .map(|s| s.as_str())
            .collect();
        assert_eq!(
            pending,
            [
                "pending",
                "modify_pending",
                "remove_pending",
                "inactive_pending",
                "active_pending"
            ]
        );
        assert!(TxState::ALL
            .iter()
            .filter(|s| s.is_pending_kind())
            .all(|s| s.as_str().ends_with("pending")));
    }

    #[test]
    fn test_display_matches_stored_form() {
        assert_eq!(TxState::InactivePending.to_string(), "inactive_pending");
        assert_eq!(format!("{}", TxState::Canceled), "canceled");
    }

    #[test]
    fn test_serde_uses_stored_form() {
        let json = serde_json::to_string(&TxState::RemovePending).unwrap();
        assert_eq!(json, "\"remove_pending\"");
        let parsed: TxState = serde_json::from_str("\"active_pending\"").unwrap();
        assert_eq!(parsed, TxState::ActivePending);
        assert!(serde_json::from_str::<TxState>("\"bogus\"").is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Only the nine stored labels parse; every other string is rejected.
        #[test]
        fn parse_accepts_exactly_the_nine_labels(s in "[a-z_]{0,20}") {
            let known = TxState::ALL.iter().any(|state| state.as_str() == s);
            prop_assert_eq!(s.parse::<TxState>().is_ok(), known);
        }

        /// Parsing is case-sensitive.
        #[test]
        fn parse_rejects_uppercase(idx in 0usize..9) {
            let upper = TxState::ALL[idx].as_str().to_uppercase();
            prop_assert!(upper.parse::<TxState>().is_err());
        }
    }
}
