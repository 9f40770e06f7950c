//! # State Field
//!
//! A host-embeddable state column with a lazily bootstrapped
//! [`TxStateMachine`] behind it.
//!
//! The host stores the raw label (whatever came out of storage) and forwards
//! the verbs it needs. On the first mutating call the field resolves the
//! stored label through its [`BootstrapPolicy`], builds the machine, and
//! from then on the machine writes every accepted state back onto the
//! column through the [`StateSetter`](crate::StateSetter) impl for `String`.
//!
//! Queries never bootstrap: before the first mutation they answer from the
//! label the policy *would* start from, and report `false` when the policy
//! rejects it.

use serde::{Deserialize, Serialize};

use txs_core::{TxError, TxState};

use crate::config::BootstrapPolicy;
use crate::machine::TxStateMachine;

/// A stored state label plus its lazily-built machine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateField {
    state: String,
    #[serde(skip)]
    machine: Option<TxStateMachine>,
    #[serde(skip)]
    policy: BootstrapPolicy,
}

impl StateField {
    /// An empty column under the lenient policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// A column holding `stored`, as loaded from storage.
    pub fn from_stored(stored: impl Into<String>) -> Self {
        Self {
            state: stored.into(),
            machine: None,
            policy: BootstrapPolicy::default(),
        }
    }

    /// Replace the bootstrap policy. Has no effect once the machine exists.
    pub fn with_policy(mut self, policy: BootstrapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The raw column value.
    pub fn as_str(&self) -> &str {
        &self.state
    }

    pub fn policy(&self) -> &BootstrapPolicy {
        &self.policy
    }

    /// Build the machine from the stored label if it does not exist yet.
    ///
    /// # Errors
    ///
    /// [`TxError::Validation`] when the policy rejects the stored label.
    pub fn ensure_initialized(&mut self) -> Result<(), TxError> {
        if self.machine.is_some() {
            return Ok(());
        }
        let start = self.policy.resolve(&self.state)?;
        let machine = TxStateMachine::new(start.as_str(), &mut self.state)?;
        tracing::debug!(state = start.as_str(), "tx state machine bootstrapped");
        self.machine = Some(machine);
        Ok(())
    }

    fn run<F>(&mut self, f: F) -> Result<(), TxError>
    where
        F: FnOnce(&mut TxStateMachine, &mut String) -> Result<(), TxError>,
    {
        self.ensure_initialized()?;
        let Self { state, machine, .. } = self;
        let machine = machine.as_mut().ok_or(TxError::Uninitialized)?;
        f(machine, state)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Assign `pending`.
    pub fn pending(&mut self) -> Result<(), TxError> {
        self.set_state(TxState::Pending)
    }

    /// Assign `modify_pending` (requires `active`).
    pub fn modify_pending(&mut self) -> Result<(), TxError> {
        self.set_state(TxState::ModifyPending)
    }

    /// Assign `remove_pending` (requires `active`).
    pub fn remove_pending(&mut self) -> Result<(), TxError> {
        self.set_state(TxState::RemovePending)
    }

    /// Assign `inactive_pending` (requires `active`).
    pub fn inactive_pending(&mut self) -> Result<(), TxError> {
        self.set_state(TxState::InactivePending)
    }

    /// Assign `active_pending` (requires `inactive`).
    pub fn active_pending(&mut self) -> Result<(), TxError> {
        self.set_state(TxState::ActivePending)
    }

    /// Guarded direct assignment.
    pub fn set_state(&mut self, new_state: TxState) -> Result<(), TxError> {
        self.run(|machine, column| machine.set_state(new_state, column))
    }

    /// Unconditional overwrite.
    pub fn force_state(&mut self, new_state: TxState) -> Result<(), TxError> {
        self.run(|machine, column| machine.force_state(new_state, column))
    }

    /// Unconditional overwrite from a raw label.
    pub fn force_state_str(&mut self, new_state: &str) -> Result<(), TxError> {
        self.force_state(new_state.parse()?)
    }

    pub fn approve(&mut self) -> Result<(), TxError> {
        self.run(|machine, column| machine.approve(column))
    }

    pub fn cancel(&mut self) -> Result<(), TxError> {
        self.run(|machine, column| machine.cancel(column))
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The current state, or the state the machine would bootstrap from.
    pub fn current(&self) -> Option<TxState> {
        match &self.machine {
            Some(machine) => machine.current(),
            None => self.policy.peek(&self.state).ok(),
        }
    }

    /// Whether the machine has been built.
    pub fn is_initialized(&self) -> bool {
        self.machine.is_some()
    }

    pub fn equal(&self, state: TxState) -> bool {
        self.current() == Some(state)
    }

    pub fn is_pending(&self) -> bool {
        self.equal(TxState::Pending)
    }

    pub fn is_modify_pending(&self) -> bool {
        self.equal(TxState::ModifyPending)
    }

    pub fn is_active(&self) -> bool {
        self.equal(TxState::Active)
    }

    pub fn is_canceled(&self) -> bool {
        self.equal(TxState::Canceled)
    }

    pub fn is_remove_pending(&self) -> bool {
        self.equal(TxState::RemovePending)
    }

    pub fn is_removed(&self) -> bool {
        self.equal(TxState::Removed)
    }

    pub fn is_inactive_pending(&self) -> bool {
        self.equal(TxState::InactivePending)
    }

    pub fn is_inactive(&self) -> bool {
        self.equal(TxState::Inactive)
    }

    pub fn is_active_pending(&self) -> bool {
        self.equal(TxState::ActivePending)
    }

    pub fn is_pending_kind(&self) -> bool {
        self.current().is_some_and(|s| s.is_pending_kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txs_core::ErrorKind;

    #[test]
    fn test_empty_column_bootstraps_pending() {
        let mut field = StateField::new();
        assert!(field.is_pending());
        assert!(!field.is_initialized());
        assert_eq!(field.as_str(), "");

        field.approve().unwrap();
        assert!(field.is_active());
        assert_eq!(field.as_str(), "active");
    }

    #[test]
    fn test_bootstrap_writes_column() {
        let mut field = StateField::new();
        field.ensure_initialized().unwrap();
        assert_eq!(field.as_str(), "pending");
    }

    #[test]
    fn test_pending_on_new_column_succeeds() {
        let mut field = StateField::new();
        field.pending().unwrap();
        assert_eq!(field.as_str(), "pending");
    }

    #[test]
    fn test_invalid_column_coerced_to_inactive() {
        let mut field = StateField::from_stored("archived");
        assert!(field.is_inactive());
        field.active_pending().unwrap();
        assert_eq!(field.as_str(), "active_pending");
    }

    #[test]
    fn test_strict_policy_refuses_invalid_column() {
        let mut field = StateField::from_stored("archived").with_policy(BootstrapPolicy::strict());
        assert_eq!(field.current(), None);
        assert!(!field.is_inactive());
        assert!(!field.is_pending_kind());

        let err = field.approve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(field.as_str(), "archived");
        assert!(!field.is_initialized());
    }

    #[test]
    fn test_guarded_assignment_leaves_column() {
        let mut field = StateField::from_stored("pending");
        let err = field.remove_pending().unwrap_err();
        assert_eq!(err.reason(), Some("unable to set state"));
        assert_eq!(field.as_str(), "pending");
    }

    #[test]
    fn test_force_state_str() {
        let mut field = StateField::from_stored("removed");
        field.force_state_str("active").unwrap();
        assert!(field.is_active());
        assert!(field.force_state_str("gone").is_err());
        assert_eq!(field.as_str(), "active");
    }

    #[test]
    fn test_serializes_as_bare_label() {
        let mut field = StateField::new();
        field.approve().unwrap();
        assert_eq!(serde_json::to_string(&field).unwrap(), "\"active\"");

        let loaded: StateField = serde_json::from_str("\"inactive_pending\"").unwrap();
        assert!(!loaded.is_initialized());
        assert!(loaded.is_inactive_pending());
    }
}
