//! # State Machine Engine
//!
//! Holds the current [`TxState`] and applies the four kinds of change:
//!
//! - **Approve / Cancel**: verb-driven, resolved through the
//!   [`TransitionCatalog`].
//! - **SetState**: guarded direct assignment. Only the entry points into a
//!   pending state are assignable, and only from the state that state hangs
//!   off:
//!
//!   ```text
//!   ∅ (uninitialized) ──▶ pending
//!   active            ──▶ modify_pending | remove_pending | inactive_pending
//!   inactive          ──▶ active_pending
//!   ```
//!
//!   `active`, `canceled`, `removed` and `inactive` are never assignable;
//!   they are reached through Approve/Cancel only.
//! - **ForceState**: unconditional overwrite for administrative correction.
//!
//! ## Setter
//!
//! Every accepted change is reported through a [`StateSetter`], which the
//! host implements to write the new label onto its own field. The setter is
//! borrowed per call rather than stored, so the host can own both the
//! machine and the field the setter writes to. The in-memory state advances
//! *before* the setter runs; a setter error is returned as-is and the state
//! is not rolled back.

use txs_core::{SetterError, TxAction, TxError, TxState};

use crate::catalog::TransitionCatalog;

/// Capability the machine uses to record an accepted state on its host.
pub trait StateSetter {
    /// Record `state` as the host's current state.
    fn assign_state(&mut self, state: TxState) -> Result<(), SetterError>;
}

/// No host to notify.
impl StateSetter for () {
    fn assign_state(&mut self, _state: TxState) -> Result<(), SetterError> {
        Ok(())
    }
}

/// A raw stored state column.
impl StateSetter for String {
    fn assign_state(&mut self, state: TxState) -> Result<(), SetterError> {
        self.clear();
        self.push_str(state.as_str());
        Ok(())
    }
}

impl StateSetter for Option<TxState> {
    fn assign_state(&mut self, state: TxState) -> Result<(), SetterError> {
        *self = Some(state);
        Ok(())
    }
}

impl<S: StateSetter + ?Sized> StateSetter for &mut S {
    fn assign_state(&mut self, state: TxState) -> Result<(), SetterError> {
        (**self).assign_state(state)
    }
}

/// Adapts a closure into a [`StateSetter`].
pub struct FnSetter<F>(pub F);

impl<F> StateSetter for FnSetter<F>
where
    F: FnMut(TxState) -> Result<(), SetterError>,
{
    fn assign_state(&mut self, state: TxState) -> Result<(), SetterError> {
        (self.0)(state)
    }
}

impl<F> std::fmt::Debug for FnSetter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnSetter(..)")
    }
}

/// Reason attached to every refused direct assignment.
const UNABLE_TO_SET: &str = "unable to set state";

/// The transaction life-cycle state machine.
#[derive(Debug, Clone)]
pub struct TxStateMachine {
    current: Option<TxState>,
    catalog: &'static TransitionCatalog,
}

impl TxStateMachine {
    /// Construct a machine from a stored label, notifying `setter` of it.
    ///
    /// The empty string bootstraps an uninitialized machine and does not
    /// notify. Any legal label is adopted as-is, then re-applied through
    /// [`set_state`](Self::set_state)'s equal-state branch, which calls the
    /// setter once.
    ///
    /// # Errors
    ///
    /// [`TxError::Validation`] if `initial` is neither empty nor a legal
    /// label; a setter failure is propagated.
    pub fn new<S>(initial: &str, setter: &mut S) -> Result<Self, TxError>
    where
        S: StateSetter + ?Sized,
    {
        let initial = TxState::parse_optional(initial)?;
        let mut machine = Self {
            current: initial,
            catalog: TransitionCatalog::global(),
        };
        if let Some(state) = initial {
            machine.set_state(state, setter)?;
        }
        Ok(machine)
    }

    /// Construct a machine with no setter.
    pub fn detached(initial: &str) -> Result<Self, TxError> {
        Self::new(initial, &mut ())
    }

    /// Construct an uninitialized machine.
    pub fn uninitialized() -> Self {
        Self {
            current: None,
            catalog: TransitionCatalog::global(),
        }
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Guarded direct assignment.
    ///
    /// Assigning the current state succeeds without change and still calls
    /// the setter.
    ///
    /// # Errors
    ///
    /// [`TxError::Transition`] ("unable to set state") if `new_state` is not
    /// assignable from the current state; a setter failure is propagated.
    pub fn set_state<S>(&mut self, new_state: TxState, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        if self.current == Some(new_state) {
            return setter.assign_state(new_state).map_err(TxError::Setter);
        }
        if !self.assignable(new_state) {
            return Err(TxError::Transition {
                action: TxAction::Assign(new_state),
                from: self.current,
                reason: UNABLE_TO_SET,
            });
        }
        self.apply(new_state, "set_state", setter)
    }

    /// [`set_state`](Self::set_state) from a raw label.
    pub fn set_state_str<S>(&mut self, new_state: &str, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        self.set_state(new_state.parse()?, setter)
    }

    /// Unconditionally overwrite the current state.
    pub fn force_state<S>(&mut self, new_state: TxState, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        self.apply(new_state, "force_state", setter)
    }

    /// [`force_state`](Self::force_state) from a raw label.
    ///
    /// # Errors
    ///
    /// [`TxError::Validation`] if `new_state` is not a legal label.
    pub fn force_state_str<S>(&mut self, new_state: &str, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        self.force_state(new_state.parse()?, setter)
    }

    /// Apply the Approve verb.
    ///
    /// # Errors
    ///
    /// [`TxError::Uninitialized`] without a current state, or the catalog's
    /// [`TxError::Transition`] refusal. The state is unchanged on error.
    pub fn approve<S>(&mut self, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        let from = self.current.ok_or(TxError::Uninitialized)?;
        let to = self.catalog.approve(from)?;
        self.apply(to, "approve", setter)
    }

    /// Apply the Cancel verb.
    ///
    /// # Errors
    ///
    /// As for [`approve`](Self::approve).
    pub fn cancel<S>(&mut self, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        let from = self.current.ok_or(TxError::Uninitialized)?;
        let to = self.catalog.cancel(from)?;
        self.apply(to, "cancel", setter)
    }

    fn assignable(&self, target: TxState) -> bool {
        match target {
            TxState::ModifyPending | TxState::RemovePending | TxState::InactivePending => {
                self.current == Some(TxState::Active)
            }
            TxState::ActivePending => self.current == Some(TxState::Inactive),
            TxState::Pending => self.current.is_none(),
            TxState::Active | TxState::Canceled | TxState::Removed | TxState::Inactive => false,
        }
    }

    fn apply<S>(&mut self, to: TxState, op: &'static str, setter: &mut S) -> Result<(), TxError>
    where
        S: StateSetter + ?Sized,
    {
        let from = self.current.replace(to);
        tracing::debug!(
            op,
            from = from.map_or("", |s| s.as_str()),
            to = to.as_str(),
            "tx state changed"
        );
        setter.assign_state(to).map_err(TxError::Setter)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The current state, `None` while uninitialized.
    pub fn current(&self) -> Option<TxState> {
        self.current
    }

    /// Whether the machine has a current state.
    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the current state is `state`.
    pub fn equal(&self, state: TxState) -> bool {
        self.current == Some(state)
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

    /// Whether the current state is one of the five `*_pending` states.
    pub fn is_pending_kind(&self) -> bool {
        self.current.is_some_and(|s| s.is_pending_kind())
    }
}

impl Default for TxStateMachine {
    fn default() -> Self {
        Self::uninitialized()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
