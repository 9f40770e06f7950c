//! # State Clock
//!
//! [`StateField`] and [`VersionClock`] composed into the one value a host
//! entity embeds. Every successful mutating verb ticks the clock once; a
//! failed verb leaves both the state and the clock untouched.
//!
//! ## Persisted Shape
//!
//! ```text
//! state       string (≤ 32 chars)
//! version     unsigned integer
//! created_at  nullable timestamp
//! updated_at  nullable timestamp
//! ```
//!
//! The machine and the tick flag are not persisted; a reloaded clock
//! bootstraps again on first use and may tick once.

use serde::{Deserialize, Serialize};

use txs_core::{SystemTime, TimeSource, Timestamp, TxError, TxState};

use crate::clock::VersionClock;
use crate::config::BootstrapPolicy;
use crate::field::StateField;

/// A state column with version and timestamps, for embedding in an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = "T: Default"))]
pub struct StateClock<T = SystemTime> {
    state: StateField,
    #[serde(flatten)]
    clock: VersionClock,
    #[serde(skip)]
    time: T,
}

impl StateClock {
    /// A fresh entity: empty state, version 0, lenient bootstrap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored columns.
    pub fn restore(
        state: impl Into<String>,
        version: u64,
        created_at: Option<Timestamp>,
        updated_at: Option<Timestamp>,
    ) -> Self {
        Self {
            state: StateField::from_stored(state),
            clock: VersionClock::restore(version, created_at, updated_at),
            time: SystemTime,
        }
    }
}

impl<T: TimeSource> StateClock<T> {
    /// Replace the bootstrap policy. Has no effect once the machine exists.
    pub fn with_policy(mut self, policy: BootstrapPolicy) -> Self {
        self.state = self.state.with_policy(policy);
        self
    }

    /// Read "now" from `time` instead.
    pub fn with_time_source<U: TimeSource>(self, time: U) -> StateClock<U> {
        StateClock {
            state: self.state,
            clock: self.clock,
            time,
        }
    }

    /// See [`StateField::ensure_initialized`].
    pub fn ensure_initialized(&mut self) -> Result<(), TxError> {
        self.state.ensure_initialized()
    }

    fn ticking<F>(&mut self, f: F) -> Result<(), TxError>
    where
        F: FnOnce(&mut StateField) -> Result<(), TxError>,
    {
        f(&mut self.state)?;
        self.clock.tick(&self.time);
        Ok(())
    }

    // ── Mutations ───────────────────────────────────────────────────

    pub fn pending(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::pending)
    }

    pub fn modify_pending(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::modify_pending)
    }

    pub fn remove_pending(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::remove_pending)
    }

    pub fn inactive_pending(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::inactive_pending)
    }

    pub fn active_pending(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::active_pending)
    }

    /// Guarded direct assignment, then tick.
    pub fn set_state(&mut self, new_state: TxState) -> Result<(), TxError> {
        self.ticking(|field| field.set_state(new_state))
    }

    /// Unconditional overwrite, then tick.
    pub fn force_state(&mut self, new_state: TxState) -> Result<(), TxError> {
        self.ticking(|field| field.force_state(new_state))
    }

    pub fn force_state_str(&mut self, new_state: &str) -> Result<(), TxError> {
        self.ticking(|field| field.force_state_str(new_state))
    }

    pub fn approve(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::approve)
    }

    pub fn cancel(&mut self) -> Result<(), TxError> {
        self.ticking(StateField::cancel)
    }

    /// Start a new logical operation: the next successful verb ticks again.
    pub fn reset_tick(&mut self) {
        self.clock.reset_tick();
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// The raw state column.
    pub fn state(&self) -> &str {
        self.state.as_str()
    }

    pub fn field(&self) -> &StateField {
        &self.state
    }

    pub fn clock(&self) -> &VersionClock {
        &self.clock
    }

    pub fn version(&self) -> u64 {
        self.clock.version()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.clock.created_at()
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.clock.updated_at()
    }

    pub fn current(&self) -> Option<TxState> {
        self.state.current()
    }

    pub fn equal(&self, state: TxState) -> bool {
        self.state.equal(state)
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_modify_pending(&self) -> bool {
        self.state.is_modify_pending()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_canceled(&self) -> bool {
        self.state.is_canceled()
    }

    pub fn is_remove_pending(&self) -> bool {
        self.state.is_remove_pending()
    }

    pub fn is_removed(&self) -> bool {
        self.state.is_removed()
    }

    pub fn is_inactive_pending(&self) -> bool {
        self.state.is_inactive_pending()
    }

    pub fn is_inactive(&self) -> bool {
        self.state.is_inactive()
    }

    pub fn is_active_pending(&self) -> bool {
        self.state.is_active_pending()
    }

    pub fn is_pending_kind(&self) -> bool {
        self.state.is_pending_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txs_core::{ErrorKind, ManualTime};

    fn start() -> Timestamp {
        Timestamp::parse("2026-05-04T08:00:00Z").unwrap()
    }

    fn clock_with(time: &ManualTime) -> StateClock<ManualTime> {
        StateClock::new().with_time_source(time.clone())
    }

    #[test]
    fn test_fresh_clock_untouched_until_first_verb() {
        let clock = StateClock::new();
        assert_eq!(clock.version(), 0);
        assert_eq!(clock.created_at(), None);
        assert!(clock.is_pending());
        assert_eq!(clock.state(), "");
    }

    #[test]
    fn test_successful_verb_ticks() {
        let time = ManualTime::starting_at(start());
        let mut clock = clock_with(&time);
        clock.approve().unwrap();
        assert_eq!(clock.version(), 1);
        assert_eq!(clock.created_at(), Some(start()));
        assert_eq!(clock.updated_at(), Some(start()));
    }

    #[test]
    fn test_failed_verb_does_not_tick() {
        let time = ManualTime::starting_at(start());
        let mut clock = clock_with(&time);
        clock.force_state(TxState::Active).unwrap();
        clock.reset_tick();

        let err = clock.cancel().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transition);
        assert_eq!(clock.version(), 1);
        assert!(!clock.clock().is_ticked());
    }

    #[test]
    fn test_one_tick_per_operation() {
        let time = ManualTime::starting_at(start());
        let mut clock = clock_with(&time);
        clock.approve().unwrap();
        clock.modify_pending().unwrap();
        clock.approve().unwrap();
        assert_eq!(clock.version(), 1);

        clock.reset_tick();
        time.advance_micros(1);
        clock.inactive_pending().unwrap();
        assert_eq!(clock.version(), 2);
        assert_eq!(clock.created_at(), Some(start()));
        assert!(clock.updated_at() > clock.created_at());
    }

    #[test]
    fn test_validation_error_does_not_tick() {
        let mut clock = StateClock::new();
        let err = clock.force_state_str("paused").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(clock.version(), 0);
    }

    #[test]
    fn test_restore_resumes_versioning() {
        let created = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        let time = ManualTime::starting_at(start());
        let mut clock =
            StateClock::restore("active", 7, Some(created), Some(created)).with_time_source(time);
        clock.remove_pending().unwrap();
        assert_eq!(clock.version(), 8);
        assert_eq!(clock.created_at(), Some(created));
        assert_eq!(clock.updated_at(), Some(start()));
        assert_eq!(clock.state(), "remove_pending");
    }

    #[test]
    fn test_strict_policy_surfaces_bad_column() {
        let mut clock = StateClock::restore("unknown", 3, None, None)
            .with_policy(BootstrapPolicy::strict());
        assert!(clock.ensure_initialized().is_err());
        assert!(clock.approve().is_err());
        assert_eq!(clock.version(), 3);
    }
}
