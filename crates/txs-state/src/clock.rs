//! # Versioned Clock
//!
//! A version counter with created/updated stamps that advances at most once
//! per logical operation.
//!
//! A logical operation (typically one request against one entity) may call
//! several mutating verbs; only the first successful one ticks. The caller
//! marks the start of the next operation with [`VersionClock::reset_tick`].
//!
//! ## Invariants
//!
//! - `version` never decreases.
//! - `created_at` is set by the first tick and never overwritten.
//! - `updated_at` is refreshed by every tick.

use serde::{Deserialize, Serialize};

use txs_core::{TimeSource, Timestamp};

/// Version counter and timestamps for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionClock {
    version: u64,
    #[serde(skip)]
    ticked: bool,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
}

impl VersionClock {
    /// A clock that has never ticked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a clock from stored columns. The tick flag starts cleared.
    pub fn restore(
        version: u64,
        created_at: Option<Timestamp>,
        updated_at: Option<Timestamp>,
    ) -> Self {
        Self {
            version,
            ticked: false,
            created_at,
            updated_at,
        }
    }

    /// Advance the version and stamp the current time, once per operation.
    ///
    /// Returns `false` without touching anything if the clock already
    /// ticked since the last [`reset_tick`](Self::reset_tick).
    pub fn tick(&mut self, time: &impl TimeSource) -> bool {
        if self.ticked {
            return false;
        }
        self.ticked = true;
        self.version = self.version.saturating_add(1);

        let now = time.now();
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
        tracing::trace!(version = self.version, at = %now, "version clock ticked");
        true
    }

    /// Allow the next tick.
    pub fn reset_tick(&mut self) {
        self.ticked = false;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the clock ticked in the current operation.
    pub fn is_ticked(&self) -> bool {
        self.ticked
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }
}
