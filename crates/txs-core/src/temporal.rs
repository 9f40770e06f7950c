//! # Temporal Types — UTC Timestamps and Time Sources
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to microseconds, and
//! the `TimeSource` seam that the versioned clock reads "now" through.
//!
//! ## Storage Invariant
//!
//! `created_at`/`updated_at` columns are commonly microsecond-precision, so
//! timestamps are truncated at construction. A value read back from storage
//! therefore compares equal to the value that was written.
//!
//! Non-UTC inputs are rejected by [`Timestamp::parse()`]; there is no silent
//! offset conversion on the strict path.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Error parsing a [`Timestamp`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The string did not end in `Z`.
    #[error("timestamp must use Z suffix (UTC only), got {0:?}")]
    NotUtc(String),
    /// The string was not RFC 3339.
    #[error("invalid RFC 3339 timestamp {value:?}: {reason}")]
    Malformed {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The epoch offset is outside chrono's representable range.
    #[error("timestamp out of range: {0} microseconds since epoch")]
    OutOfRange(i64),
}

/// A UTC-only timestamp, truncated to microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-microsecond digits.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    /// Parse an RFC 3339 string with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// Rejects explicit offsets (even `+00:00`) and malformed input.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError::NotUtc(s.to_string()));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError::Malformed {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// From microseconds since the Unix epoch.
    pub fn from_epoch_micros(micros: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp_micros(micros)
            .map(Self)
            .ok_or(TimestampError::OutOfRange(micros))
    }

    /// Microseconds since the Unix epoch.
    pub fn epoch_micros(&self) -> i64 {
        self.0.timestamp_micros()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as RFC 3339 with six fractional digits and a `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Where a clock reads the current time from.
pub trait TimeSource {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven time source.
///
/// Clones share the same instant, so a test can keep one handle and hand
/// another to the clock under test.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    micros: Arc<AtomicI64>,
}

impl ManualTime {
    /// Start at `at`.
    pub fn starting_at(at: Timestamp) -> Self {
        Self {
            micros: Arc::new(AtomicI64::new(at.epoch_micros())),
        }
    }

    /// Move the shared instant forward by `micros`.
    pub fn advance_micros(&self, micros: i64) {
        self.micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Jump the shared instant to `at`.
    pub fn set(&self, at: Timestamp) {
        self.micros.store(at.epoch_micros(), Ordering::Relaxed);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Timestamp {
        let micros = self.micros.load(Ordering::Relaxed);
        // Atomic holds a value produced by `epoch_micros`, or an offset of it.
        Timestamp::from_epoch_micros(micros).unwrap_or_else(|_| Timestamp::now())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
