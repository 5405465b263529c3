//! Deadlines for long-running read queries.
//!
//! Write paths never partially apply, so they do not take a deadline; read
//! paths that scan large ranges (trial balance, audit queries) accept one
//! and abort cleanly when it expires.

use std::time::{Duration, Instant};

/// A point in time after which a query should give up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Instant);

impl Deadline {
    /// Creates a deadline that expires after the given duration.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    /// Creates a deadline from an absolute instant.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Returns true if the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Returns the time remaining, or zero if expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}
