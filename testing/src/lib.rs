//! # Linkfolio Testing
//!
//! Testing utilities and helpers for Linkfolio reducers.
//!
//! This crate provides:
//!
//! - [`ReducerTest`]: fluent Given-When-Then harness for pure reducer tests
//! - [`assertions`]: helper assertions over effect lists
//! - [`FixedClock`]: a [`Clock`] pinned to a known instant
//! - [`SequentialIds`]: an [`IdGenerator`] producing predictable ids
//!
//! [`Clock`]: linkfolio_core::environment::Clock
//! [`IdGenerator`]: linkfolio_core::environment::IdGenerator


pub use reducer_test::{ReducerTest, assertions};

use chrono::{DateTime, TimeZone, Utc};
use linkfolio_core::environment::{Clock, IdGenerator};
use std::sync::atomic::{AtomicU64, Ordering};

/// A clock pinned to a fixed instant.
///
/// Defaults to 2024-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock pinned to the given instant.
    #[must_use]
    pub const fn at(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01T00:00:00Z is an unambiguous timestamp
        #[allow(clippy::unwrap_used)]
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// An id generator producing a deterministic sequence of UUIDs.
///
/// Ids are `00000000-0000-0000-0000-000000000001`, `...0002` and so on,
/// which keeps test fixtures readable.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Create a generator starting at id 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// The id that `new_id` would return on its nth call (1-based).
    #[must_use]
    pub const fn nth(n: u64) -> uuid::Uuid {
        uuid::Uuid::from_u64_pair(0, n)
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> uuid::Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        uuid::Uuid::from_u64_pair(0, n)
    }
}
