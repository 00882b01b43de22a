//! # Sequence
//!
//! Per-table counter pair. `last` is the highest id number ever issued and
//! never decreases; `count` is the number of records committed. Both move
//! only through [`Table`](crate::Table) inserts, so they cannot drift from
//! the arena except through a genesis file that lies about them, which the
//! invariant checker reports.

use serde::{Deserialize, Serialize};

/// Id sequence and record counter for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    last: u64,
    count: u64,
}

impl Sequence {
    /// Restore a sequence from persisted values.
    pub fn restore(last: u64, count: u64) -> Self {
        Self { last, count }
    }

    /// Highest id number issued so far (0 when none).
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Number of records committed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The number the next sequenced insert will use, if any remain.
    pub fn peek_next(&self) -> Option<u64> {
        self.last.checked_add(1)
    }

    pub(crate) fn record_insert(&mut self, issued: Option<u64>) {
        self.count = self.count.saturating_add(1);
        if let Some(n) = issued {
            self.last = self.last.max(n);
        }
    }
}
