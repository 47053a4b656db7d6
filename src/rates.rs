//! Session-scoped store of hypothetical forward rates per settlement month
//!
//! The curve outlives contract-term edits: user-entered scenario rates
//! survive a tenor or start-date change, and entries for months that drop
//! out of the settlement calendar are simply never read again (orphaned,
//! not deleted). A seed of 0.0 means "unset"; consumers treat a
//! non-positive rate as unresolved rather than a zero-P&L rate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::MonthKey;

/// Hypothetical forward rate per settlement month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCurve {
    seed: f64,
    entries: BTreeMap<MonthKey, f64>,
}

impl RateCurve {
    /// Curve whose untouched months read as unset (0.0)
    pub fn new() -> Self {
        Self::with_seed(0.0)
    }

    /// Curve seeded with a deployment-configured starting rate
    ///
    /// The seed applies uniformly: every month not explicitly set reads as
    /// the seed, and resetting a month restores the seed.
    pub fn with_seed(seed: f64) -> Self {
        Self {
            seed,
            entries: BTreeMap::new(),
        }
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    /// Rate for a month, falling back to the seed when never set
    pub fn get(&self, key: MonthKey) -> f64 {
        self.entries.get(&key).copied().unwrap_or(self.seed)
    }

    /// True when the month carries a usable (positive) rate
    pub fn is_resolved(&self, key: MonthKey) -> bool {
        self.get(key) > 0.0
    }

    /// Store a rate; `None` (blank form submission) resets to the seed
    ///
    /// Expiry-month rejection happens in the session layer, where the
    /// current settlement calendar is known. The curve itself is plain
    /// storage with last-write-wins semantics.
    pub fn set(&mut self, key: MonthKey, rate: Option<f64>) {
        match rate {
            Some(r) => {
                self.entries.insert(key, r);
            }
            None => {
                self.entries.insert(key, self.seed);
            }
        }
    }

    /// Months that have been explicitly touched, in chronological order
    pub fn touched_months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for RateCurve {
    fn default() -> Self {
        Self::new()
    }
}
