//! Per-PC execution counts.

use std::collections::BTreeMap;

use serde::Serialize;

/// Number of times each PC was executed.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct PcHistogram {
    counts: BTreeMap<u64, u64>,
}

impl PcHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one execution of `pc`.
    pub fn record(&mut self, pc: u64) {
        *self.counts.entry(pc).or_insert(0) += 1;
    }

    /// Executions of `pc`.
    pub fn count(&self, pc: u64) -> u64 {
        self.counts.get(&pc).copied().unwrap_or(0)
    }

    /// `(pc, count)` pairs in ascending PC order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&pc, &n)| (pc, n))
    }

    /// Number of distinct PCs.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
