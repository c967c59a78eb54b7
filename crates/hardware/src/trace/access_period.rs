//! Memory access-period history.
//!
//! For every data address the hart touches, records the distance (in retired
//! instructions) between successive accesses, tagged with whether the access
//! came from a vector instruction. Only reads close an interval; a write just
//! moves the address's last-access stamp.
//!
//! The history is analysis output. Nothing on the execution path reads it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::cpu::state::MemAccess;
use crate::isa::rvv::is_vector_opcode;

/// One measured interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Period {
    /// Retired instructions since the previous access.
    pub interval: u64,
    /// The closing access came from a vector instruction.
    pub is_vector: bool,
}

/// History of one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AccessHistory {
    /// Retired-instruction stamp of the latest access.
    pub last_access: u64,
    /// The access that created the entry came from a vector instruction.
    pub is_vector: bool,
    /// Intervals closed by reads, oldest first.
    pub periods: Vec<Period>,
}

impl AccessHistory {
    fn new(stamp: u64, is_vector: bool) -> Self {
        Self {
            last_access: stamp,
            is_vector,
            periods: Vec::new(),
        }
    }
}

/// Per-address access-period table.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct AccessPeriodTracker {
    history: BTreeMap<u64, AccessHistory>,
}

impl AccessPeriodTracker {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the accesses of one retired instruction.
    ///
    /// # Arguments
    ///
    /// * `word` - Raw encoding; its major opcode classifies the accesses.
    /// * `stamp` - Retired-instruction count the accesses happen at.
    /// * `reads` - Logged loads.
    /// * `writes` - Logged stores; applied before the loads.
    ///
    /// The core stamps accesses with `minstret` at the start of a batch, so
    /// every access within one multi-instruction `step` shares a stamp.
    /// Step one instruction at a time for exact intervals.
    pub fn record(&mut self, word: u32, stamp: u64, reads: &[MemAccess], writes: &[MemAccess]) {
        let is_vector = is_vector_opcode(word);

        for access in writes {
            let _ = self
                .history
                .entry(access.addr)
                .and_modify(|h| h.last_access = stamp)
                .or_insert_with(|| AccessHistory::new(stamp, is_vector));
        }

        for access in reads {
            match self.history.get_mut(&access.addr) {
                Some(h) => {
                    h.periods.push(Period {
                        interval: stamp.wrapping_sub(h.last_access),
                        is_vector,
                    });
                    h.last_access = stamp;
                }
                None => {
                    let _ = self
                        .history
                        .insert(access.addr, AccessHistory::new(stamp, is_vector));
                }
            }
        }
    }

    /// History of one address.
    pub fn get(&self, addr: u64) -> Option<&AccessHistory> {
        self.history.get(&addr)
    }

    /// Every tracked address in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &AccessHistory)> {
        self.history.iter().map(|(&addr, h)| (addr, h))
    }

    /// Number of tracked addresses.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true when nothing has been tracked.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The table as JSON, keyed by address.
    ///
    /// # Errors
    ///
    /// Serialization failures from `serde_json`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
