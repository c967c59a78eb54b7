//! Decoded-instruction cache.
//!
//! A direct-mapped cache of fetch results indexed by `pc / 2`. Each entry
//! remembers the slot its sequential successor maps to, which lets the fast
//! path chain from one entry to the next without recomputing the index or
//! calling back into the MMU. A chain is only followed while the successor
//! slot's tag equals the PC the instruction actually produced.

use crate::common::Trap;
use crate::core::units::mmu::Mmu;
use crate::isa::decode::InsnFetch;

/// One cached fetch.
#[derive(Clone, Copy, Debug)]
pub struct ICacheEntry {
    /// Address the entry was fetched from.
    pub tag: u64,
    /// Slot of the sequentially next instruction (`tag + length`).
    pub next: usize,
    /// The decoded instruction.
    pub fetch: InsnFetch,
}

/// Direct-mapped decoded-instruction cache.
#[derive(Clone, Debug)]
pub struct ICache {
    entries: Vec<Option<ICacheEntry>>,
    mask: usize,
    /// Accesses served without refetching.
    pub hits: u64,
    /// Accesses that refilled a slot through the MMU.
    pub misses: u64,
}

impl ICache {
    /// Creates an empty cache with `entries` slots (rounded up to a power of two).
    pub fn new(entries: usize) -> Self {
        let size = entries.max(1).next_power_of_two();
        Self {
            entries: vec![None; size],
            mask: size - 1,
            hits: 0,
            misses: 0,
        }
    }

    /// Slot an address maps to.
    pub const fn index(&self, pc: u64) -> usize {
        (pc >> 1) as usize & self.mask
    }

    /// Returns the entry for `pc`, refilling its slot through `mmu` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the fetch trap of a refill.
    pub fn access(&mut self, mmu: &mut dyn Mmu, pc: u64) -> Result<ICacheEntry, Trap> {
        let idx = self.index(pc);
        if let Some(entry) = self.entries[idx]
            && entry.tag == pc
        {
            self.hits += 1;
            return Ok(entry);
        }

        self.misses += 1;
        let fetch = mmu.load_insn(pc)?;
        let entry = ICacheEntry {
            tag: pc,
            next: self.index(pc.wrapping_add(fetch.insn.length())),
            fetch,
        };
        self.entries[idx] = Some(entry);
        Ok(entry)
    }

    /// Follows `entry`'s successor link if the successor slot holds `pc`.
    pub fn next(&self, entry: &ICacheEntry, pc: u64) -> Option<ICacheEntry> {
        self.entries[entry.next].filter(|next| next.tag == pc)
    }

    /// Drops every entry (`fence.i`, or after memory holding code changed).
    pub fn flush(&mut self) {
        self.entries.fill(None);
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
