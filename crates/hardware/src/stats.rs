//! Execution statistics collection and reporting.
//!
//! This module tracks what the step loop did for one hart. It provides:
//! 1. **Retirement:** Retired instructions and the cycles modelled 1:1 with them.
//! 2. **Control flow:** Traps and interrupts taken, debug-mode entries, trigger
//!    replays, WFI yields and serialization round-trips.
//! 3. **Front end:** Decoded-instruction cache hits and misses.

use std::fmt::Write as _;
use std::time::Instant;

use serde::Serialize;

/// Per-hart execution statistics.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Instructions retired (also the modelled cycle count).
    pub instructions_retired: u64,
    /// Step-loop batches run.
    pub batches: u64,
    /// Synchronous traps delivered (interrupts excluded).
    pub traps_taken: u64,
    /// Interrupts delivered.
    pub interrupts_taken: u64,
    /// Debug-mode entries, any cause.
    pub debug_entries: u64,
    /// Memory instructions replayed after a trigger match.
    pub trigger_replays: u64,
    /// Batches ended by `wfi`.
    pub wfi_yields: u64,
    /// Instructions that asked to be re-run after serialization.
    pub serializations: u64,
    /// Icache hits.
    pub icache_hits: u64,
    /// Icache refills.
    pub icache_misses: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
            batches: 0,
            traps_taken: 0,
            interrupts_taken: 0,
            debug_entries: 0,
            trigger_replays: 0,
            wfi_yields: 0,
            serializations: 0,
            icache_hits: 0,
            icache_misses: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to [`SimStats::report`] to include all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "control", "frontend"];

impl SimStats {
    /// Formats the requested sections.
    ///
    /// # Arguments
    ///
    /// * `sections` - Section names from [`STATS_SECTIONS`], or empty for all.
    pub fn report(&self, sections: &[&str]) -> String {
        let want = |s: &str| sections.is_empty() || sections.contains(&s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let mut out = String::new();

        if want("summary") {
            let mips = if seconds > 0.0 {
                self.instructions_retired as f64 / seconds / 1_000_000.0
            } else {
                0.0
            };
            let _ = writeln!(out, "host_seconds             {seconds:.4} s");
            let _ = writeln!(out, "sim_insts                {}", self.instructions_retired);
            let _ = writeln!(out, "sim_cycles               {}", self.instructions_retired);
            let _ = writeln!(out, "sim_batches              {}", self.batches);
            let _ = writeln!(out, "sim_mips                 {mips:.2}");
        }
        if want("control") {
            let _ = writeln!(out, "traps                    {}", self.traps_taken);
            let _ = writeln!(out, "interrupts               {}", self.interrupts_taken);
            let _ = writeln!(out, "debug_entries            {}", self.debug_entries);
            let _ = writeln!(out, "trigger_replays          {}", self.trigger_replays);
            let _ = writeln!(out, "wfi_yields               {}", self.wfi_yields);
            let _ = writeln!(out, "serializations           {}", self.serializations);
        }
        if want("frontend") {
            let total = self.icache_hits + self.icache_misses;
            let miss_rate = if total > 0 {
                self.icache_misses as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "icache accesses: {total:<10} | hits: {:<10} | miss_rate: {miss_rate:.2}%",
                self.icache_hits
            );
        }
        out
    }

    /// Prints every section to stdout.
    pub fn print(&self) {
        print!("{}", self.report(&[]));
    }
}
