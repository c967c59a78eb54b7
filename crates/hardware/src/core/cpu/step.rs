//! The fetch/execute loop.
//!
//! `step(n)` retires up to `n` instructions in batches. Each batch runs on one
//! of two paths:
//! 1. **Slow path:** One fetch per instruction through the `Mmu`. Used while
//!    interactive debugging, single-stepping, or in debug mode; handles the
//!    single-step state machine and logs disassembly.
//! 2. **Fast path:** Follows the icache's successor links for as long as the
//!    next entry's tag matches the PC the previous instruction produced.
//!
//! Both paths finish every instruction through the same PC-advance rule, and
//! every exception a batch raises is handled in one place, [`Cpu::dispatch`].
//! After each batch `minstret` and `mcycle` advance by the instructions the
//! batch retired.

use tracing::{debug, info, trace};

use super::Cpu;
use super::state::StepMode;
use crate::common::constants::{PC_SERIALIZE_AFTER, PC_SERIALIZE_BEFORE};
use crate::common::{Exception, SimError, Trap};
use crate::core::units::triggers::TriggerAction;
use crate::isa::disasm::disassemble;
use crate::isa::privileged::cause;

/// How the loop proceeds after an instruction returned a next PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcAdvance {
    /// Ordinary next PC: the instruction retired.
    Next(u64),
    /// The instruction did not retire; re-fetch it once serialized.
    SerializeBefore,
    /// The instruction retired and left its next PC in `state.pc`; re-fetch.
    SerializeAfter,
}

impl PcAdvance {
    /// Classifies a handler's return value. Real PCs are even.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidPcSentinel` for an odd value that is not a sentinel.
    pub fn classify(npc: u64) -> Result<Self, SimError> {
        match npc {
            PC_SERIALIZE_BEFORE => Ok(Self::SerializeBefore),
            PC_SERIALIZE_AFTER => Ok(Self::SerializeAfter),
            _ if npc & 1 != 0 => Err(SimError::InvalidPcSentinel(npc)),
            _ => Ok(Self::Next(npc)),
        }
    }
}

/// Progress of the batch being run.
#[derive(Clone, Copy, Debug)]
struct Batch {
    /// Quota: the batch stops once `instret` reaches it.
    quota: u64,
    /// Instructions retired so far.
    instret: u64,
    /// PC of the instruction in flight, or the value it returned.
    pc: u64,
}

impl Cpu {
    /// Returns true when the next batch must take the slow path.
    pub fn slow_path(&self) -> bool {
        self.interactive_debug
            || self.state.single_step != StepMode::None
            || self.state.debug_mode
    }

    /// Executes up to `n` instructions.
    ///
    /// # Returns
    ///
    /// Instructions retired. Fewer than `n` when a trap ended a batch or the
    /// hart yielded on `wfi`.
    ///
    /// # Errors
    ///
    /// A [`SimError`] when a handler broke the next-PC contract or a trace
    /// sink failed. The hart's state is then unspecified and the caller is
    /// expected to stop simulating.
    pub fn step(&mut self, n: u64) -> Result<u64, SimError> {
        self.check_halt_requests();

        let mut remaining = n;
        let mut total = 0;
        while remaining > 0 {
            let mut batch = Batch {
                quota: remaining,
                instret: 0,
                pc: self.state.pc,
            };

            if let Err(e) = self.run_batch(&mut batch) {
                self.dispatch(e, &mut batch)?;
            }

            self.csrs.minstret = self.csrs.minstret.wrapping_add(batch.instret);
            self.csrs.mcycle = self.csrs.mcycle.wrapping_add(batch.instret);
            self.stats.batches += 1;
            total += batch.instret;
            remaining = batch.quota.saturating_sub(batch.instret);
        }

        self.stats.instructions_retired += total;
        self.stats.icache_hits = self.icache.hits;
        self.stats.icache_misses = self.icache.misses;
        Ok(total)
    }

    /// Applies the PC-advance rule to `batch.pc`.
    ///
    /// # Returns
    ///
    /// `false` when the batch must end so the next instruction is re-fetched.
    fn advance_pc(&mut self, batch: &mut Batch) -> Result<bool, SimError> {
        match PcAdvance::classify(batch.pc)? {
            PcAdvance::Next(npc) => {
                self.state.pc = npc;
                batch.instret += 1;
                Ok(true)
            }
            PcAdvance::SerializeBefore => {
                self.state.serialized = true;
                batch.pc = self.state.pc;
                Ok(false)
            }
            PcAdvance::SerializeAfter => {
                batch.instret += 1;
                batch.pc = self.state.pc;
                Ok(false)
            }
        }
    }

    fn run_batch(&mut self, batch: &mut Batch) -> Result<(), Exception> {
        self.take_pending_interrupt()?;

        if self.slow_path() {
            while batch.instret < batch.quota {
                if !self.state.serialized && self.state.single_step == StepMode::Stepped {
                    self.state.single_step = StepMode::None;
                    if !self.state.debug_mode {
                        self.enter_debug_mode(cause::debug::STEP);
                        break;
                    }
                }
                if self.state.single_step == StepMode::Stepping {
                    self.state.single_step = StepMode::Stepped;
                }

                let fetch = self.mmu.load_insn(batch.pc)?;
                if self.interactive_debug && !self.state.serialized {
                    info!(
                        "core{:>4}: {:#018x} ({:#010x}) {}",
                        self.id,
                        batch.pc,
                        fetch.insn.bits(),
                        disassemble(fetch.insn)
                    );
                }
                batch.pc = self.execute_insn(batch.pc, fetch)?;
                if !self.advance_pc(batch)? {
                    break;
                }
            }
        } else {
            while batch.instret < batch.quota {
                let mut entry = self.icache.access(self.mmu.as_mut(), batch.pc)?;
                loop {
                    batch.pc = self.execute_insn(batch.pc, entry.fetch)?;
                    match self.icache.next(&entry, batch.pc) {
                        Some(next) if batch.instret + 1 != batch.quota => {
                            batch.instret += 1;
                            self.state.pc = batch.pc;
                            entry = next;
                        }
                        _ => break,
                    }
                }
                if !self.advance_pc(batch)? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Re-runs the instruction whose data access matched a trigger. The
    /// recorded match keeps the trigger from firing again.
    fn replay(&mut self, batch: &mut Batch) -> Result<(), Exception> {
        let fetch = self.mmu.load_insn(batch.pc)?;
        batch.pc = self.execute_insn(batch.pc, fetch)?;
        let _ = self.advance_pc(batch)?;
        Ok(())
    }

    /// Handles the exception that ended a batch.
    fn dispatch(&mut self, exception: Exception, batch: &mut Batch) -> Result<(), SimError> {
        match exception {
            Exception::Trap(trap) => {
                self.take_trap(trap, batch.pc);
                batch.quota = batch.instret;
                if self.state.single_step == StepMode::Stepped {
                    self.state.single_step = StepMode::None;
                    self.enter_debug_mode(cause::debug::STEP);
                }
            }
            Exception::TriggerMatched(hit) => {
                if self.triggers.matched().is_some() {
                    self.stats.trigger_replays += 1;
                    debug!(hart = self.id, %hit, "replaying instruction after trigger match");
                    let replayed = self.replay(batch);
                    self.triggers.clear_matched();
                    if let Err(e) = replayed {
                        return self.dispatch(e, batch);
                    }
                }
                match hit.action {
                    TriggerAction::DebugMode => self.enter_debug_mode(cause::debug::HWBP),
                    TriggerAction::DebugException => {
                        self.take_trap(Trap::Breakpoint(hit.address), batch.pc);
                    }
                }
            }
            Exception::DebugMode => self.enter_debug_mode(cause::debug::SWBP),
            Exception::WaitForInterrupt => {
                batch.instret += 1;
                batch.quota = batch.instret;
                self.stats.wfi_yields += 1;
                trace!(hart = self.id, "yielding on wfi at {:#x}", batch.pc);
            }
            Exception::Fatal(e) => return Err(e),
        }
        Ok(())
    }
}
