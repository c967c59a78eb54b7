//! Single-instruction execution.
//!
//! `execute_insn` runs one fetched instruction and routes what it did to the
//! trace producers:
//! 1. **Before:** Clears the per-instruction log, stashes the privilege and
//!    widths for the commit log, and checks execute triggers.
//! 2. **Retired:** Unless the handler asked to be re-run after serialization,
//!    writes the commit-log line, updates the access-period history and emits
//!    the per-micro-op instruction trace.
//! 3. **Faulted:** `wfi` retired, so its line and trace are still emitted. A
//!    memory fault from a vector memory instruction that already wrote part
//!    of its destination is emitted too. Everything else propagates untraced.
//! 4. **Histogram:** Counts the PC after every handler that returned normally.

use super::Cpu;
use crate::common::constants::PC_SERIALIZE_BEFORE;
use crate::common::{Exception, SimError};
use crate::isa::decode::InsnFetch;
use crate::isa::instruction::Insn;
use crate::trace::raw_op::{self, RetiredInsn};

impl Cpu {
    /// Executes one fetched instruction at `pc`.
    ///
    /// # Returns
    ///
    /// The next PC, or one of the serialization sentinels.
    ///
    /// # Errors
    ///
    /// Whatever the handler raised, or `Exception::Fatal` when a trace sink
    /// fails.
    pub fn execute_insn(&mut self, pc: u64, fetch: InsnFetch) -> Result<u64, Exception> {
        self.state.log.reset(self.state.prv, self.xlen, self.flen);

        if !self.state.debug_mode {
            self.triggers
                .check_execute(pc)
                .map_err(Exception::TriggerMatched)?;
        }

        let insn = fetch.insn;
        match (fetch.func)(self, insn, pc) {
            Ok(npc) => {
                if npc == PC_SERIALIZE_BEFORE {
                    self.stats.serializations += 1;
                } else {
                    self.write_commit_line(pc, insn)?;
                    let stamp = self.csrs.minstret;
                    self.tracer.access_periods.record(
                        insn.word(),
                        stamp,
                        &self.state.log.mem_read,
                        &self.state.log.mem_write,
                    );
                    self.emit_trace(pc, insn)?;
                }
                if let Some(histogram) = self.tracer.histogram.as_mut() {
                    histogram.record(pc);
                }
                Ok(npc)
            }
            Err(Exception::WaitForInterrupt) => {
                self.write_commit_line(pc, insn)?;
                self.emit_trace(pc, insn)?;
                Err(Exception::WaitForInterrupt)
            }
            Err(Exception::Trap(trap))
                if trap.is_memory_fault() && self.state.log.has_vector_generic_write() =>
            {
                self.write_commit_line(pc, insn)?;
                self.emit_trace(pc, insn)?;
                Err(Exception::Trap(trap))
            }
            Err(other) => Err(other),
        }
    }

    fn write_commit_line(&mut self, pc: u64, insn: Insn) -> Result<(), SimError> {
        if let Some(log) = self.tracer.commit_log.as_mut() {
            log.write_insn(self.id, pc, insn, &self.state.log, &self.vu)?;
        }
        Ok(())
    }

    fn emit_trace(&mut self, pc: u64, insn: Insn) -> Result<(), SimError> {
        if !self.tracer.sink.enabled() {
            return Ok(());
        }
        let retired = RetiredInsn {
            pc,
            length: insn.length(),
            word: insn.word(),
            vl: self.vu.vl,
            vtype: self.vu.vtype,
        };
        raw_op::emit(self.tracer.sink.as_mut(), &retired, &self.state.log)
            .map_err(SimError::TraceSink)
    }
}
