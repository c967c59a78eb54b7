//! Trap Handling Logic.
//!
//! This module implements trap delivery for the hart. It performs the
//! following:
//! 1. **Debug Mode:** Traps raised in debug mode never reach the trap CSRs;
//!    they park the hart in the debug ROM.
//! 2. **Delegation:** Traps from S- or U-mode whose `medeleg`/`mideleg` bit is
//!    set are handled in S-mode, everything else in M-mode.
//! 3. **Context Saving:** Writes `xepc`/`xcause`/`xtval` and pushes the
//!    interrupt-enable stack (`xPIE`, `xPP`).
//! 4. **Interrupt Selection:** Picks the pending, enabled interrupt to take.
//! 5. **Return Handling:** `mret` and `sret`.

use tracing::{debug, trace};

use super::Cpu;
use super::state::StepMode;
use crate::common::Trap;
use crate::common::constants::{DEBUG_ROM_ENTRY, DEBUG_ROM_TVEC};
use crate::core::arch::csr;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::trap::TrapHandler;

/// Handler address for a trap vector register value.
fn vector_target(tvec: u64, trap: &Trap) -> u64 {
    let base = tvec & !3;
    if tvec & 1 != 0 && trap.is_interrupt() {
        base + 4 * trap.code()
    } else {
        base
    }
}

impl Cpu {
    /// Delivers a trap.
    ///
    /// # Arguments
    ///
    /// * `trap` - The exception or interrupt being taken.
    /// * `epc` - Address of the instruction the trap is attributed to.
    pub fn take_trap(&mut self, trap: Trap, epc: u64) {
        if self.state.debug_mode {
            self.state.pc = if matches!(trap, Trap::Breakpoint(_)) {
                DEBUG_ROM_ENTRY
            } else {
                DEBUG_ROM_TVEC
            };
            debug!(hart = self.id, %trap, "trap in debug mode at {epc:#x}");
            return;
        }

        if trap.is_interrupt() {
            self.stats.interrupts_taken += 1;
        } else {
            self.stats.traps_taken += 1;
        }

        let deleg = if trap.is_interrupt() {
            self.csrs.mideleg
        } else {
            self.csrs.medeleg
        };
        let prv = self.state.prv;
        let to_supervisor = prv <= PrivilegeMode::Supervisor && (deleg >> trap.code()) & 1 != 0;

        let mut mstatus = self.csrs.mstatus;
        if to_supervisor {
            self.csrs.scause = trap.cause();
            self.csrs.sepc = epc;
            self.csrs.stval = trap.tval();

            if mstatus & csr::MSTATUS_SIE != 0 {
                mstatus |= csr::MSTATUS_SPIE;
            } else {
                mstatus &= !csr::MSTATUS_SPIE;
            }
            if prv == PrivilegeMode::Supervisor {
                mstatus |= csr::MSTATUS_SPP;
            } else {
                mstatus &= !csr::MSTATUS_SPP;
            }
            mstatus &= !csr::MSTATUS_SIE;

            self.state.prv = PrivilegeMode::Supervisor;
            self.state.pc = vector_target(self.csrs.stvec, &trap);
        } else {
            self.csrs.mcause = trap.cause();
            self.csrs.mepc = epc;
            self.csrs.mtval = trap.tval();

            if mstatus & csr::MSTATUS_MIE != 0 {
                mstatus |= csr::MSTATUS_MPIE;
            } else {
                mstatus &= !csr::MSTATUS_MPIE;
            }
            mstatus &= !csr::MSTATUS_MPP;
            mstatus |= u64::from(prv.to_u8()) << csr::MSTATUS_MPP_SHIFT;
            mstatus &= !csr::MSTATUS_MIE;

            self.state.prv = PrivilegeMode::Machine;
            self.state.pc = vector_target(self.csrs.mtvec, &trap);
        }
        self.csrs.mstatus = mstatus;

        debug!(
            hart = self.id,
            %trap,
            from = %prv,
            to = %self.state.prv,
            "trap taken at {epc:#x}, handler {:#x}",
            self.state.pc
        );
    }

    /// The interrupt the hart should take now, if any.
    ///
    /// Machine-level interrupts (not delegated) are enabled below M-mode or in
    /// M-mode with `mstatus.MIE`; delegated ones below S-mode or in S-mode with
    /// `mstatus.SIE`. Nothing is taken in debug mode, nor while
    /// single-stepping unless `dcsr.stepie` is set.
    pub fn pending_interrupt(&self) -> Option<Trap> {
        if self.state.debug_mode
            || (self.state.single_step != StepMode::None && !self.csrs.dcsr.stepie)
        {
            return None;
        }

        let pending = self.csrs.mip & self.csrs.mie;
        if pending == 0 {
            return None;
        }

        let prv = self.state.prv;
        let mstatus = self.csrs.mstatus;

        let m_enabled = prv < PrivilegeMode::Machine
            || (prv == PrivilegeMode::Machine && mstatus & csr::MSTATUS_MIE != 0);
        let mut enabled = if m_enabled {
            pending & !self.csrs.mideleg
        } else {
            0
        };

        if enabled == 0 {
            let s_enabled = prv < PrivilegeMode::Supervisor
                || (prv == PrivilegeMode::Supervisor && mstatus & csr::MSTATUS_SIE != 0);
            if s_enabled {
                enabled = pending & self.csrs.mideleg;
            }
        }

        TrapHandler::highest_priority(enabled)
    }

    /// Raises the pending interrupt, if one is enabled.
    ///
    /// # Errors
    ///
    /// The interrupt, for the step loop to deliver.
    pub(crate) fn take_pending_interrupt(&self) -> Result<(), Trap> {
        match self.pending_interrupt() {
            Some(irq) => {
                trace!(hart = self.id, %irq, "interrupt pending");
                Err(irq)
            }
            None => Ok(()),
        }
    }

    /// Returns from an M-mode trap handler. Sets `state.pc` to `mepc`.
    pub(crate) fn do_mret(&mut self) {
        self.state.pc = self.csrs.mepc & !1;
        let mstatus = self.csrs.mstatus;
        let mpp = (mstatus & csr::MSTATUS_MPP) >> csr::MSTATUS_MPP_SHIFT;

        self.state.prv = PrivilegeMode::from_u8(mpp as u8);
        let mut new_mstatus = mstatus;
        if mstatus & csr::MSTATUS_MPIE != 0 {
            new_mstatus |= csr::MSTATUS_MIE;
        } else {
            new_mstatus &= !csr::MSTATUS_MIE;
        }
        new_mstatus |= csr::MSTATUS_MPIE;
        new_mstatus &= !csr::MSTATUS_MPP;
        self.csrs.mstatus = new_mstatus;
    }

    /// Returns from an S-mode trap handler. Sets `state.pc` to `sepc`.
    pub(crate) fn do_sret(&mut self) {
        self.state.pc = self.csrs.sepc & !1;
        let mstatus = self.csrs.mstatus;

        self.state.prv = if mstatus & csr::MSTATUS_SPP != 0 {
            PrivilegeMode::Supervisor
        } else {
            PrivilegeMode::User
        };
        let mut new_mstatus = mstatus;
        if mstatus & csr::MSTATUS_SPIE != 0 {
            new_mstatus |= csr::MSTATUS_SIE;
        } else {
            new_mstatus &= !csr::MSTATUS_SIE;
        }
        new_mstatus |= csr::MSTATUS_SPIE;
        new_mstatus &= !csr::MSTATUS_SPP;
        self.csrs.mstatus = new_mstatus;
    }
}
