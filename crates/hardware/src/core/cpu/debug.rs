//! Debug-mode entry and exit.
//!
//! A hart enters debug mode on an external halt request, the sticky
//! `dcsr.halt` bit, a completed single step, `ebreak` with the matching
//! `dcsr.ebreak*` bit, or a trigger with the debug-mode action. Entry saves
//! the PC in `dpc`, the cause and privilege in `dcsr`, switches to M-mode and
//! parks the hart at the debug ROM entry. `dret` undoes it.

use tracing::debug;

use super::Cpu;
use super::state::{HaltRequest, StepMode};
use crate::common::constants::{DEBUG_ROM_ENTRY, PC_SERIALIZE_AFTER};
use crate::core::arch::mode::PrivilegeMode;
use crate::isa::privileged::cause;

impl Cpu {
    /// Enters debug mode with `cause` (see `cause::debug`).
    pub fn enter_debug_mode(&mut self, cause: u8) {
        self.state.debug_mode = true;
        self.csrs.dcsr.write_cause_and_prv(cause, self.state.prv);
        self.state.prv = PrivilegeMode::Machine;
        self.csrs.dpc = self.state.pc;
        self.state.pc = DEBUG_ROM_ENTRY;
        self.stats.debug_entries += 1;
        debug!(
            hart = self.id,
            cause,
            "entered debug mode, dpc {:#x}",
            self.csrs.dpc
        );
    }

    /// Honours halt requests at the start of a `step` call. Regular requests
    /// win over group requests, which win over `dcsr.halt`. An honoured
    /// request is consumed; `dcsr.halt` stays set until software clears it.
    pub(crate) fn check_halt_requests(&mut self) {
        if self.state.debug_mode {
            return;
        }
        match std::mem::take(&mut self.halt_request) {
            HaltRequest::Regular => self.enter_debug_mode(cause::debug::DEBUGINT),
            HaltRequest::Group => self.enter_debug_mode(cause::debug::GROUP),
            HaltRequest::None if self.csrs.dcsr.halt => self.enter_debug_mode(cause::debug::HALT),
            HaltRequest::None => {}
        }
    }

    /// Leaves debug mode: resumes at `dpc` in `dcsr.prv`, arming a single
    /// step when `dcsr.step` is set.
    ///
    /// # Returns
    ///
    /// `PC_SERIALIZE_AFTER`; the resume PC is in `state.pc`.
    pub(crate) fn do_dret(&mut self) -> u64 {
        self.state.pc = self.csrs.dpc;
        self.state.prv = self.csrs.dcsr.prv;
        self.state.debug_mode = false;
        if self.csrs.dcsr.step {
            self.state.single_step = StepMode::Stepping;
        }
        debug!(hart = self.id, "left debug mode, resuming at {:#x}", self.state.pc);
        PC_SERIALIZE_AFTER
    }
}
