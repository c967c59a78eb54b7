//! Interrupt Mapping Utilities.
//!
//! This module converts hardware interrupt pending bits into trap values. It
//! performs the following:
//! 1. **Interrupt Mapping:** Converts `mip` bits into high-level trap types.
//! 2. **Prioritization:** Fixes the order in which simultaneous interrupts are taken.

use crate::common::error::Trap;
use crate::core::arch::csr;

/// Interrupt pending bits in the order they are taken when several are
/// enabled at once: machine external, software, timer, then the supervisor
/// equivalents in the same order.
pub const INTERRUPT_PRIORITY: [u64; 6] = [
    csr::MIP_MEIP,
    csr::MIP_MSIP,
    csr::MIP_MTIP,
    csr::MIP_SEIP,
    csr::MIP_SSIP,
    csr::MIP_STIP,
];

/// Trap handler utility functions.
pub struct TrapHandler;

impl TrapHandler {
    /// Converts an interrupt pending bit to a corresponding trap type.
    ///
    /// # Arguments
    ///
    /// * `bit` - A single interrupt pending bit from the `mip` register.
    ///
    /// # Returns
    ///
    /// The `Trap` variant for the interrupt, or `None` for bits that carry no
    /// standard interrupt.
    pub const fn irq_to_trap(bit: u64) -> Option<Trap> {
        match bit {
            csr::MIP_SSIP => Some(Trap::SupervisorSoftwareInterrupt),
            csr::MIP_MSIP => Some(Trap::MachineSoftwareInterrupt),
            csr::MIP_STIP => Some(Trap::SupervisorTimerInterrupt),
            csr::MIP_MTIP => Some(Trap::MachineTimerInterrupt),
            csr::MIP_SEIP => Some(Trap::SupervisorExternalInterrupt),
            csr::MIP_MEIP => Some(Trap::MachineExternalInterrupt),
            _ => None,
        }
    }

    /// Picks the highest-priority interrupt among `enabled` pending bits.
    pub fn highest_priority(enabled: u64) -> Option<Trap> {
        INTERRUPT_PRIORITY
            .iter()
            .find(|&&bit| enabled & bit != 0)
            .and_then(|&bit| Self::irq_to_trap(bit))
    }
}
