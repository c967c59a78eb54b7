//! CSR Access Logic.
//!
//! This module implements CSR access as instructions see it. It performs the
//! following:
//! 1. **Privilege Checks:** An address whose bits 9:8 exceed the current
//!    privilege is inaccessible, and the debug CSRs exist only in debug mode.
//! 2. **Read-Only Checks:** Addresses with bits 11:10 set cannot be written.
//! 3. **Vector CSRs:** `vstart`, `vxsat`, `vxrm`, `vcsr`, `vl`, `vtype` and
//!    `vlenb` live in the vector unit and are routed there.
//! 4. **Logging:** Every successful write is logged with the value read back.

use super::Cpu;
use crate::common::{RegId, RegKind};
use crate::core::arch::csr;

/// First debug-mode-only CSR address.
const DEBUG_CSR_FIRST: u32 = 0x7B0;
/// Last debug-mode-only CSR address.
const DEBUG_CSR_LAST: u32 = 0x7BF;

impl Cpu {
    fn csr_accessible(&self, addr: u32) -> bool {
        let min_prv = ((addr >> 8) & 3) as u8;
        if min_prv > self.state.prv.to_u8() {
            return false;
        }
        self.state.debug_mode || !(DEBUG_CSR_FIRST..=DEBUG_CSR_LAST).contains(&addr)
    }

    /// Reads a CSR on behalf of an instruction.
    ///
    /// # Returns
    ///
    /// `None` when the CSR does not exist or is not accessible at the current
    /// privilege; the caller raises an illegal-instruction trap.
    pub fn csr_read(&self, addr: u32) -> Option<u64> {
        if !self.csr_accessible(addr) {
            return None;
        }
        match addr {
            csr::VSTART => Some(self.vu.vstart),
            csr::VXSAT => Some(u64::from(self.vu.vxsat)),
            csr::VXRM => Some(self.vu.vxrm as u64),
            csr::VCSR => Some(self.vu.vcsr()),
            csr::VL => Some(self.vu.vl),
            csr::VTYPE => Some(self.vu.vtype),
            csr::VLENB => Some(self.vu.vlenb() as u64),
            _ => self.csrs.read(addr),
        }
    }

    /// Writes a CSR on behalf of an instruction and logs the write.
    ///
    /// # Returns
    ///
    /// `false` when the CSR does not exist, is read-only, or is not
    /// accessible at the current privilege.
    pub fn csr_write(&mut self, addr: u32, val: u64) -> bool {
        if !self.csr_accessible(addr) || (addr >> 10) & 3 == 3 {
            return false;
        }
        let written = match addr {
            csr::VSTART => {
                self.vu.vstart = val & (u64::from(self.vu.vlen()) - 1);
                true
            }
            csr::VXSAT => {
                self.vu.vxsat = val & 1 != 0;
                true
            }
            csr::VXRM => {
                self.vu.set_vcsr(((val & 3) << 1) | u64::from(self.vu.vxsat));
                true
            }
            csr::VCSR => {
                self.vu.set_vcsr(val);
                true
            }
            _ => self.csrs.write(addr, val),
        };
        if written && let Some(readback) = self.csr_read(addr) {
            self.state
                .log
                .write_reg(RegId::new(u64::from(addr), RegKind::Csr), u128::from(readback));
        }
        written
    }
}
