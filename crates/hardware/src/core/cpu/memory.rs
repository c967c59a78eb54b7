//! Memory Access Helpers.
//!
//! Data accesses made by semantic handlers. Each access:
//! 1. **Triggers:** Consults the trigger module (outside debug mode). A match
//!    aborts the instruction with `Exception::TriggerMatched` before memory
//!    is touched.
//! 2. **Alignment:** Rejects accesses not aligned to their size.
//! 3. **Access:** Goes through the hart's `Mmu`.
//! 4. **Logging:** Appends the access to the per-instruction log together
//!    with its micro-op address entry.

use super::Cpu;
use super::state::{MemAccess, UopAddr};
use crate::common::{Exception, Trap};
use crate::core::units::triggers::TriggerOp;

impl Cpu {
    fn check_trigger(&mut self, op: TriggerOp, addr: u64) -> Result<(), Exception> {
        if self.state.debug_mode {
            return Ok(());
        }
        self.triggers
            .check_memory(op, addr)
            .map_err(Exception::TriggerMatched)
    }

    fn load_logged(&mut self, addr: u64, size: usize, vreg: Option<u64>) -> Result<u64, Exception> {
        self.check_trigger(TriggerOp::Load, addr)?;
        if addr % size as u64 != 0 {
            return Err(Trap::LoadAddressMisaligned(addr).into());
        }
        let value = self.mmu.load(addr, size)?;
        let log = &mut self.state.log;
        log.mem_read.push(MemAccess {
            addr,
            value,
            size: size as u8,
        });
        log.uop_addrs.push(UopAddr { addr, vreg });
        Ok(value)
    }

    fn store_logged(
        &mut self,
        addr: u64,
        size: usize,
        value: u64,
        vreg: Option<u64>,
    ) -> Result<(), Exception> {
        self.check_trigger(TriggerOp::Store, addr)?;
        if addr % size as u64 != 0 {
            return Err(Trap::StoreAddressMisaligned(addr).into());
        }
        self.mmu.store(addr, size, value)?;
        let log = &mut self.state.log;
        log.mem_write.push(MemAccess {
            addr,
            value,
            size: size as u8,
        });
        log.uop_addrs.push(UopAddr { addr, vreg });
        Ok(())
    }

    /// Scalar load of `size` bytes, zero-extended.
    ///
    /// # Errors
    ///
    /// A trigger match, a misaligned address, or the `Mmu`'s trap.
    pub fn load(&mut self, addr: u64, size: usize) -> Result<u64, Exception> {
        self.load_logged(addr, size, None)
    }

    /// Scalar store of the low `size` bytes of `value`.
    ///
    /// # Errors
    ///
    /// A trigger match, a misaligned address, or the `Mmu`'s trap.
    pub fn store(&mut self, addr: u64, size: usize, value: u64) -> Result<(), Exception> {
        self.store_logged(addr, size, value, None)
    }

    /// Vector element load attributed to register `vreg`.
    ///
    /// # Errors
    ///
    /// As [`Cpu::load`].
    pub fn load_vector_element(
        &mut self,
        addr: u64,
        size: usize,
        vreg: u64,
    ) -> Result<u64, Exception> {
        self.load_logged(addr, size, Some(vreg))
    }

    /// Vector element store attributed to register `vreg`.
    ///
    /// # Errors
    ///
    /// As [`Cpu::store`].
    pub fn store_vector_element(
        &mut self,
        addr: u64,
        size: usize,
        value: u64,
        vreg: u64,
    ) -> Result<(), Exception> {
        self.store_logged(addr, size, value, Some(vreg))
    }
}
