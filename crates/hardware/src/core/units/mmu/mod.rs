//! Memory Management Unit seam.
//!
//! The core never touches memory directly: instruction fetch and data
//! accesses go through an [`Mmu`]. Address translation, physical memory
//! attributes and device routing all live behind this trait, so a test can
//! substitute a scripted implementation and a platform can plug in a real one.

use crate::common::Trap;
use crate::isa::decode::InsnFetch;

/// Instruction and data memory access for one hart.
///
/// Every method either completes the access or reports the architectural
/// trap the access raised. Sizes are in bytes (1, 2, 4 or 8).
pub trait Mmu {
    /// Fetches and decodes the instruction at `pc`.
    ///
    /// # Errors
    ///
    /// An instruction access, page or misalignment fault.
    fn load_insn(&mut self, pc: u64) -> Result<InsnFetch, Trap>;

    /// Reads `size` bytes at `addr`, zero-extended.
    ///
    /// # Errors
    ///
    /// A load access, page or misalignment fault.
    fn load(&mut self, addr: u64, size: usize) -> Result<u64, Trap>;

    /// Writes the low `size` bytes of `val` to `addr`.
    ///
    /// # Errors
    ///
    /// A store access, page or misalignment fault.
    fn store(&mut self, addr: u64, size: usize, val: u64) -> Result<(), Trap>;
}
