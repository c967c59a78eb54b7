//! Semantic handlers.
//!
//! One function per instruction form, with the [`InsnFn`] signature: it gets
//! the hart, the fetched instruction and its PC, applies the instruction's
//! effects through the hart's logging accessors, and returns the next PC or
//! a serialization sentinel.
//!
//! - `scalar`: Integer arithmetic, jumps, branches, loads and stores.
//! - `system`: CSR access, `fence.i`, environment calls, trap returns, `wfi`.
//! - `vector_cfg`: `vsetvli`, `vsetivli`, `vsetvl`.
//! - `vector_mem`: Unit-stride, strided and indexed vector loads and stores.
//! - `vector_arith`: Element-wise vector integer and fixed-point arithmetic.
//!
//! [`InsnFn`]: crate::isa::decode::InsnFn

/// Integer arithmetic, control transfer and scalar memory access.
pub mod scalar;
/// Privileged and system instructions.
pub mod system;
/// Element-wise vector arithmetic.
pub mod vector_arith;
/// Vector configuration.
pub mod vector_cfg;
/// Vector loads and stores.
pub mod vector_mem;

use crate::common::{Exception, Trap};
use crate::isa::instruction::Insn;

/// Illegal-instruction exception carrying the instruction bits.
pub(crate) const fn illegal_insn(insn: Insn) -> Exception {
    Exception::Trap(Trap::IllegalInstruction(insn.bits()))
}
