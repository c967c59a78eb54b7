//! Vector configuration: `vsetvli`, `vsetivli`, `vsetvl`.

use crate::common::Exception;
use crate::core::Cpu;
use crate::core::arch::vector::Avl;
use crate::isa::instruction::{Insn, InstructionBits};

/// AVL source for the register forms, following the `rd`/`rs1` == x0 rules.
fn register_avl(cpu: &Cpu, insn: Insn) -> Avl {
    match (insn.rs1(), insn.rd()) {
        (0, 0) => Avl::Keep,
        (0, _) => Avl::Max,
        (rs1, _) => Avl::Value(cpu.read_x(rs1)),
    }
}

fn apply(cpu: &mut Cpu, insn: Insn, pc: u64, avl: Avl, vtype: u64) -> u64 {
    let vl = cpu.vu.set_vl(avl, vtype);
    cpu.write_x(insn.rd(), vl);
    pc.wrapping_add(4)
}

/// `vsetvli rd, rs1, vtypei`.
pub fn vsetvli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let avl = register_avl(cpu, insn);
    Ok(apply(cpu, insn, pc, avl, insn.zimm11()))
}

/// `vsetivli rd, uimm, vtypei`.
pub fn vsetivli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let avl = Avl::Value(insn.rs1() as u64);
    Ok(apply(cpu, insn, pc, avl, insn.zimm10()))
}

/// `vsetvl rd, rs1, rs2`.
pub fn vsetvl(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let avl = register_avl(cpu, insn);
    let vtype = cpu.read_x(insn.rs2());
    Ok(apply(cpu, insn, pc, avl, vtype))
}
