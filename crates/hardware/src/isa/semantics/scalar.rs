//! Integer arithmetic, control transfer and scalar memory access.

use super::illegal_insn;
use crate::common::{Exception, Trap};
use crate::core::Cpu;
use crate::isa::instruction::{Insn, InstructionBits};

/// Jump targets must be 4-byte aligned (no compressed instructions).
fn check_target(target: u64) -> Result<u64, Exception> {
    if target & 3 != 0 {
        Err(Trap::InstructionAddressMisaligned(target).into())
    } else {
        Ok(target)
    }
}

/// `addi rd, rs1, imm`. `addi x0, x0, 1` and `addi x0, x0, 2` double as
/// region-of-interest markers for the instruction trace.
pub fn addi(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let val = cpu.read_x(insn.rs1()).wrapping_add(insn.i_imm() as u64);
    cpu.write_x(insn.rd(), val);
    Ok(pc.wrapping_add(4))
}

/// `lui rd, imm`.
pub fn lui(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let val = i64::from((insn.word() & 0xffff_f000) as i32) as u64;
    cpu.write_x(insn.rd(), val);
    Ok(pc.wrapping_add(4))
}

/// `jal rd, offset`.
pub fn jal(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let target = check_target(pc.wrapping_add(insn.j_imm() as u64))?;
    cpu.log_branch(true);
    cpu.write_x(insn.rd(), pc.wrapping_add(4));
    Ok(target)
}

/// `jalr rd, offset(rs1)`.
pub fn jalr(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let base = cpu.read_x(insn.rs1());
    let target = check_target(base.wrapping_add(insn.i_imm() as u64) & !1)?;
    cpu.log_branch(true);
    cpu.write_x(insn.rd(), pc.wrapping_add(4));
    Ok(target)
}

fn branch(cpu: &mut Cpu, insn: Insn, pc: u64, taken: bool) -> Result<u64, Exception> {
    cpu.log_branch(taken);
    if taken {
        check_target(pc.wrapping_add(insn.b_imm() as u64))
    } else {
        Ok(pc.wrapping_add(4))
    }
}

/// `beq rs1, rs2, offset`.
pub fn beq(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let taken = cpu.read_x(insn.rs1()) == cpu.read_x(insn.rs2());
    branch(cpu, insn, pc, taken)
}

/// `bne rs1, rs2, offset`.
pub fn bne(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let taken = cpu.read_x(insn.rs1()) != cpu.read_x(insn.rs2());
    branch(cpu, insn, pc, taken)
}

/// Integer loads; `funct3` selects size and signedness.
pub fn load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let (size, signed) = match insn.funct3() {
        0 => (1, true),
        1 => (2, true),
        2 => (4, true),
        3 if cpu.xlen() == 64 => (8, false),
        4 => (1, false),
        5 => (2, false),
        6 if cpu.xlen() == 64 => (4, false),
        _ => return Err(illegal_insn(insn)),
    };
    let addr = cpu.read_x(insn.rs1()).wrapping_add(insn.i_imm() as u64);
    let raw = cpu.load(addr, size)?;
    let val = if signed {
        let shift = 64 - 8 * size as u32;
        (((raw << shift) as i64) >> shift) as u64
    } else {
        raw
    };
    cpu.write_x(insn.rd(), val);
    Ok(pc.wrapping_add(4))
}

/// Integer stores; `funct3` selects the size.
pub fn store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let size = match insn.funct3() {
        0 => 1,
        1 => 2,
        2 => 4,
        3 if cpu.xlen() == 64 => 8,
        _ => return Err(illegal_insn(insn)),
    };
    let addr = cpu.read_x(insn.rs1()).wrapping_add(insn.s_imm() as u64);
    let val = cpu.read_x(insn.rs2());
    cpu.store(addr, size, val)?;
    Ok(pc.wrapping_add(4))
}
