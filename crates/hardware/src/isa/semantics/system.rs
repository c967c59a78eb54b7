//! Privileged and system instructions.
//!
//! CSR instructions serialize on both sides: the first execution returns
//! `PC_SERIALIZE_BEFORE` so that the loop re-fetches the instruction with
//! `state.serialized` set, and the second performs the access and returns
//! `PC_SERIALIZE_AFTER` so that nothing already fetched runs under stale
//! CSR state.

use super::illegal_insn;
use crate::common::constants::{PC_SERIALIZE_AFTER, PC_SERIALIZE_BEFORE};
use crate::common::{Exception, Trap};
use crate::core::Cpu;
use crate::core::arch::mode::PrivilegeMode;
use crate::isa::instruction::{Insn, InstructionBits};

/// Any encoding the decoder does not recognise.
pub fn illegal(_cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Exception> {
    Err(illegal_insn(insn))
}

/// `fence.i`: drops every decoded instruction.
pub fn fence_i(cpu: &mut Cpu, _insn: Insn, pc: u64) -> Result<u64, Exception> {
    cpu.icache.flush();
    cpu.state.pc = pc.wrapping_add(4);
    Ok(PC_SERIALIZE_AFTER)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CsrOp {
    Write,
    Set,
    Clear,
}

fn csr_access(cpu: &mut Cpu, insn: Insn, pc: u64, op: CsrOp) -> Result<u64, Exception> {
    if !cpu.state.serialized {
        return Ok(PC_SERIALIZE_BEFORE);
    }
    cpu.state.serialized = false;

    let addr = insn.csr();
    let old = cpu.csr_read(addr).ok_or_else(|| illegal_insn(insn))?;
    let rs1 = insn.rs1();
    if op == CsrOp::Write || rs1 != 0 {
        let src = cpu.read_x(rs1);
        let new = match op {
            CsrOp::Write => src,
            CsrOp::Set => old | src,
            CsrOp::Clear => old & !src,
        };
        if !cpu.csr_write(addr, new) {
            return Err(illegal_insn(insn));
        }
    }
    cpu.write_x(insn.rd(), old);
    cpu.state.pc = pc.wrapping_add(4);
    Ok(PC_SERIALIZE_AFTER)
}

/// `csrrw rd, csr, rs1`.
pub fn csrrw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    csr_access(cpu, insn, pc, CsrOp::Write)
}

/// `csrrs rd, csr, rs1`.
pub fn csrrs(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    csr_access(cpu, insn, pc, CsrOp::Set)
}

/// `csrrc rd, csr, rs1`.
pub fn csrrc(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    csr_access(cpu, insn, pc, CsrOp::Clear)
}

/// `ecall`.
pub fn ecall(cpu: &mut Cpu, _insn: Insn, _pc: u64) -> Result<u64, Exception> {
    Err(match cpu.state.prv {
        PrivilegeMode::User => Trap::EnvironmentCallFromUMode,
        PrivilegeMode::Supervisor => Trap::EnvironmentCallFromSMode,
        PrivilegeMode::Machine => Trap::EnvironmentCallFromMMode,
    }
    .into())
}

/// `ebreak`: enters debug mode when `dcsr.ebreak*` selects it for the current
/// privilege, otherwise raises a breakpoint.
pub fn ebreak(cpu: &mut Cpu, _insn: Insn, pc: u64) -> Result<u64, Exception> {
    if !cpu.state.debug_mode && cpu.csrs.dcsr.ebreak_enters_debug(cpu.state.prv) {
        Err(Exception::DebugMode)
    } else {
        Err(Trap::Breakpoint(pc).into())
    }
}

/// `mret`.
pub fn mret(cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Exception> {
    if cpu.state.prv != PrivilegeMode::Machine {
        return Err(illegal_insn(insn));
    }
    cpu.do_mret();
    Ok(PC_SERIALIZE_AFTER)
}

/// `sret`.
pub fn sret(cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Exception> {
    if cpu.state.prv < PrivilegeMode::Supervisor {
        return Err(illegal_insn(insn));
    }
    cpu.do_sret();
    Ok(PC_SERIALIZE_AFTER)
}

/// `dret`. Legal only in debug mode.
pub fn dret(cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Exception> {
    if !cpu.state.debug_mode {
        return Err(illegal_insn(insn));
    }
    Ok(cpu.do_dret())
}

/// `wfi`: retires, then yields to the outer scheduler.
pub fn wfi(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    if cpu.state.prv == PrivilegeMode::User && !cpu.state.debug_mode {
        return Err(illegal_insn(insn));
    }
    cpu.state.pc = pc.wrapping_add(4);
    Err(Exception::WaitForInterrupt)
}
