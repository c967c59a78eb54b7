//! Element-wise vector arithmetic.

use super::illegal_insn;
use crate::common::Exception;
use crate::core::Cpu;
use crate::isa::instruction::{Insn, InstructionBits};

/// Performance counter bumped once per executed `vssrl`.
const VSSRL_HPM_COUNTER: usize = 10;

const fn sew_mask(sew: u32) -> u64 {
    if sew >= 64 { u64::MAX } else { (1 << sew) - 1 }
}

/// Applies `op(cpu, idx, sew)` to every active element of the destination
/// group and logs each destination register.
fn elementwise<F>(cpu: &mut Cpu, insn: Insn, pc: u64, op: F) -> Result<u64, Exception>
where
    F: Fn(&Cpu, u64, u32) -> u64,
{
    let vd = insn.rd() as u64;
    let group = cpu.vu.group_regs();
    if cpu.vu.vill || vd % group != 0 || (!insn.vm() && vd == 0) {
        return Err(illegal_insn(insn));
    }

    let sew = cpu.vu.vsew;
    let mask = sew_mask(sew);
    for idx in cpu.vu.vstart..cpu.vu.vl {
        if !insn.vm() && !cpu.vu.mask_bit(idx) {
            continue;
        }
        let result = op(cpu, idx, sew) & mask;
        cpu.vu.set_elt(vd, idx, sew, result);
    }
    cpu.vu.vstart = 0;

    for reg in vd..vd + group {
        cpu.log_vreg(reg);
    }
    Ok(pc.wrapping_add(4))
}

/// `vadd.vv vd, vs2, vs1`.
pub fn vadd_vv(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let (vs1, vs2) = (insn.rs1() as u64, insn.rs2() as u64);
    elementwise(cpu, insn, pc, |cpu, i, sew| {
        cpu.vu.elt(vs2, i, sew).wrapping_add(cpu.vu.elt(vs1, i, sew))
    })
}

/// `vadd.vx vd, vs2, rs1`.
pub fn vadd_vx(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let vs2 = insn.rs2() as u64;
    let scalar = cpu.read_x(insn.rs1());
    elementwise(cpu, insn, pc, |cpu, i, sew| {
        cpu.vu.elt(vs2, i, sew).wrapping_add(scalar)
    })
}

/// `vadd.vi vd, vs2, simm5`.
pub fn vadd_vi(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let vs2 = insn.rs2() as u64;
    let imm = insn.simm5() as u64;
    elementwise(cpu, insn, pc, |cpu, i, sew| {
        cpu.vu.elt(vs2, i, sew).wrapping_add(imm)
    })
}

/// `vmv.v.x vd, rs1`.
pub fn vmv_v_x(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let scalar = cpu.read_x(insn.rs1());
    elementwise(cpu, insn, pc, |_, _, _| scalar)
}

/// `vssrl.vv vd, vs2, vs1`: logical right shift rounded by `vxrm`. The
/// shift amount is the low log2(SEW) bits of the `vs1` element.
pub fn vssrl_vv(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    let (vs1, vs2) = (insn.rs1() as u64, insn.rs2() as u64);
    let vxrm = cpu.vu.vxrm;
    let npc = elementwise(cpu, insn, pc, |cpu, i, sew| {
        let shift = (cpu.vu.elt(vs1, i, sew) & u64::from(sew - 1)) as u32;
        let value = u128::from(cpu.vu.elt(vs2, i, sew));
        (vxrm.round(value, shift) >> shift) as u64
    })?;
    cpu.csrs.bump_hpm(VSSRL_HPM_COUNTER, 1);
    Ok(npc)
}
