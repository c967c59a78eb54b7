//! Vector loads and stores.
//!
//! Every addressing mode (unit-stride, strided, indexed) and segment count
//! goes through one element loop. Elements are processed from `vstart` to
//! `vl`, fields of a segment in order, so that a fault leaves `vstart` at the
//! faulting element and a restarted instruction resumes there.
//!
//! Each element access is attributed to the vector register holding it; the
//! raw-op trace groups addresses by that register.

use super::illegal_insn;
use crate::common::{Exception, RegId, RegKind};
use crate::core::Cpu;
use crate::isa::instruction::{Insn, InstructionBits};
use crate::isa::rvv::opcodes::{MOP_STRIDED, MOP_UNIT_STRIDE};
use crate::isa::rvv::{eew_from_width, is_indexed_mem};

/// Decoded addressing of one vector memory instruction.
#[derive(Clone, Copy, Debug)]
struct Layout {
    /// Data element width in bits.
    eew: u32,
    /// Index element width for the indexed modes.
    index_eew: Option<u32>,
    /// Fields per segment.
    nf: u64,
    /// Registers per field.
    field_regs: u64,
    /// Byte distance between consecutive segments (unit-stride and strided).
    stride: u64,
    base: u64,
    /// First register of the data group.
    vd: u64,
    /// First register of the index group.
    vs2: u64,
}

impl Layout {
    fn decode(cpu: &Cpu, insn: Insn) -> Result<Self, Exception> {
        let word = insn.word();
        let width_eew = eew_from_width(insn.funct3()).ok_or_else(|| illegal_insn(insn))?;
        if cpu.vu.vill {
            return Err(illegal_insn(insn));
        }
        let mop = insn.mop();
        if mop == MOP_UNIT_STRIDE && insn.lumop() != 0 {
            return Err(illegal_insn(insn));
        }

        let (eew, index_eew) = if is_indexed_mem(word) {
            (cpu.vu.vsew, Some(width_eew))
        } else {
            (width_eew, None)
        };
        let nf = u64::from(insn.nf()) + 1;
        let vlen = u64::from(cpu.vu.vlen());
        let field_regs = (cpu.vu.vlmax * u64::from(eew)).div_ceil(vlen).max(1);
        let vd = insn.rd() as u64;
        if vd + nf * field_regs > 32 {
            return Err(illegal_insn(insn));
        }

        let bytes = u64::from(eew / 8);
        let stride = match mop {
            MOP_UNIT_STRIDE => nf * bytes,
            MOP_STRIDED => cpu.read_x(insn.rs2()),
            _ => 0,
        };

        Ok(Self {
            eew,
            index_eew,
            nf,
            field_regs,
            stride,
            base: cpu.read_x(insn.rs1()),
            vd,
            vs2: insn.rs2() as u64,
        })
    }

    const fn bytes(&self) -> u64 {
        (self.eew / 8) as u64
    }

    fn address(&self, cpu: &Cpu, idx: u64, field: u64) -> u64 {
        let offset = field * self.bytes();
        match self.index_eew {
            Some(index_eew) => self
                .base
                .wrapping_add(cpu.vu.elt(self.vs2, idx, index_eew))
                .wrapping_add(offset),
            None => self
                .base
                .wrapping_add(idx.wrapping_mul(self.stride))
                .wrapping_add(offset),
        }
    }
}

/// Runs `access` for every active element and field, maintaining `vstart`.
fn for_each_element<F>(cpu: &mut Cpu, insn: Insn, pc: u64, mut access: F) -> Result<u64, Exception>
where
    F: FnMut(&mut Cpu, &Layout, u64, u64) -> Result<(), Exception>,
{
    let layout = Layout::decode(cpu, insn)?;
    let entry_vstart = cpu.vu.vstart;
    let unmasked = insn.vm();

    for idx in entry_vstart..cpu.vu.vl {
        if !unmasked && !cpu.vu.mask_bit(idx) {
            continue;
        }
        cpu.vu.vstart = idx;
        for field in 0..layout.nf {
            if let Err(e) = access(cpu, &layout, idx, field) {
                // A trigger match replays the instruction from its first element.
                if matches!(e, Exception::TriggerMatched(_)) {
                    cpu.vu.vstart = entry_vstart;
                }
                return Err(e);
            }
        }
    }

    cpu.vu.vstart = 0;
    Ok(pc.wrapping_add(4))
}

/// Vector loads of every addressing mode.
pub fn vector_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    for_each_element(cpu, insn, pc, |cpu, layout, idx, field| {
        let group = layout.vd + field * layout.field_regs;
        let vreg = cpu.vu.elt_reg(group, idx, layout.eew);
        let addr = layout.address(cpu, idx, field);
        let val = cpu.load_vector_element(addr, layout.bytes() as usize, vreg)?;
        cpu.vu.set_elt(group, idx, layout.eew, val);
        cpu.state
            .log
            .write_reg(RegId::new(vreg, RegKind::VectorGeneric), 0);
        Ok(())
    })
}

/// Vector stores of every addressing mode.
pub fn vector_store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Exception> {
    for_each_element(cpu, insn, pc, |cpu, layout, idx, field| {
        let group = layout.vd + field * layout.field_regs;
        let vreg = cpu.vu.elt_reg(group, idx, layout.eew);
        let addr = layout.address(cpu, idx, field);
        let val = cpu.vu.elt(group, idx, layout.eew);
        cpu.store_vector_element(addr, layout.bytes() as usize, val, vreg)
    })
}
