//! Per-micro-op instruction trace reconstruction.
//!
//! One vector encoding can stand for several micro-ops, one per destination
//! register of its group. The trace consumer wants one record per micro-op,
//! each carrying the encoding as that micro-op would see it. The
//! reconstructor walks the destination registers in ascending order, emits a
//! record with the addresses that belong to each, and bumps the register
//! fields of its copy of the word the way the hardware sequencer does between
//! micro-ops:
//!
//! - `vd` always advances.
//! - `vs1` advances only for arithmetic forms with a vector `vs1` operand
//!   (no memory addresses, not a scalar or immediate category, not a unary
//!   group where `vs1` is a function selector).
//! - `vs2` advances for arithmetic forms and indexed memory forms, except the
//!   widening VFUNARY0 conversions and `vmv.v.x`.
//!
//! Fields are 5 bits wide and wrap.
//!
//! Words that touched no vector register produce a single record with every
//! logged address, followed by the region-of-interest markers and the
//! `vset*` side-channel record where they apply.

use std::io;

use super::sink::{InstructionRecord, MagicCode, TraceSink};
use crate::common::RegKind;
use crate::common::constants::{ROI_END_INSN, ROI_START_INSN};
use crate::core::cpu::state::InsnLog;
use crate::isa::encoding::{MASK_VMV_V_X, MATCH_VMV_V_X, is_vset};
use crate::isa::instruction::{RD_SHIFT, RS1_SHIFT, RS2_SHIFT, increment_reg_field};
use crate::isa::rvv::opcodes::{
    FUNCT6_VFUNARY0, FUNCT6_VFUNARY1, FUNCT6_VMUNARY, FUNCT6_VXUNARY, OPFVF, OPFVV, OPIVI, OPIVX,
    OPMVV, OPMVX, VFUNARY0_WIDENING_BIT,
};
use crate::isa::rvv::{is_indexed_mem, is_op_v_category, is_op_v_function};

/// Architectural context the reconstructor reads besides the log.
#[derive(Clone, Copy, Debug)]
pub struct RetiredInsn {
    /// Instruction address.
    pub pc: u64,
    /// Encoded length in bytes.
    pub length: u64,
    /// Raw encoding as executed.
    pub word: u32,
    /// `vl` after the instruction.
    pub vl: u64,
    /// `vtype` after the instruction.
    pub vtype: u64,
}

/// One reconstructed micro-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MicroOp {
    /// Encoding with the register fields this micro-op sees.
    pub raw: u32,
    /// Destination vector register.
    pub vreg: u64,
    /// Addresses belonging to `vreg`, in log order.
    pub addresses: Vec<u64>,
}

/// Vector registers the instruction wrote, ascending and deduplicated.
pub fn touched_vregs(log: &InsnLog) -> Vec<u64> {
    let mut vregs: Vec<u64> = log
        .reg_write
        .keys()
        .filter(|id| id.tag() == RegKind::Vector as u64)
        .map(|id| id.index())
        .chain(log.uop_addrs.iter().filter_map(|u| u.vreg))
        .collect();
    vregs.sort_unstable();
    vregs.dedup();
    vregs
}

fn keeps_vs1(word: u32) -> bool {
    is_op_v_function(word, OPFVV, FUNCT6_VFUNARY0)
        || is_op_v_function(word, OPFVV, FUNCT6_VFUNARY1)
        || is_op_v_function(word, OPMVV, FUNCT6_VXUNARY)
        || is_op_v_function(word, OPMVV, FUNCT6_VMUNARY)
        || [OPIVX, OPFVF, OPMVX, OPIVI]
            .iter()
            .any(|&cat| is_op_v_category(word, cat))
}

fn keeps_vs2(word: u32) -> bool {
    let widening = is_op_v_function(word, OPFVV, FUNCT6_VFUNARY0)
        && (word >> VFUNARY0_WIDENING_BIT) & 1 == 1;
    widening || word & MASK_VMV_V_X == MATCH_VMV_V_X
}

/// Splits one retired instruction into its micro-ops.
///
/// Returns an empty list when no vector register was written.
pub fn micro_ops(word: u32, log: &InsnLog) -> Vec<MicroOp> {
    let num_addresses = log.num_addresses();
    let mut raw = word;
    touched_vregs(log)
        .into_iter()
        .map(|vreg| {
            let op = MicroOp {
                raw,
                vreg,
                addresses: log
                    .uop_addrs
                    .iter()
                    .filter(|u| u.vreg == Some(vreg))
                    .map(|u| u.addr)
                    .collect(),
            };

            raw = increment_reg_field(raw, RD_SHIFT);
            if num_addresses == 0 && !keeps_vs1(raw) {
                raw = increment_reg_field(raw, RS1_SHIFT);
            }
            if (num_addresses == 0 || is_indexed_mem(raw)) && !keeps_vs2(raw) {
                raw = increment_reg_field(raw, RS2_SHIFT);
            }
            op
        })
        .collect()
}

/// Emits the instruction-trace records of one retired instruction.
///
/// # Errors
///
/// I/O failures of the sink.
pub fn emit(sink: &mut dyn TraceSink, insn: &RetiredInsn, log: &InsnLog) -> io::Result<()> {
    let record = |addresses: Vec<u64>| InstructionRecord {
        address: insn.pc,
        size: insn.length,
        addresses,
        is_branch: log.is_branch,
        taken: log.branch_taken,
        is_predicated: false,
        executed: true,
    };

    let ops = micro_ops(insn.word, log);
    if !ops.is_empty() {
        for op in ops {
            sink.instruction(&record(op.addresses))?;
        }
        return Ok(());
    }

    sink.instruction(&record(log.uop_addrs.iter().map(|u| u.addr).collect()))?;
    match insn.word {
        ROI_START_INSN => sink.magic(MagicCode::RoiStart, 0, 0)?,
        ROI_END_INSN => sink.magic(MagicCode::RoiEnd, 0, 0)?,
        w if is_vset(w) => sink.magic(MagicCode::User, insn.vl, insn.vtype)?,
        _ => {}
    }
    Ok(())
}
