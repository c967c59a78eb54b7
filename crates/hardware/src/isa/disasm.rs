//! Instruction disassembler for interactive debugging and diagnostics.
//!
//! Converts an instruction into a mnemonic string using ABI register names.
//! Covers every form the decoder knows: the integer subset, CSR and system
//! instructions, vector configuration, vector loads and stores, and the
//! vector arithmetic forms.
//!
//! # Usage
//!
//! ```
//! use rvx_core::isa::disasm::disassemble;
//! use rvx_core::isa::instruction::Insn;
//!
//! assert_eq!(disassemble(Insn::new(0x00a0_0513)), "addi a0, zero, 10");
//! ```

use crate::core::arch::csr::csr_name;
use crate::isa::encoding::{
    MASK_ADDI, MASK_BRANCH, MASK_CSR, MASK_FENCE_I, MASK_JAL, MASK_JALR, MASK_LUI, MASK_VARITH,
    MASK_VMV_V_X, MASK_VSETIVLI, MASK_VSETVL, MASK_VSETVLI, MATCH_ADDI, MATCH_BEQ, MATCH_BNE,
    MATCH_CSRRC, MATCH_CSRRS, MATCH_CSRRW, MATCH_FENCE_I, MATCH_JAL, MATCH_JALR, MATCH_LB,
    MATCH_LUI, MATCH_SB, MATCH_VADD_VI, MATCH_VADD_VV, MATCH_VADD_VX, MATCH_VMV_V_X,
    MATCH_VSETIVLI, MATCH_VSETVL, MATCH_VSETVLI, MATCH_VSSRL_VV,
};
use crate::isa::instruction::{Insn, InstructionBits};
use crate::isa::privileged::opcodes as sys_op;
use crate::isa::rvv::eew_from_width;
use crate::isa::rvv::opcodes::{
    MOP_INDEXED_ORDERED, MOP_STRIDED, MOP_UNIT_STRIDE, OP_LOAD_FP, OP_STORE_FP,
};

/// ABI register names for x0–x31.
const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name for an integer register index.
#[inline]
fn xreg(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}

/// Suffix printed after the operands of a masked vector instruction.
fn mask_suffix(insn: Insn) -> &'static str {
    if insn.vm() { "" } else { ", v0.t" }
}

/// Disassembles one instruction.
///
/// Returns a mnemonic like `"addi a0, a1, 4"`, or `"unknown (0x…)"` for
/// encodings the decoder does not recognise.
pub fn disassemble(insn: Insn) -> String {
    if insn.length() != 4 {
        return format!("unknown ({:#x})", insn.bits());
    }
    let word = insn.word();
    let (rd, rs1, rs2) = (insn.rd(), insn.rs1(), insn.rs2());
    let is = |mask: u32, matches: u32| word & mask == matches;

    match word {
        sys_op::ECALL => return "ecall".to_string(),
        sys_op::EBREAK => return "ebreak".to_string(),
        sys_op::MRET => return "mret".to_string(),
        sys_op::SRET => return "sret".to_string(),
        sys_op::DRET => return "dret".to_string(),
        sys_op::WFI => return "wfi".to_string(),
        _ => {}
    }

    if is(MASK_ADDI, MATCH_ADDI) {
        format!("addi {}, {}, {}", xreg(rd), xreg(rs1), insn.i_imm())
    } else if is(MASK_LUI, MATCH_LUI) {
        format!("lui {}, {:#x}", xreg(rd), word >> 12)
    } else if is(MASK_JAL, MATCH_JAL) {
        format!("jal {}, {}", xreg(rd), insn.j_imm())
    } else if is(MASK_JALR, MATCH_JALR) {
        format!("jalr {}, {}({})", xreg(rd), insn.i_imm(), xreg(rs1))
    } else if is(MASK_BRANCH, MATCH_BEQ) || is(MASK_BRANCH, MATCH_BNE) {
        let mn = if is(MASK_BRANCH, MATCH_BEQ) { "beq" } else { "bne" };
        format!("{mn} {}, {}, {}", xreg(rs1), xreg(rs2), insn.b_imm())
    } else if insn.opcode() == MATCH_LB {
        disasm_load(insn)
    } else if insn.opcode() == MATCH_SB {
        disasm_store(insn)
    } else if is(MASK_FENCE_I, MATCH_FENCE_I) {
        "fence.i".to_string()
    } else if is(MASK_CSR, MATCH_CSRRW) || is(MASK_CSR, MATCH_CSRRS) || is(MASK_CSR, MATCH_CSRRC) {
        let mn = match insn.funct3() {
            sys_op::CSRRW => "csrrw",
            sys_op::CSRRS => "csrrs",
            _ => "csrrc",
        };
        format!("{mn} {}, {}, {}", xreg(rd), csr_name(insn.csr()), xreg(rs1))
    } else if is(MASK_VSETVLI, MATCH_VSETVLI) {
        format!("vsetvli {}, {}, {}", xreg(rd), xreg(rs1), vtype_text(insn.zimm11()))
    } else if is(MASK_VSETIVLI, MATCH_VSETIVLI) {
        format!("vsetivli {}, {rs1}, {}", xreg(rd), vtype_text(insn.zimm10()))
    } else if is(MASK_VSETVL, MATCH_VSETVL) {
        format!("vsetvl {}, {}, {}", xreg(rd), xreg(rs1), xreg(rs2))
    } else if matches!(insn.opcode(), OP_LOAD_FP | OP_STORE_FP) {
        disasm_vector_mem(insn)
    } else if is(MASK_VMV_V_X, MATCH_VMV_V_X) {
        format!("vmv.v.x v{rd}, {}", xreg(rs1))
    } else if is(MASK_VARITH, MATCH_VADD_VV) {
        format!("vadd.vv v{rd}, v{rs2}, v{rs1}{}", mask_suffix(insn))
    } else if is(MASK_VARITH, MATCH_VADD_VX) {
        format!("vadd.vx v{rd}, v{rs2}, {}{}", xreg(rs1), mask_suffix(insn))
    } else if is(MASK_VARITH, MATCH_VADD_VI) {
        format!("vadd.vi v{rd}, v{rs2}, {}{}", insn.simm5(), mask_suffix(insn))
    } else if is(MASK_VARITH, MATCH_VSSRL_VV) {
        format!("vssrl.vv v{rd}, v{rs2}, v{rs1}{}", mask_suffix(insn))
    } else {
        format!("unknown ({word:#010x})")
    }
}

fn disasm_load(insn: Insn) -> String {
    let mn = match insn.funct3() {
        0 => "lb",
        1 => "lh",
        2 => "lw",
        3 => "ld",
        4 => "lbu",
        5 => "lhu",
        6 => "lwu",
        _ => "l??",
    };
    format!("{mn} {}, {}({})", xreg(insn.rd()), insn.i_imm(), xreg(insn.rs1()))
}

fn disasm_store(insn: Insn) -> String {
    let mn = match insn.funct3() {
        0 => "sb",
        1 => "sh",
        2 => "sw",
        3 => "sd",
        _ => "s??",
    };
    format!("{mn} {}, {}({})", xreg(insn.rs2()), insn.s_imm(), xreg(insn.rs1()))
}

fn disasm_vector_mem(insn: Insn) -> String {
    let Some(eew) = eew_from_width(insn.funct3()) else {
        return format!("unknown ({:#010x})", insn.word());
    };
    let dir = if insn.opcode() == OP_LOAD_FP { 'l' } else { 's' };
    let seg = match insn.nf() {
        0 => String::new(),
        nf => format!("seg{}", nf + 1),
    };
    let (vd, base) = (insn.rd(), xreg(insn.rs1()));
    let mask = mask_suffix(insn);
    match insn.mop() {
        MOP_UNIT_STRIDE => format!("v{dir}{seg}e{eew}.v v{vd}, ({base}){mask}"),
        MOP_STRIDED => format!(
            "v{dir}s{seg}e{eew}.v v{vd}, ({base}), {}{mask}",
            xreg(insn.rs2())
        ),
        mop => {
            let order = if mop == MOP_INDEXED_ORDERED { 'o' } else { 'u' };
            format!(
                "v{dir}{order}xei{eew}{seg}.v v{vd}, ({base}), v{}{mask}",
                insn.rs2()
            )
        }
    }
}

/// Formats a `vtype` immediate as `e32, m1, ta, mu`.
fn vtype_text(vtype: u64) -> String {
    let sew = 8u32 << ((vtype >> 3) & 7);
    let lmul = match vtype & 7 {
        0 => "m1",
        1 => "m2",
        2 => "m4",
        3 => "m8",
        5 => "mf8",
        6 => "mf4",
        7 => "mf2",
        _ => "m?",
    };
    let ta = if (vtype >> 6) & 1 != 0 { "ta" } else { "tu" };
    let ma = if (vtype >> 7) & 1 != 0 { "ma" } else { "mu" };
    format!("e{sew}, {lmul}, {ta}, {ma}")
}
