//! Instruction encoders.
//!
//! Small `const fn` builders for the forms the decoder knows, so tests read
//! as assembly rather than hex.

#![allow(dead_code)]

pub const OP_IMM: u32 = 0x13;
pub const OP_LUI: u32 = 0x37;
pub const OP_JAL: u32 = 0x6f;
pub const OP_JALR: u32 = 0x67;
pub const OP_BRANCH: u32 = 0x63;
pub const OP_LOAD: u32 = 0x03;
pub const OP_STORE: u32 = 0x23;
pub const OP_SYSTEM: u32 = 0x73;
pub const OP_V: u32 = 0x57;
pub const OP_LOAD_FP: u32 = 0x07;
pub const OP_STORE_FP: u32 = 0x27;

pub const ECALL: u32 = 0x0000_0073;
pub const EBREAK: u32 = 0x0010_0073;
pub const MRET: u32 = 0x3020_0073;
pub const SRET: u32 = 0x1020_0073;
pub const DRET: u32 = 0x7b20_0073;
pub const WFI: u32 = 0x1050_0073;
pub const FENCE_I: u32 = 0x0000_100f;
pub const ROI_START: u32 = 0x0010_0013;
pub const ROI_END: u32 = 0x0020_0013;
/// Matches no decodable form.
pub const ILLEGAL: u32 = 0xffff_ffff;

pub const fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i32) -> u32 {
    ((imm as u32 & 0xfff) << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode
}

pub const fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 5) & 0x7f) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | ((imm & 0x1f) << 7)
        | opcode
}

pub const fn b_type(funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let imm = imm as u32;
    (((imm >> 12) & 1) << 31)
        | (((imm >> 5) & 0x3f) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (funct3 << 12)
        | (((imm >> 1) & 0xf) << 8)
        | (((imm >> 11) & 1) << 7)
        | OP_BRANCH
}

pub const fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_IMM, rd, 0, rs1, imm)
}

pub const fn lui(rd: u32, imm20: u32) -> u32 {
    (imm20 << 12) | (rd << 7) | OP_LUI
}

pub const fn jal(rd: u32, offset: i32) -> u32 {
    let imm = offset as u32;
    (((imm >> 20) & 1) << 31)
        | (((imm >> 1) & 0x3ff) << 21)
        | (((imm >> 11) & 1) << 20)
        | (((imm >> 12) & 0xff) << 12)
        | (rd << 7)
        | OP_JAL
}

pub const fn jalr(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_JALR, rd, 0, rs1, imm)
}

pub const fn beq(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(0, rs1, rs2, offset)
}

pub const fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(1, rs1, rs2, offset)
}

pub const fn lb(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_LOAD, rd, 0, rs1, imm)
}

pub const fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_LOAD, rd, 2, rs1, imm)
}

pub const fn ld(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_LOAD, rd, 3, rs1, imm)
}

pub const fn lbu(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(OP_LOAD, rd, 4, rs1, imm)
}

pub const fn sb(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(OP_STORE, 0, rs1, rs2, imm)
}

pub const fn sw(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(OP_STORE, 2, rs1, rs2, imm)
}

pub const fn sd(rs2: u32, rs1: u32, imm: i32) -> u32 {
    s_type(OP_STORE, 3, rs1, rs2, imm)
}

pub const fn csrrw(rd: u32, csr: u32, rs1: u32) -> u32 {
    (csr << 20) | (rs1 << 15) | (1 << 12) | (rd << 7) | OP_SYSTEM
}

pub const fn csrrs(rd: u32, csr: u32, rs1: u32) -> u32 {
    (csr << 20) | (rs1 << 15) | (2 << 12) | (rd << 7) | OP_SYSTEM
}

pub const fn csrrc(rd: u32, csr: u32, rs1: u32) -> u32 {
    (csr << 20) | (rs1 << 15) | (3 << 12) | (rd << 7) | OP_SYSTEM
}

/// `vtype` immediate for `sew` bits and log2(LMUL) `lmul` (negative for
/// fractional), tail and mask agnostic.
pub const fn vtype(sew: u32, lmul: i32) -> u32 {
    let vsew = match sew {
        8 => 0,
        16 => 1,
        32 => 2,
        _ => 3,
    };
    0xc0 | (vsew << 3) | (lmul as u32 & 7)
}

pub const fn vsetvli(rd: u32, rs1: u32, vtypei: u32) -> u32 {
    ((vtypei & 0x7ff) << 20) | (rs1 << 15) | (7 << 12) | (rd << 7) | OP_V
}

pub const fn vsetivli(rd: u32, uimm: u32, vtypei: u32) -> u32 {
    (3 << 30) | ((vtypei & 0x3ff) << 20) | (uimm << 15) | (7 << 12) | (rd << 7) | OP_V
}

pub const fn vsetvl(rd: u32, rs1: u32, rs2: u32) -> u32 {
    (1 << 31) | (rs2 << 20) | (rs1 << 15) | (7 << 12) | (rd << 7) | OP_V
}

const fn width(eew: u32) -> u32 {
    match eew {
        8 => 0,
        16 => 5,
        32 => 6,
        _ => 7,
    }
}

#[allow(clippy::too_many_arguments)]
pub const fn vmem(opcode: u32, nf: u32, mop: u32, vm: bool, rs2: u32, rs1: u32, eew: u32, vd: u32) -> u32 {
    ((nf - 1) << 29)
        | (mop << 26)
        | ((vm as u32) << 25)
        | (rs2 << 20)
        | (rs1 << 15)
        | (width(eew) << 12)
        | (vd << 7)
        | opcode
}

pub const fn vle(eew: u32, vd: u32, rs1: u32) -> u32 {
    vmem(OP_LOAD_FP, 1, 0, true, 0, rs1, eew, vd)
}

pub const fn vlseg(nf: u32, eew: u32, vd: u32, rs1: u32) -> u32 {
    vmem(OP_LOAD_FP, nf, 0, true, 0, rs1, eew, vd)
}

pub const fn vlse(eew: u32, vd: u32, rs1: u32, rs2: u32) -> u32 {
    vmem(OP_LOAD_FP, 1, 2, true, rs2, rs1, eew, vd)
}

pub const fn vluxei(eew: u32, vd: u32, rs1: u32, vs2: u32) -> u32 {
    vmem(OP_LOAD_FP, 1, 1, true, vs2, rs1, eew, vd)
}

pub const fn vse(eew: u32, vs3: u32, rs1: u32) -> u32 {
    vmem(OP_STORE_FP, 1, 0, true, 0, rs1, eew, vs3)
}

pub const fn varith(funct6: u32, vm: bool, vs2: u32, rs1: u32, funct3: u32, vd: u32) -> u32 {
    (funct6 << 26) | ((vm as u32) << 25) | (vs2 << 20) | (rs1 << 15) | (funct3 << 12) | (vd << 7) | OP_V
}

pub const fn vadd_vv(vd: u32, vs2: u32, vs1: u32) -> u32 {
    varith(0, true, vs2, vs1, 0, vd)
}

pub const fn vadd_vv_masked(vd: u32, vs2: u32, vs1: u32) -> u32 {
    varith(0, false, vs2, vs1, 0, vd)
}

pub const fn vadd_vx(vd: u32, vs2: u32, rs1: u32) -> u32 {
    varith(0, true, vs2, rs1, 4, vd)
}

pub const fn vadd_vi(vd: u32, vs2: u32, simm5: i32) -> u32 {
    varith(0, true, vs2, simm5 as u32 & 0x1f, 3, vd)
}

pub const fn vmv_v_x(vd: u32, rs1: u32) -> u32 {
    varith(0x17, true, 0, rs1, 4, vd)
}

pub const fn vssrl_vv(vd: u32, vs2: u32, vs1: u32) -> u32 {
    varith(0x2a, true, vs2, vs1, 0, vd)
}
