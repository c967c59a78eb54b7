//! Match/mask pairs of the encodings the opcode table decodes.
//!
//! An instruction word `w` is an instance of `X` when `w & MASK_X == MATCH_X`.

/// `addi rd, rs1, imm`.
pub const MATCH_ADDI: u32 = 0x0000_0013;
/// Mask for `addi`.
pub const MASK_ADDI: u32 = 0x0000_707f;

/// `lui rd, imm`.
pub const MATCH_LUI: u32 = 0x0000_0037;
/// Mask for `lui`.
pub const MASK_LUI: u32 = 0x0000_007f;

/// `jal rd, offset`.
pub const MATCH_JAL: u32 = 0x0000_006f;
/// Mask for `jal`.
pub const MASK_JAL: u32 = 0x0000_007f;

/// `jalr rd, offset(rs1)`.
pub const MATCH_JALR: u32 = 0x0000_0067;
/// Mask for `jalr`.
pub const MASK_JALR: u32 = 0x0000_707f;

/// `beq rs1, rs2, offset`.
pub const MATCH_BEQ: u32 = 0x0000_0063;
/// `bne rs1, rs2, offset`.
pub const MATCH_BNE: u32 = 0x0000_1063;
/// Mask shared by the conditional branches.
pub const MASK_BRANCH: u32 = 0x0000_707f;

/// `lb`.
pub const MATCH_LB: u32 = 0x0000_0003;
/// `lh`.
pub const MATCH_LH: u32 = 0x0000_1003;
/// `lw`.
pub const MATCH_LW: u32 = 0x0000_2003;
/// `ld`.
pub const MATCH_LD: u32 = 0x0000_3003;
/// `lbu`.
pub const MATCH_LBU: u32 = 0x0000_4003;
/// `lhu`.
pub const MATCH_LHU: u32 = 0x0000_5003;
/// `lwu`.
pub const MATCH_LWU: u32 = 0x0000_6003;
/// Mask shared by the integer loads.
pub const MASK_LOAD: u32 = 0x0000_707f;

/// `sb`.
pub const MATCH_SB: u32 = 0x0000_0023;
/// `sh`.
pub const MATCH_SH: u32 = 0x0000_1023;
/// `sw`.
pub const MATCH_SW: u32 = 0x0000_2023;
/// `sd`.
pub const MATCH_SD: u32 = 0x0000_3023;
/// Mask shared by the integer stores.
pub const MASK_STORE: u32 = 0x0000_707f;

/// `fence.i`.
pub const MATCH_FENCE_I: u32 = 0x0000_100f;
/// Mask for `fence.i`.
pub const MASK_FENCE_I: u32 = 0x0000_707f;

/// `csrrw rd, csr, rs1`.
pub const MATCH_CSRRW: u32 = 0x0000_1073;
/// `csrrs rd, csr, rs1`.
pub const MATCH_CSRRS: u32 = 0x0000_2073;
/// `csrrc rd, csr, rs1`.
pub const MATCH_CSRRC: u32 = 0x0000_3073;
/// Mask shared by the register CSR instructions.
pub const MASK_CSR: u32 = 0x0000_707f;

/// Mask for the fixed system encodings (`ecall`, `ebreak`, `mret`, ...).
pub const MASK_SYSTEM_EXACT: u32 = 0xffff_ffff;

/// `vsetvli rd, rs1, vtypei`.
pub const MATCH_VSETVLI: u32 = 0x0000_7057;
/// Mask for `vsetvli`.
pub const MASK_VSETVLI: u32 = 0x8000_707f;

/// `vsetivli rd, uimm, vtypei`.
pub const MATCH_VSETIVLI: u32 = 0xc000_7057;
/// Mask for `vsetivli`.
pub const MASK_VSETIVLI: u32 = 0xc000_707f;

/// `vsetvl rd, rs1, rs2`.
pub const MATCH_VSETVL: u32 = 0x8000_7057;
/// Mask for `vsetvl`.
pub const MASK_VSETVL: u32 = 0xfe00_707f;

/// Vector load of 8-bit elements (any addressing mode).
pub const MATCH_VL_E8: u32 = 0x0000_0007;
/// Vector load of 16-bit elements.
pub const MATCH_VL_E16: u32 = 0x0000_5007;
/// Vector load of 32-bit elements.
pub const MATCH_VL_E32: u32 = 0x0000_6007;
/// Vector load of 64-bit elements.
pub const MATCH_VL_E64: u32 = 0x0000_7007;
/// Vector store of 8-bit elements (any addressing mode).
pub const MATCH_VS_E8: u32 = 0x0000_0027;
/// Vector store of 16-bit elements.
pub const MATCH_VS_E16: u32 = 0x0000_5027;
/// Vector store of 32-bit elements.
pub const MATCH_VS_E32: u32 = 0x0000_6027;
/// Vector store of 64-bit elements.
pub const MATCH_VS_E64: u32 = 0x0000_7027;
/// Mask shared by vector loads and stores; mode, `nf` and masking are decoded
/// by the handler.
pub const MASK_VMEM: u32 = 0x0000_707f;

/// `vadd.vv vd, vs2, vs1, vm`.
pub const MATCH_VADD_VV: u32 = 0x0000_0057;
/// `vadd.vx vd, vs2, rs1, vm`.
pub const MATCH_VADD_VX: u32 = 0x0000_4057;
/// `vadd.vi vd, vs2, simm5, vm`.
pub const MATCH_VADD_VI: u32 = 0x0000_3057;
/// `vssrl.vv vd, vs2, vs1, vm`.
pub const MATCH_VSSRL_VV: u32 = 0xa800_0057;
/// Mask shared by funct6-selected vector arithmetic.
pub const MASK_VARITH: u32 = 0xfc00_707f;

/// `vmv.v.x vd, rs1`.
pub const MATCH_VMV_V_X: u32 = 0x5e00_4057;
/// Mask for `vmv.v.x`.
pub const MASK_VMV_V_X: u32 = 0xfff0_707f;

/// Returns true for any of the `vset{i}vl{i}` configuration instructions.
pub const fn is_vset(word: u32) -> bool {
    word & MASK_VSETVLI == MATCH_VSETVLI
        || word & MASK_VSETIVLI == MATCH_VSETIVLI
        || word & MASK_VSETVL == MATCH_VSETVL
}
