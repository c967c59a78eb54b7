//! Vector extension opcode and function-field values.

/// Vector arithmetic and configuration major opcode.
pub const OP_V: u32 = 0x57;

/// Vector load major opcode (shared with scalar FP loads).
pub const OP_LOAD_FP: u32 = 0x07;

/// Vector store major opcode (shared with scalar FP stores).
pub const OP_STORE_FP: u32 = 0x27;

/// Integer vector-vector operands.
pub const OPIVV: u32 = 0;
/// Floating-point vector-vector operands.
pub const OPFVV: u32 = 1;
/// Mask/integer vector-vector operands.
pub const OPMVV: u32 = 2;
/// Integer vector-immediate operands.
pub const OPIVI: u32 = 3;
/// Integer vector-scalar operands.
pub const OPIVX: u32 = 4;
/// Floating-point vector-scalar operands.
pub const OPFVF: u32 = 5;
/// Mask/integer vector-scalar operands.
pub const OPMVX: u32 = 6;
/// Configuration (`vset*`).
pub const OPCFG: u32 = 7;

/// OPFVV unary group 0 (conversions); `vs1` selects the operation.
pub const FUNCT6_VFUNARY0: u32 = 0x12;
/// OPFVV unary group 1 (sqrt, classify, ...).
pub const FUNCT6_VFUNARY1: u32 = 0x13;
/// OPMVV integer unary group (extensions).
pub const FUNCT6_VXUNARY: u32 = 0x13;
/// OPMVV mask unary group (`vmsbf`, `viota`, ...).
pub const FUNCT6_VMUNARY: u32 = 0x14;

/// Bit of `vs1` inside VFUNARY0 that selects the widening conversions.
pub const VFUNARY0_WIDENING_BIT: u32 = 18;

/// Unit-stride addressing.
pub const MOP_UNIT_STRIDE: u32 = 0;
/// Indexed-unordered addressing.
pub const MOP_INDEXED_UNORDERED: u32 = 1;
/// Strided addressing.
pub const MOP_STRIDED: u32 = 2;
/// Indexed-ordered addressing.
pub const MOP_INDEXED_ORDERED: u32 = 3;

/// Bit 26 of a vector memory encoding: set for both indexed modes.
pub const MOP_INDEXED_BIT: u32 = 26;
