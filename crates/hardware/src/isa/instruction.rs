//! Instruction encoding and field extraction utilities.
//!
//! Provides bit extraction for the scalar and vector instruction formats and
//! the `Insn` handle passed to semantic handlers.

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for a 5-bit register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for extracting the funct6 field (bits 26-31).
pub const FUNCT6_MASK: u32 = 0x3F;
/// Bit mask for extracting the CSR address field (bits 20-31).
pub const CSR_MASK: u32 = 0xFFF;

/// Bit position of the `rd`/`vd`/`vs3` field.
pub const RD_SHIFT: u32 = 7;
/// Bit position of the `rs1`/`vs1` field.
pub const RS1_SHIFT: u32 = 15;
/// Bit position of the `rs2`/`vs2` field.
pub const RS2_SHIFT: u32 = 20;

/// Field extraction over a 32-bit instruction encoding.
///
/// Vector instructions reuse the scalar register fields: `vd` and `vs3` sit in
/// `rd`, `vs1` in `rs1`, and `vs2` in `rs2`.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14). For vector instructions this is
    /// the operand category (OPIVV, OPMVX, ...) or the memory element width.
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Extracts the funct6 field (bits 26-31) of vector arithmetic encodings.
    fn funct6(&self) -> u32;

    /// Extracts the CSR address field (bits 20-31).
    fn csr(&self) -> u32;

    /// Vector mask bit (bit 25). Set means unmasked.
    fn vm(&self) -> bool;

    /// Vector memory addressing mode (bits 26-27).
    fn mop(&self) -> u32;

    /// Vector memory segment field count minus one (bits 29-31).
    fn nf(&self) -> u32;

    /// Unit-stride vector memory sub-mode (bits 20-24).
    fn lumop(&self) -> u32;

    /// Sign-extended 5-bit vector immediate (bits 15-19).
    fn simm5(&self) -> i64;

    /// `vsetvli` vtype immediate (bits 20-30).
    fn zimm11(&self) -> u64;

    /// `vsetivli` vtype immediate (bits 20-29).
    fn zimm10(&self) -> u64;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> RS1_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> RS2_SHIFT) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn funct6(&self) -> u32 {
        (self >> 26) & FUNCT6_MASK
    }

    #[inline(always)]
    fn csr(&self) -> u32 {
        (self >> 20) & CSR_MASK
    }

    #[inline(always)]
    fn vm(&self) -> bool {
        (self >> 25) & 1 != 0
    }

    #[inline(always)]
    fn mop(&self) -> u32 {
        (self >> 26) & 3
    }

    #[inline(always)]
    fn nf(&self) -> u32 {
        (self >> 29) & 7
    }

    #[inline(always)]
    fn lumop(&self) -> u32 {
        (self >> 20) & REG_MASK
    }

    #[inline(always)]
    fn simm5(&self) -> i64 {
        i64::from(((*self as i32) << 12) >> 27)
    }

    #[inline(always)]
    fn zimm11(&self) -> u64 {
        u64::from((self >> 20) & 0x7FF)
    }

    #[inline(always)]
    fn zimm10(&self) -> u64 {
        u64::from((self >> 20) & 0x3FF)
    }
}

/// Replaces the 5-bit register field at `shift` with `val` (truncated to 5 bits).
pub const fn with_reg_field(word: u32, shift: u32, val: u32) -> u32 {
    (word & !(REG_MASK << shift)) | ((val & REG_MASK) << shift)
}

/// Increments the 5-bit register field at `shift`, wrapping from 31 to 0.
pub const fn increment_reg_field(word: u32, shift: u32) -> u32 {
    with_reg_field(word, shift, ((word >> shift) & REG_MASK) + 1)
}

/// A fetched instruction word.
///
/// Holds up to 64 bits so that long encodings keep their full pattern for the
/// commit log; the field accessors read the low 32 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insn(u64);

impl Insn {
    /// Wraps a raw instruction pattern.
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw instruction pattern.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Low 32 bits of the pattern; the word field accessors and the trace see.
    pub const fn word(self) -> u32 {
        self.0 as u32
    }

    /// Encoded length in bytes, from the low opcode bits.
    pub const fn length(self) -> u64 {
        length_from_low_bits(self.0)
    }

    /// Sign-extended I-type immediate.
    pub const fn i_imm(self) -> i64 {
        ((self.word() as i32) >> 20) as i64
    }

    /// Sign-extended S-type immediate.
    pub const fn s_imm(self) -> i64 {
        let w = self.word();
        let imm = ((w >> 25) << 5) | ((w >> 7) & 0x1F);
        (((imm as i32) << 20) >> 20) as i64
    }

    /// Sign-extended B-type immediate.
    pub const fn b_imm(self) -> i64 {
        let w = self.word();
        let imm = (((w >> 31) & 1) << 12)
            | (((w >> 7) & 1) << 11)
            | (((w >> 25) & 0x3F) << 5)
            | (((w >> 8) & 0xF) << 1);
        (((imm as i32) << 19) >> 19) as i64
    }

    /// Sign-extended J-type immediate.
    pub const fn j_imm(self) -> i64 {
        let w = self.word();
        let imm = (((w >> 31) & 1) << 20)
            | (((w >> 12) & 0xFF) << 12)
            | (((w >> 20) & 1) << 11)
            | (((w >> 21) & 0x3FF) << 1);
        (((imm as i32) << 11) >> 11) as i64
    }
}

/// Instruction length in bytes implied by the low bits of the first parcel.
pub const fn length_from_low_bits(bits: u64) -> u64 {
    if bits & 0x03 < 0x03 {
        2
    } else if bits & 0x1F < 0x1F {
        4
    } else if bits & 0x3F < 0x3F {
        6
    } else if bits & 0x7F < 0x7F {
        8
    } else {
        4
    }
}

impl InstructionBits for Insn {
    fn opcode(&self) -> u32 {
        self.word().opcode()
    }

    fn rd(&self) -> usize {
        self.word().rd()
    }

    fn rs1(&self) -> usize {
        self.word().rs1()
    }

    fn rs2(&self) -> usize {
        self.word().rs2()
    }

    fn funct3(&self) -> u32 {
        self.word().funct3()
    }

    fn funct7(&self) -> u32 {
        self.word().funct7()
    }

    fn funct6(&self) -> u32 {
        self.word().funct6()
    }

    fn csr(&self) -> u32 {
        self.word().csr()
    }

    fn vm(&self) -> bool {
        self.word().vm()
    }

    fn mop(&self) -> u32 {
        self.word().mop()
    }

    fn nf(&self) -> u32 {
        self.word().nf()
    }

    fn lumop(&self) -> u32 {
        self.word().lumop()
    }

    fn simm5(&self) -> i64 {
        self.word().simm5()
    }

    fn zimm11(&self) -> u64 {
        self.word().zimm11()
    }

    fn zimm10(&self) -> u64 {
        self.word().zimm10()
    }
}
