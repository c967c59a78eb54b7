//! Vector extension (V) encodings.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes, operand categories, unary function groups and
//!   memory addressing modes.
//! - Classification helpers used by the trace to recognise vector forms from
//!   the raw word alone.

/// Vector opcode and function-field values.
pub mod opcodes;

use self::opcodes::{MOP_INDEXED_BIT, OP_LOAD_FP, OP_STORE_FP, OP_V};
use crate::isa::instruction::InstructionBits;

/// Element width in bits selected by the `width` field of a vector memory
/// encoding, or `None` for the scalar FP widths.
pub const fn eew_from_width(width: u32) -> Option<u32> {
    match width {
        0 => Some(8),
        5 => Some(16),
        6 => Some(32),
        7 => Some(64),
        _ => None,
    }
}

/// Returns true when the major opcode is vector arithmetic, load or store.
pub fn is_vector_opcode(word: u32) -> bool {
    matches!(word.opcode(), OP_V | OP_LOAD_FP | OP_STORE_FP)
}

/// Returns true for an indexed vector load or store.
pub fn is_indexed_mem(word: u32) -> bool {
    matches!(word.opcode(), OP_LOAD_FP | OP_STORE_FP) && (word >> MOP_INDEXED_BIT) & 1 == 1
}

/// Returns true for an OP-V encoding with operand category `funct3`.
pub fn is_op_v_category(word: u32, funct3: u32) -> bool {
    word.opcode() == OP_V && word.funct3() == funct3
}

/// Returns true for an OP-V encoding with category `funct3` and function `funct6`.
pub fn is_op_v_function(word: u32, funct3: u32, funct6: u32) -> bool {
    is_op_v_category(word, funct3) && word.funct6() == funct6
}
