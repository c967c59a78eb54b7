//! Instruction Set Architecture (ISA) definitions.
//!
//! Contains encodings, the decoder and the semantic handlers for the
//! instruction forms the core executes.
//!
//! # Structure
//!
//! * `instruction`: Instruction container and field extraction.
//! * `encoding`: Match/mask pairs for every decodable form.
//! * `decode`: Opcode table mapping a word to its handler.
//! * `semantics`: The handlers.
//! * `rvv`: Vector extension opcodes and classification helpers.
//! * `privileged`: Trap causes and fixed system encodings.
//! * `disasm`: Mnemonic rendering for interactive debugging.

/// Opcode table and instruction decoding.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Match/mask encodings of the supported instruction forms.
pub mod encoding;

/// Instruction container and bit-field extraction.
pub mod instruction;

/// Privileged architecture definitions (trap causes, system instructions).
pub mod privileged;

/// Vector extension encodings.
pub mod rvv;

/// Semantic handlers, one per instruction form.
pub mod semantics;
