//! Privileged Architecture Definitions.
//!
//! - `cause`: Exception, interrupt and debug-entry cause codes.
//! - `opcodes`: System instruction encodings (ECALL, EBREAK, xRET, WFI, CSR).

/// Exception, interrupt and debug-entry cause code definitions.
pub mod cause;

/// System instruction encodings.
pub mod opcodes;
