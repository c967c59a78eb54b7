//! Shared test infrastructure.

/// Instruction encoders.
pub mod asm;


/// Mock trace sink and memory.
pub mod mocks;
