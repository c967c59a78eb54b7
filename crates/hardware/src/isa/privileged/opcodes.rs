//! RISC-V Privileged Architecture Opcodes.
//!
//! Full encodings of the fixed system instructions and the funct3 values of
//! the CSR access family.

/// Environment Call (ECALL).
pub const ECALL: u32 = 0x0000_0073;

/// Environment Break (EBREAK).
pub const EBREAK: u32 = 0x0010_0073;

/// Machine Return (MRET).
pub const MRET: u32 = 0x3020_0073;

/// Supervisor Return (SRET).
pub const SRET: u32 = 0x1020_0073;

/// Debug Return (DRET).
pub const DRET: u32 = 0x7b20_0073;

/// Wait for Interrupt (WFI).
pub const WFI: u32 = 0x1050_0073;

/// Atomic Read/Write CSR (CSRRW).
pub const CSRRW: u32 = 0b001;
/// Atomic Read and Set Bits in CSR (CSRRS).
pub const CSRRS: u32 = 0b010;
/// Atomic Read and Clear Bits in CSR (CSRRC).
pub const CSRRC: u32 = 0b011;
