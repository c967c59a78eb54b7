//! RISC-V architecture-specific components.
//!
//! This module contains the architectural state of a hart.
//! It includes the following modules:
//! 1. **CSRs:** Control and Status Register definitions, storage and naming.
//! 2. **FPRs:** Floating-Point Register file.
//! 3. **GPRs:** General-Purpose Register file.
//! 4. **Modes:** Privilege mode definitions.
//! 5. **Traps:** Interrupt-bit mapping and priority.
//! 6. **Vector:** Vector register file and configuration.

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Privilege mode definitions.
pub mod mode;

/// Interrupt mapping and priority.
pub mod trap;

/// Vector register file and configuration.
pub mod vector;
