//! Core processor implementation.
//!
//! This module contains the hart: its architectural state, the fetch/execute
//! loop with trap and debug handling, and the front-end units (MMU seam,
//! decoded-instruction cache, debug triggers) it executes through.

/// Architecture-specific components (CSRs, register files, privilege modes, vector unit).
pub mod arch;

/// The hart and its fetch/execute loop.
pub mod cpu;

/// Front-end units (MMU seam, icache, debug triggers).
pub mod units;

pub use self::cpu::Cpu;
