//! Instruction-level RISC-V execution core.
//!
//! This crate implements the fetch/decode/execute/retire loop of a RISC-V hart
//! together with the machinery that makes it observable:
//! 1. **Core:** Architectural state, the step loop (fast icache path and slow
//!    debug path), precise trap delivery, single-step and debug-mode entry.
//! 2. **ISA:** Encodings, an opcode-table decoder, and the semantic handlers
//!    for the scalar and vector instructions the core ships with.
//! 3. **Trace:** Commit log, binary instruction trace with per-micro-op
//!    reconstruction, memory access-period history and PC histogram.
//! 4. **SoC / Sim:** Flat RAM backing store and a round-robin multi-hart driver.

/// Common types and constants (traps, execution signals, register log ids).
pub mod common;
/// Simulator configuration (defaults, JSON loading, validation).
pub mod config;
/// CPU core (architectural state, step loop, trap and debug handling).
pub mod core;
/// Instruction set (encodings, decoder, semantic handlers, disassembler).
pub mod isa;
/// Multi-hart driver.
pub mod sim;
/// Memory backing stores implementing the core's `Mmu` seam.
pub mod soc;
/// Execution statistics.
pub mod stats;
/// Trace sinks and per-instruction trace producers.
pub mod trace;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The hart; owns architectural state, icache, trace sinks and its `Mmu`.
pub use crate::core::Cpu;
/// Round-robin driver over several harts.
pub use crate::sim::Simulator;
