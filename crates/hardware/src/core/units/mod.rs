//! Functional units around the execution core.
//!
//! This module contains the collaborators the step loop drives: the memory
//! seam every access goes through, the decoded-instruction cache behind the
//! fast path, and the debug trigger module.

/// Decoded-instruction cache with successor chaining.
pub mod icache;

/// Memory access seam (`Mmu` trait).
pub mod mmu;

/// Debug triggers (address-match breakpoints and watchpoints).
pub mod triggers;
