//! Common types shared across the execution core.
//!
//! 1. **Errors:** Architectural traps, the tagged execution signal returned by
//!    semantic handlers, and fatal internal-consistency failures.
//! 2. **Constants:** Program-counter sentinels, debug ROM addresses and the
//!    reserved encodings the trace understands.
//! 3. **Register log ids:** The `index << 4 | kind` keys of the per-instruction
//!    register-write log.

/// Constants used by the step loop, trap delivery and tracing.
pub mod constants;

/// Traps, execution signals and simulator errors.
pub mod error;

/// Register-write log identifiers.
pub mod reg;

pub use error::{Exception, SimError, Trap};
pub use reg::{RegId, RegKind};
