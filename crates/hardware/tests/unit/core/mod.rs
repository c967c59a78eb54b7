//! Core tests.





/// Trigger matching and instruction replay.
pub mod triggers;
