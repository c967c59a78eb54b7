//! Multi-hart simulation.
//!
//! Drives several harts with cooperative scheduling: each hart runs a fixed
//! quantum of instructions per round, then hands over to the next.

/// Round-robin driver.
pub mod simulator;

pub use self::simulator::Simulator;
