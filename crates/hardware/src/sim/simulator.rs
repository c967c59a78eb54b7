//! Simulator: owns the harts and interleaves them.
//!
//! Scheduling is at batch granularity. A hart returns from `Cpu::step` early
//! when it traps to the end of its quota or yields on `wfi`; the next hart
//! then runs. When halt groups are enabled, a hart entering debug mode posts
//! a group halt request to every other hart, honoured at its next step.

use tracing::debug;

use crate::common::SimError;
use crate::core::Cpu;
use crate::core::cpu::state::HaltRequest;

/// Default instructions per hart per round.
pub const DEFAULT_QUANTUM: u64 = 100;

/// Round-robin driver over several harts.
#[derive(Debug)]
pub struct Simulator {
    harts: Vec<Cpu>,
    quantum: u64,
    halt_group: bool,
    rounds: u64,
}

impl Simulator {
    /// Creates a simulator over `harts`, each stepped `quantum` instructions
    /// per round (at least one).
    pub fn new(harts: Vec<Cpu>, quantum: u64) -> Self {
        Self {
            harts,
            quantum: quantum.max(1),
            halt_group: false,
            rounds: 0,
        }
    }

    /// Puts every hart in one halt group.
    #[must_use]
    pub const fn with_halt_group(mut self, enabled: bool) -> Self {
        self.halt_group = enabled;
        self
    }

    /// Instructions per hart per round.
    pub const fn quantum(&self) -> u64 {
        self.quantum
    }

    /// Completed rounds.
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    /// The harts, in scheduling order.
    pub fn harts(&self) -> &[Cpu] {
        &self.harts
    }

    /// Mutable access to hart `idx`.
    pub fn hart_mut(&mut self, idx: usize) -> Option<&mut Cpu> {
        self.harts.get_mut(idx)
    }

    /// Runs one round: every hart steps once with the quantum.
    ///
    /// # Returns
    ///
    /// Instructions retired across all harts.
    ///
    /// # Errors
    ///
    /// The first hart's [`SimError`]; later harts do not run that round.
    pub fn step_all(&mut self) -> Result<u64, SimError> {
        let mut retired = 0;
        for idx in 0..self.harts.len() {
            let hart = &mut self.harts[idx];
            let was_halted = hart.state.debug_mode;
            retired += hart.step(self.quantum)?;

            if self.halt_group && !was_halted && hart.state.debug_mode {
                debug!("hart {} halted; halting its group", hart.id);
                for (other_idx, other) in self.harts.iter_mut().enumerate() {
                    if other_idx != idx && !other.state.debug_mode {
                        other.set_halt_request(HaltRequest::Group);
                    }
                }
            }
        }
        self.rounds += 1;
        Ok(retired)
    }

    /// Runs `rounds` rounds.
    ///
    /// # Errors
    ///
    /// As [`Simulator::step_all`].
    pub fn run(&mut self, rounds: u64) -> Result<u64, SimError> {
        let mut retired = 0;
        for _ in 0..rounds {
            retired += self.step_all()?;
        }
        Ok(retired)
    }
}
