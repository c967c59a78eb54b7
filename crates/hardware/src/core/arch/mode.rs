//! RISC-V Privilege Modes.
//!
//! This module defines the privilege levels a hart can execute in.
//! It implements the following:
//! 1. **Mode Classification:** Definitions for User (U), Supervisor (S), and Machine (M) modes.
//! 2. **Encoding:** Conversion to and from the 2-bit field stored in `mstatus.MPP` and `dcsr.prv`.
//! 3. **Observability:** Human-readable naming for logs; the commit log prints the numeric form.

/// RISC-V privilege mode levels.
///
/// Machine mode is the highest privilege level. Ordering follows privilege, so
/// `mode <= PrivilegeMode::Supervisor` selects the delegable modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PrivilegeMode {
    /// User mode (U-mode).
    User = 0,

    /// Supervisor mode (S-mode).
    Supervisor = 1,

    /// Machine mode (M-mode). Harts reset into it.
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Decodes a 2-bit privilege field.
    ///
    /// # Arguments
    ///
    /// * `val` - The numeric privilege mode value (0, 1, or 3).
    ///
    /// # Returns
    ///
    /// The corresponding `PrivilegeMode`. The reserved encoding 2 decodes as
    /// `Machine`.
    pub const fn from_u8(val: u8) -> Self {
        match val & 3 {
            0 => Self::User,
            1 => Self::Supervisor,
            _ => Self::Machine,
        }
    }

    /// Numeric encoding (0, 1, or 3).
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable name of the privilege mode.
    pub const fn name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Supervisor => "Supervisor",
            Self::Machine => "Machine",
        }
    }
}

impl std::fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
