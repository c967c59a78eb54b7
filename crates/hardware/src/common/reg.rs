//! Register-write log identifiers.
//!
//! Each register write recorded while an instruction executes is keyed by
//! `index << 4 | kind`. Keys sort by register index first, and that is the
//! order the commit log prints them in.

use super::error::SimError;

/// Register class held in the low nibble of a [`RegId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegKind {
    /// Integer register `x<n>`.
    Int = 0,
    /// Floating-point register `f<n>`.
    Float = 1,
    /// A whole vector register `v<n>`.
    Vector = 2,
    /// A vector write without a single register value, produced element by
    /// element by vector memory instructions.
    VectorGeneric = 3,
    /// Control and status register.
    Csr = 4,
}

impl RegKind {
    /// Decodes a log tag nibble.
    ///
    /// # Errors
    ///
    /// `SimError::UnknownRegisterTag` for any tag a handler should never
    /// have produced.
    pub fn from_tag(tag: u64) -> Result<Self, SimError> {
        match tag {
            0 => Ok(Self::Int),
            1 => Ok(Self::Float),
            2 => Ok(Self::Vector),
            3 => Ok(Self::VectorGeneric),
            4 => Ok(Self::Csr),
            other => Err(SimError::UnknownRegisterTag(other)),
        }
    }
}

/// Encoded register identifier: `index << 4 | kind`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegId(pub u64);

impl RegId {
    /// Builds the id of register `index` of class `kind`.
    pub const fn new(index: u64, kind: RegKind) -> Self {
        Self((index << 4) | kind as u64)
    }

    /// Register index.
    pub const fn index(self) -> u64 {
        self.0 >> 4
    }

    /// Raw class nibble.
    pub const fn tag(self) -> u64 {
        self.0 & 0xf
    }

    /// Decoded register class.
    ///
    /// # Errors
    ///
    /// Propagates [`RegKind::from_tag`] failures.
    pub fn kind(self) -> Result<RegKind, SimError> {
        RegKind::from_tag(self.tag())
    }
}
