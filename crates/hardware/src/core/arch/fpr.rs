//! RISC-V Floating-Point Register File.
//!
//! Registers are stored as raw 128-bit patterns so that any FLEN up to
//! quad precision fits. Narrower values are NaN-boxed on write.

use crate::common::constants::NUM_REGS;

/// Floating-Point Register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fpr {
    fregs: [u128; NUM_REGS],
}

impl Fpr {
    /// Creates a register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the raw bit pattern of a floating-point register.
    pub fn read(&self, idx: usize) -> u128 {
        self.fregs[idx]
    }

    /// Writes a `width`-bit value, NaN-boxing it into the upper bits.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `width` - Width of `val` in bits (32, 64 or 128).
    /// * `val` - The raw value; bits above `width` are ignored.
    pub fn write(&mut self, idx: usize, width: u32, val: u128) {
        self.fregs[idx] = if width >= 128 {
            val
        } else {
            let low = (1u128 << width) - 1;
            (val & low) | !low
        };
    }
}
