//! Vector register file and vector configuration state.
//!
//! This module implements the state behind the V extension. It provides:
//! 1. **Storage:** 32 registers of VLEN bits, addressed by element with register
//!    grouping (an element index past the end of a register continues in the
//!    next one).
//! 2. **Configuration:** `vl`, `vtype` and the decoded SEW/LMUL/tail and mask
//!    policies, updated by `set_vl` following the `vsetvl{i}`/`vsetivli` rules.
//! 3. **Fixed point:** `vxrm` rounding modes and the `vxsat` flag.

use crate::common::constants::NUM_REGS;

/// Where `vset{i}vl{i}` takes its application vector length from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Avl {
    /// `rd == x0 && rs1 == x0`: keep the current `vl`, clamped to the new VLMAX.
    Keep,
    /// `rd != x0 && rs1 == x0`: use VLMAX.
    Max,
    /// An explicit AVL from a register or immediate.
    Value(u64),
}

/// Fixed-point rounding mode held in `vxrm`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round to nearest, ties up.
    #[default]
    Rnu = 0,
    /// Round to nearest, ties to even.
    Rne = 1,
    /// Round down (truncate).
    Rdn = 2,
    /// Round to odd ("jam").
    Rod = 3,
}

impl RoundingMode {
    /// Decodes the 2-bit `vxrm` field.
    pub const fn from_bits(bits: u64) -> Self {
        match bits & 3 {
            0 => Self::Rnu,
            1 => Self::Rne,
            2 => Self::Rdn,
            _ => Self::Rod,
        }
    }

    /// Rounds `value` ahead of a right shift by `shift` bits, so that
    /// `round(value, shift) >> shift` is the correctly rounded quotient.
    pub const fn round(self, value: u128, shift: u32) -> u128 {
        let lsb = 1u128 << shift;
        let lsb_half = lsb >> 1;
        match self {
            Self::Rnu => value + lsb_half,
            Self::Rne => {
                if value & lsb_half != 0 && (value & (lsb_half.wrapping_sub(1)) != 0 || value & lsb != 0) {
                    value + lsb
                } else {
                    value
                }
            }
            Self::Rdn => value,
            Self::Rod => {
                if value & (lsb - 1) != 0 {
                    value | lsb
                } else {
                    value
                }
            }
        }
    }
}

/// Vector unit state.
#[derive(Clone)]
pub struct VectorUnit {
    vlen: u32,
    elen: u32,
    xlen: u32,
    regs: Vec<u8>,
    /// Current vector length.
    pub vl: u64,
    /// Raw `vtype`; `1 << (XLEN-1)` when the configuration is illegal.
    pub vtype: u64,
    /// First element to process; set to the faulting element by a trapping
    /// vector memory instruction.
    pub vstart: u64,
    /// Fixed-point rounding mode.
    pub vxrm: RoundingMode,
    /// Fixed-point saturation flag.
    pub vxsat: bool,
    /// Selected element width in bits.
    pub vsew: u32,
    /// log2 of the register group multiplier (-3 to 3).
    pub vlmul: i8,
    /// Elements per register group for the current configuration.
    pub vlmax: u64,
    /// Illegal configuration.
    pub vill: bool,
    /// Tail agnostic.
    pub vta: bool,
    /// Mask agnostic.
    pub vma: bool,
}

impl VectorUnit {
    /// Creates a vector unit in the reset state (`vill` set, `vl` zero).
    ///
    /// # Arguments
    ///
    /// * `vlen` - Register width in bits.
    /// * `elen` - Widest element in bits.
    /// * `xlen` - Integer register width; positions the `vill` bit.
    pub fn new(vlen: u32, elen: u32, xlen: u32) -> Self {
        Self {
            vlen,
            elen,
            xlen,
            regs: vec![0; NUM_REGS * (vlen as usize / 8)],
            vl: 0,
            vtype: 1 << (xlen - 1),
            vstart: 0,
            vxrm: RoundingMode::Rnu,
            vxsat: false,
            vsew: 8,
            vlmul: 0,
            vlmax: 0,
            vill: true,
            vta: false,
            vma: false,
        }
    }

    /// Register width in bits.
    pub const fn vlen(&self) -> u32 {
        self.vlen
    }

    /// Register width in bytes (the `vlenb` CSR).
    pub const fn vlenb(&self) -> usize {
        self.vlen as usize / 8
    }

    /// Widest element in bits.
    pub const fn elen(&self) -> u32 {
        self.elen
    }

    /// Applies a new `vtype` and AVL as `vsetvl{i}`/`vsetivli` do, and
    /// returns the resulting `vl`. Always clears `vstart`.
    ///
    /// An illegal `vtype` (reserved LMUL, SEW wider than LMUL allows, or
    /// reserved high bits) sets `vill` and forces `vl` to zero.
    pub fn set_vl(&mut self, avl: Avl, new_type: u64) -> u64 {
        if self.vtype != new_type {
            self.vsew = 1 << (((new_type >> 3) & 7) + 3);
            self.vlmul = (((new_type & 7) as i8) << 5) >> 5;
            self.vta = (new_type >> 6) & 1 != 0;
            self.vma = (new_type >> 7) & 1 != 0;

            let max_sew = if self.vlmul >= 0 {
                self.elen
            } else {
                self.elen >> self.vlmul.unsigned_abs()
            };
            self.vill = !(-3..=3).contains(&self.vlmul)
                || self.vsew > max_sew
                || (new_type >> 8) != 0;

            if self.vill {
                self.vlmax = 0;
                self.vtype = 1 << (self.xlen - 1);
            } else {
                let per_reg = u64::from(self.vlen / self.vsew);
                self.vlmax = if self.vlmul >= 0 {
                    per_reg << self.vlmul
                } else {
                    per_reg >> self.vlmul.unsigned_abs()
                };
                self.vtype = new_type;
            }
        }

        self.vl = if self.vlmax == 0 {
            0
        } else {
            match avl {
                Avl::Keep => self.vl.min(self.vlmax),
                Avl::Max => self.vlmax,
                Avl::Value(req) => req.min(self.vlmax),
            }
        };
        self.vstart = 0;
        self.vl
    }

    /// Elements of `sew` bits held by one register.
    pub const fn elems_per_reg(&self, sew: u32) -> u64 {
        (self.vlen / sew) as u64
    }

    /// Registers spanned by a group of the current LMUL (at least one).
    pub fn group_regs(&self) -> u64 {
        if self.vlmul > 0 { 1 << self.vlmul } else { 1 }
    }

    /// Register holding element `idx` of a `sew`-bit group based at `base`.
    pub const fn elt_reg(&self, base: u64, idx: u64, sew: u32) -> u64 {
        base + idx / self.elems_per_reg(sew)
    }

    fn elt_range(&self, reg: u64, idx: u64, sew: u32) -> std::ops::Range<usize> {
        let bytes = sew as usize / 8;
        let start = (reg as usize * self.vlenb() + idx as usize * bytes) % self.regs.len();
        start..start + bytes
    }

    /// Reads element `idx` of width `sew` from the group based at `reg`,
    /// zero-extended.
    pub fn elt(&self, reg: u64, idx: u64, sew: u32) -> u64 {
        let mut buf = [0u8; 8];
        let range = self.elt_range(reg, idx, sew);
        buf[..range.len()].copy_from_slice(&self.regs[range]);
        u64::from_le_bytes(buf)
    }

    /// Writes element `idx` of width `sew` of the group based at `reg`.
    pub fn set_elt(&mut self, reg: u64, idx: u64, sew: u32, val: u64) {
        let range = self.elt_range(reg, idx, sew);
        let len = range.len();
        self.regs[range].copy_from_slice(&val.to_le_bytes()[..len]);
    }

    /// Mask bit `idx` of `v0`.
    pub fn mask_bit(&self, idx: u64) -> bool {
        let byte = self.regs[(idx / 8) as usize % self.vlenb()];
        (byte >> (idx % 8)) & 1 != 0
    }

    /// Register contents as little-endian 64-bit chunks, least significant first.
    pub fn reg_chunks(&self, reg: u64) -> Vec<u64> {
        let start = (reg as usize % NUM_REGS) * self.vlenb();
        self.regs[start..start + self.vlenb()]
            .chunks(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect()
    }

    /// Low 128 bits of a register.
    pub fn reg_low(&self, reg: u64) -> u128 {
        let chunks = self.reg_chunks(reg);
        let lo = chunks.first().copied().unwrap_or(0);
        let hi = chunks.get(1).copied().unwrap_or(0);
        (u128::from(hi) << 64) | u128::from(lo)
    }

    /// LMUL formatted as the commit log prints it: `m2` or `mf4`.
    pub fn lmul_label(&self) -> String {
        if self.vlmul < 0 {
            format!("mf{}", 1u32 << self.vlmul.unsigned_abs())
        } else {
            format!("m{}", 1u32 << self.vlmul)
        }
    }

    /// The `vcsr` CSR: `vxrm` in bits 2:1, `vxsat` in bit 0.
    pub fn vcsr(&self) -> u64 {
        ((self.vxrm as u64) << 1) | u64::from(self.vxsat)
    }

    /// Writes `vcsr`.
    pub fn set_vcsr(&mut self, val: u64) {
        self.vxrm = RoundingMode::from_bits(val >> 1);
        self.vxsat = val & 1 != 0;
    }
}

impl std::fmt::Debug for VectorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorUnit")
            .field("vlen", &self.vlen)
            .field("vl", &self.vl)
            .field("vtype", &format_args!("{:#x}", self.vtype))
            .field("vstart", &self.vstart)
            .field("vsew", &self.vsew)
            .field("vlmul", &self.vlmul)
            .field("vill", &self.vill)
            .finish_non_exhaustive()
    }
}
