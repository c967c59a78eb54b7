//! Per-hart execution state and the per-instruction log.
//!
//! The log collects every architectural effect of the instruction being
//! executed (register writes, memory reads and writes, vector micro-op
//! addresses, branch outcome). It is cleared before each instruction and
//! consumed by the commit log, the access-period tracker and the raw-op
//! reconstructor after it retires.

use std::collections::BTreeMap;

use crate::common::{RegId, RegKind};
use crate::core::arch::mode::PrivilegeMode;

/// Single-step state machine driven by `dcsr.step` and `dret`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepMode {
    /// Not stepping.
    #[default]
    None,
    /// Armed: the next instruction executes, then the hart re-enters debug mode.
    Stepping,
    /// One instruction has started since arming; the next boundary enters debug mode.
    Stepped,
}

/// External debugger halt request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HaltRequest {
    /// No request.
    #[default]
    None,
    /// Halt this hart.
    Regular,
    /// Halt because another hart in the halt group halted.
    Group,
}

/// One logged memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// Accessed address.
    pub addr: u64,
    /// Value read or written, zero-extended.
    pub value: u64,
    /// Access size in bytes.
    pub size: u8,
}

/// One data address touched by the instruction, with the vector register the
/// element belongs to. Scalar accesses carry no register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UopAddr {
    /// Accessed address.
    pub addr: u64,
    /// Vector register of the element, for vector memory instructions.
    pub vreg: Option<u64>,
}

/// Effects recorded while one instruction executes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsnLog {
    /// Register writes keyed by `index << 4 | kind`, in key order.
    pub reg_write: BTreeMap<RegId, u128>,
    /// Loads, in execution order.
    pub mem_read: Vec<MemAccess>,
    /// Stores, in execution order.
    pub mem_write: Vec<MemAccess>,
    /// Every data address, in execution order.
    pub uop_addrs: Vec<UopAddr>,
    /// The instruction is a control transfer.
    pub is_branch: bool,
    /// The control transfer was taken.
    pub branch_taken: bool,
    /// Privilege the instruction executed at.
    pub priv_mode: PrivilegeMode,
    /// Integer width the instruction executed with.
    pub xlen: u32,
    /// Floating-point width the instruction executed with.
    pub flen: u32,
}

impl InsnLog {
    /// Clears every buffer and stashes the privilege and widths the next
    /// instruction runs with.
    pub fn reset(&mut self, priv_mode: PrivilegeMode, xlen: u32, flen: u32) {
        self.reg_write.clear();
        self.mem_read.clear();
        self.mem_write.clear();
        self.uop_addrs.clear();
        self.is_branch = false;
        self.branch_taken = false;
        self.priv_mode = priv_mode;
        self.xlen = xlen;
        self.flen = flen;
    }

    /// Records a register write, replacing an earlier write to the same register.
    pub fn write_reg(&mut self, id: RegId, value: u128) {
        let _ = self.reg_write.insert(id, value);
    }

    /// Returns true when a vector memory instruction already wrote part of
    /// its destination.
    pub fn has_vector_generic_write(&self) -> bool {
        self.reg_write
            .keys()
            .any(|id| id.tag() == RegKind::VectorGeneric as u64)
    }

    /// Number of logged data addresses.
    pub fn num_addresses(&self) -> usize {
        self.uop_addrs.len()
    }
}

/// Architectural and control state of a hart.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Program counter.
    pub pc: u64,
    /// Current privilege mode.
    pub prv: PrivilegeMode,
    /// Single-step state.
    pub single_step: StepMode,
    /// The hart is in debug mode.
    pub debug_mode: bool,
    /// The instruction at `pc` asked for serialization and will be re-run.
    pub serialized: bool,
    /// Effects of the instruction being executed.
    pub log: InsnLog,
}
