//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, the container for one
//! hart's entire state. It coordinates the following:
//! 1. **State Management:** Registers, CSRs, vector unit, program counter,
//!    privilege and the debug/single-step state.
//! 2. **Front End:** The `Mmu` the hart fetches and accesses data through,
//!    and the decoded-instruction cache in front of it.
//! 3. **Debug:** Trigger module and external halt requests.
//! 4. **Observability:** Trace producers and execution statistics.

/// CSR access from instructions (privilege checks, vector CSRs, logging).
pub mod csr;

/// Debug-mode entry, halt requests and `dret`.
pub mod debug;

/// Single-instruction execution and post-retirement trace routing.
pub mod execution;

/// Data access from instructions (triggers, alignment, logging).
pub mod memory;

/// Per-hart execution state and the per-instruction log.
pub mod state;

/// The fetch/execute loop.
pub mod step;

/// Trap delivery, interrupt selection and trap return.
pub mod trap;

use std::fmt;

use self::state::{HaltRequest, State, StepMode};
use crate::common::RegId;
use crate::common::RegKind;
use crate::config::{Config, ConfigError};
use crate::core::arch::csr::Csrs;
use crate::core::arch::fpr::Fpr;
use crate::core::arch::gpr::Gpr;
use crate::core::arch::vector::VectorUnit;
use crate::core::units::icache::ICache;
use crate::core::units::mmu::Mmu;
use crate::core::units::triggers::TriggerModule;
use crate::stats::SimStats;
use crate::trace::Tracer;
use crate::trace::commit_log::CommitLog;
use crate::trace::sink::TraceSink;

/// `misa` extension bit for the base integer ISA.
const MISA_EXT_I: u64 = 1 << 8;
/// `misa` extension bit for supervisor mode.
const MISA_EXT_S: u64 = 1 << 18;
/// `misa` extension bit for user mode.
const MISA_EXT_U: u64 = 1 << 20;
/// `misa` extension bit for the vector extension.
const MISA_EXT_V: u64 = 1 << 21;

/// One RISC-V hart.
///
/// Owns its architectural state, the decoded-instruction cache and the trace
/// producers. Memory is reached only through the boxed [`Mmu`].
pub struct Cpu {
    /// Hart id, printed on every commit-log line.
    pub id: u32,
    /// Program counter, privilege, debug state and the per-instruction log.
    pub state: State,
    /// Integer registers.
    pub gpr: Gpr,
    /// Floating-point registers.
    pub fpr: Fpr,
    /// Control and status registers.
    pub csrs: Csrs,
    /// Vector unit.
    pub vu: VectorUnit,
    /// Memory access path.
    pub mmu: Box<dyn Mmu>,
    /// Decoded-instruction cache used by the fast path.
    pub icache: ICache,
    /// Debug triggers.
    pub triggers: TriggerModule,
    /// Pending external halt request.
    pub halt_request: HaltRequest,
    /// Interactive debugging: forces the slow path and logs disassembly.
    pub interactive_debug: bool,
    /// Trace producers.
    pub tracer: Tracer,
    /// Execution statistics.
    pub stats: SimStats,
    xlen: u32,
    flen: u32,
}

impl Cpu {
    /// Creates a hart in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - Hart, ISA and trace configuration; validated here.
    /// * `mmu` - Memory the hart fetches from and accesses.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from validation, or `ConfigError::CommitLog` and
    /// `ConfigError::InstructionTrace` when a configured trace file cannot be
    /// created.
    pub fn new(config: &Config, mmu: Box<dyn Mmu>) -> Result<Self, ConfigError> {
        config.validate()?;
        let isa = &config.isa;
        let mxl: u64 = if isa.xlen == 64 { 2 } else { 1 };

        let csrs = Csrs {
            misa: (mxl << (isa.xlen - 2)) | MISA_EXT_I | MISA_EXT_S | MISA_EXT_U | MISA_EXT_V,
            mhartid: u64::from(config.general.hart_id),
            ..Default::default()
        };

        Ok(Self {
            id: config.general.hart_id,
            state: State {
                pc: config.general.start_pc,
                ..State::default()
            },
            gpr: Gpr::new(),
            fpr: Fpr::new(),
            csrs,
            vu: VectorUnit::new(isa.vlen, isa.elen, isa.xlen),
            mmu,
            icache: ICache::new(config.general.icache_entries),
            triggers: TriggerModule::new(),
            halt_request: HaltRequest::None,
            interactive_debug: config.general.interactive_debug,
            tracer: Tracer::from_config(&config.trace)?,
            stats: SimStats::default(),
            xlen: isa.xlen,
            flen: isa.flen,
        })
    }

    /// Integer register width in bits.
    pub const fn xlen(&self) -> u32 {
        self.xlen
    }

    /// Floating-point register width in bits.
    pub const fn flen(&self) -> u32 {
        self.flen
    }

    /// Current program counter.
    pub const fn pc(&self) -> u64 {
        self.state.pc
    }

    /// Reads an integer register.
    pub fn read_x(&self, idx: usize) -> u64 {
        self.gpr.read(idx)
    }

    /// Writes an integer register and logs the write. On an RV32 hart the
    /// value is sign-extended from bit 31.
    pub fn write_x(&mut self, idx: usize, val: u64) {
        let val = if self.xlen == 32 {
            val as i32 as i64 as u64
        } else {
            val
        };
        self.gpr.write(idx, val);
        self.state
            .log
            .write_reg(RegId::new(idx as u64, RegKind::Int), u128::from(val));
    }

    /// Writes a floating-point register (NaN-boxed to `width`) and logs it.
    pub fn write_f(&mut self, idx: usize, width: u32, val: u128) {
        self.fpr.write(idx, width, val);
        let boxed = self.fpr.read(idx);
        self.state
            .log
            .write_reg(RegId::new(idx as u64, RegKind::Float), boxed);
    }

    /// Logs a whole-register vector write of `v<idx>`.
    pub fn log_vreg(&mut self, idx: u64) {
        let low = self.vu.reg_low(idx);
        self.state
            .log
            .write_reg(RegId::new(idx, RegKind::Vector), low);
    }

    /// Logs the outcome of a control transfer.
    pub fn log_branch(&mut self, taken: bool) {
        self.state.log.is_branch = true;
        self.state.log.branch_taken = taken;
    }

    /// Replaces the instruction-trace sink.
    ///
    /// Events already recorded in memory are discarded.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer.set_sink(sink);
    }

    /// Enables commit logging to `log`.
    pub fn set_commit_log(&mut self, log: CommitLog) {
        self.tracer.commit_log = Some(log);
    }

    /// Posts an external halt request, honoured at the next `step`.
    pub fn set_halt_request(&mut self, request: HaltRequest) {
        self.halt_request = request;
    }

    /// Arms single-step: exactly one more instruction executes before the
    /// hart enters debug mode.
    pub fn arm_single_step(&mut self) {
        self.state.single_step = StepMode::Stepping;
    }

    /// Drops every cached decode, for callers that rewrite code memory.
    pub fn flush_icache(&mut self) {
        self.icache.flush();
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("id", &self.id)
            .field("pc", &format_args!("{:#018x}", self.state.pc))
            .field("prv", &self.state.prv)
            .field("debug_mode", &self.state.debug_mode)
            .field("single_step", &self.state.single_step)
            .field("minstret", &self.csrs.minstret)
            .field("vu", &self.vu)
            .finish_non_exhaustive()
    }
}
