//! Trap, execution-signal and simulator error definitions.
//!
//! This module defines the three layers of failure the core distinguishes:
//! 1. **Trap:** Architectural exceptions and interrupts. They are delivered to
//!    the hart's trap CSRs and never stop the simulation.
//! 2. **Exception:** The tagged outcome of running a semantic handler. The step
//!    loop pattern-matches it at a single dispatch point.
//! 3. **SimError:** Internal-consistency failures and sink I/O failures. These
//!    are fatal; the enclosing driver is expected to abort.

use thiserror::Error;

use crate::core::units::triggers::MatchedTrigger;
use crate::isa::privileged::cause::{exception, interrupt};

/// RISC-V trap types representing exceptions and interrupts.
///
/// Traps transfer control to the trap vector of the handling privilege mode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// Instruction address misaligned. Holds the target address.
    #[error("InstructionAddressMisaligned({0:#x})")]
    InstructionAddressMisaligned(u64),

    /// Instruction fetch outside accessible memory. Holds the fetch address.
    #[error("InstructionAccessFault({0:#x})")]
    InstructionAccessFault(u64),

    /// Unknown or malformed encoding. Holds the instruction bits.
    #[error("IllegalInstruction({0:#x})")]
    IllegalInstruction(u64),

    /// Breakpoint (`ebreak` or a trigger with the debug-exception action).
    /// Holds the breakpoint address.
    #[error("Breakpoint({0:#x})")]
    Breakpoint(u64),

    /// Misaligned load. Holds the address.
    #[error("LoadAddressMisaligned({0:#x})")]
    LoadAddressMisaligned(u64),

    /// Load outside accessible memory. Holds the address.
    #[error("LoadAccessFault({0:#x})")]
    LoadAccessFault(u64),

    /// Misaligned store. Holds the address.
    #[error("StoreAddressMisaligned({0:#x})")]
    StoreAddressMisaligned(u64),

    /// Store outside accessible memory. Holds the address.
    #[error("StoreAccessFault({0:#x})")]
    StoreAccessFault(u64),

    /// `ecall` from U-mode.
    #[error("EnvironmentCallFromUMode")]
    EnvironmentCallFromUMode,

    /// `ecall` from S-mode.
    #[error("EnvironmentCallFromSMode")]
    EnvironmentCallFromSMode,

    /// `ecall` from M-mode.
    #[error("EnvironmentCallFromMMode")]
    EnvironmentCallFromMMode,

    /// Instruction page fault. Holds the virtual address.
    #[error("InstructionPageFault({0:#x})")]
    InstructionPageFault(u64),

    /// Load page fault. Holds the virtual address.
    #[error("LoadPageFault({0:#x})")]
    LoadPageFault(u64),

    /// Store page fault. Holds the virtual address.
    #[error("StorePageFault({0:#x})")]
    StorePageFault(u64),

    /// Supervisor software interrupt.
    #[error("SupervisorSoftwareInterrupt")]
    SupervisorSoftwareInterrupt,

    /// Machine software interrupt.
    #[error("MachineSoftwareInterrupt")]
    MachineSoftwareInterrupt,

    /// Supervisor timer interrupt.
    #[error("SupervisorTimerInterrupt")]
    SupervisorTimerInterrupt,

    /// Machine timer interrupt.
    #[error("MachineTimerInterrupt")]
    MachineTimerInterrupt,

    /// Supervisor external interrupt.
    #[error("SupervisorExternalInterrupt")]
    SupervisorExternalInterrupt,

    /// Machine external interrupt.
    #[error("MachineExternalInterrupt")]
    MachineExternalInterrupt,
}

impl Trap {
    /// Returns true for asynchronous interrupts.
    pub const fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::SupervisorSoftwareInterrupt
                | Self::MachineSoftwareInterrupt
                | Self::SupervisorTimerInterrupt
                | Self::MachineTimerInterrupt
                | Self::SupervisorExternalInterrupt
                | Self::MachineExternalInterrupt
        )
    }

    /// Full cause value as written to `mcause`/`scause`, interrupt bit included.
    pub const fn cause(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromSMode => exception::ENVIRONMENT_CALL_FROM_S_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::InstructionPageFault(_) => exception::INSTRUCTION_PAGE_FAULT,
            Self::LoadPageFault(_) => exception::LOAD_PAGE_FAULT,
            Self::StorePageFault(_) => exception::STORE_PAGE_FAULT,
            Self::SupervisorSoftwareInterrupt => interrupt::SUPERVISOR_SOFTWARE,
            Self::MachineSoftwareInterrupt => interrupt::MACHINE_SOFTWARE,
            Self::SupervisorTimerInterrupt => interrupt::SUPERVISOR_TIMER,
            Self::MachineTimerInterrupt => interrupt::MACHINE_TIMER,
            Self::SupervisorExternalInterrupt => interrupt::SUPERVISOR_EXTERNAL,
            Self::MachineExternalInterrupt => interrupt::MACHINE_EXTERNAL,
        }
    }

    /// Cause code with the interrupt bit stripped; indexes `medeleg`/`mideleg`.
    pub const fn code(&self) -> u64 {
        self.cause() & !crate::common::constants::CAUSE_INTERRUPT_BIT
    }

    /// Trap value written to `mtval`/`stval`.
    pub const fn tval(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(a)
            | Self::InstructionAccessFault(a)
            | Self::IllegalInstruction(a)
            | Self::Breakpoint(a)
            | Self::LoadAddressMisaligned(a)
            | Self::LoadAccessFault(a)
            | Self::StoreAddressMisaligned(a)
            | Self::StoreAccessFault(a)
            | Self::InstructionPageFault(a)
            | Self::LoadPageFault(a)
            | Self::StorePageFault(a) => *a,
            _ => 0,
        }
    }

    /// Returns true for traps raised by the memory system (misaligned,
    /// access-fault and page-fault causes on fetch, load or store).
    ///
    /// A vector memory instruction can raise one of these after some of its
    /// elements were already written.
    pub const fn is_memory_fault(&self) -> bool {
        matches!(
            self,
            Self::InstructionAddressMisaligned(_)
                | Self::InstructionAccessFault(_)
                | Self::LoadAddressMisaligned(_)
                | Self::LoadAccessFault(_)
                | Self::StoreAddressMisaligned(_)
                | Self::StoreAccessFault(_)
                | Self::InstructionPageFault(_)
                | Self::LoadPageFault(_)
                | Self::StorePageFault(_)
        )
    }
}

/// Outcome signalled by a semantic handler instead of a next PC.
///
/// The step loop handles every variant at one dispatch point, in the order the
/// variants are listed.
#[derive(Debug, Error)]
pub enum Exception {
    /// Synchronous trap: deliver it and end the current batch.
    #[error("trap: {0}")]
    Trap(#[from] Trap),

    /// A debug trigger matched. Memory-sourced matches replay the instruction
    /// before the trigger action is taken.
    #[error("trigger matched: {0}")]
    TriggerMatched(MatchedTrigger),

    /// Enter debug mode with the software-breakpoint cause.
    #[error("debug-mode entry requested")]
    DebugMode,

    /// The hart is idle; yield to the outer scheduler. The instruction that
    /// raised it retired.
    #[error("wait for interrupt")]
    WaitForInterrupt,

    /// Internal-consistency failure; aborts the step.
    #[error(transparent)]
    Fatal(#[from] SimError),
}

/// Fatal simulator failures.
///
/// None of these are observable by the simulated program. They mean a handler
/// broke its contract with the core, or a configured sink stopped accepting
/// output.
#[derive(Debug, Error)]
pub enum SimError {
    /// A handler returned an odd next-PC that is not a serialization sentinel.
    #[error("invalid program-counter sentinel {0:#x}")]
    InvalidPcSentinel(u64),

    /// A register-write log entry carries an unknown class nibble.
    #[error("unrecognised register-log tag {0}")]
    UnknownRegisterTag(u64),

    /// The commit log was asked to print a value of a width it cannot format.
    #[error("unsupported commit-log value width {0}")]
    UnsupportedValueWidth(u32),

    /// Writing the commit log failed.
    #[error("commit log write failed")]
    CommitLog(#[source] std::io::Error),

    /// Writing the instruction trace failed.
    #[error("instruction trace write failed")]
    TraceSink(#[source] std::io::Error),
}
