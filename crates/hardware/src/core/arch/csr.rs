//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the CSR subsystem of the hart. It provides:
//! 1. **Address Definitions:** Constants for the machine, supervisor, debug, counter
//!    and vector CSRs the core models.
//! 2. **Field Masks:** Bitmasks for `mstatus`, `mip`/`mie` and `dcsr`.
//! 3. **Register Storage:** The `Csrs` struct and the structured `Dcsr`.
//! 4. **Naming:** `csr_name` for commit-log register labels.
//!
//! The vector CSRs are stored in the vector unit; only their addresses live here.

use crate::core::arch::mode::PrivilegeMode;

/// Vector start index CSR address.
pub const VSTART: u32 = 0x008;

/// Fixed-point saturation flag CSR address.
pub const VXSAT: u32 = 0x009;

/// Fixed-point rounding mode CSR address.
pub const VXRM: u32 = 0x00A;

/// Vector control and status CSR address (`vxrm` and `vxsat` combined).
pub const VCSR: u32 = 0x00F;

/// Supervisor status register CSR address.
pub const SSTATUS: u32 = 0x100;

/// Supervisor interrupt enable register CSR address.
pub const SIE: u32 = 0x104;

/// Supervisor trap vector base address register CSR address.
pub const STVEC: u32 = 0x105;

/// Supervisor scratch register CSR address.
pub const SSCRATCH: u32 = 0x140;

/// Supervisor exception program counter CSR address.
pub const SEPC: u32 = 0x141;

/// Supervisor cause register CSR address.
pub const SCAUSE: u32 = 0x142;

/// Supervisor trap value register CSR address.
pub const STVAL: u32 = 0x143;

/// Supervisor interrupt pending register CSR address.
pub const SIP: u32 = 0x144;

/// Supervisor address translation and protection register CSR address.
pub const SATP: u32 = 0x180;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;

/// Machine exception delegation register CSR address.
pub const MEDELEG: u32 = 0x302;

/// Machine interrupt delegation register CSR address.
pub const MIDELEG: u32 = 0x303;

/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;

/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Debug control and status register CSR address.
pub const DCSR: u32 = 0x7B0;

/// Debug program counter CSR address.
pub const DPC: u32 = 0x7B1;

/// Debug scratch register 0 CSR address.
pub const DSCRATCH0: u32 = 0x7B2;

/// Machine cycle counter CSR address.
pub const MCYCLE: u32 = 0xB00;

/// Machine instructions retired counter CSR address.
pub const MINSTRET: u32 = 0xB02;

/// First machine hardware performance counter CSR address (`mhpmcounter3`).
pub const MHPMCOUNTER3: u32 = 0xB03;

/// Last machine hardware performance counter CSR address (`mhpmcounter31`).
pub const MHPMCOUNTER31: u32 = 0xB1F;

/// Cycle counter CSR address (read-only shadow of `mcycle`).
pub const CYCLE: u32 = 0xC00;

/// Instructions retired counter CSR address (read-only shadow of `minstret`).
pub const INSTRET: u32 = 0xC02;

/// First user performance counter shadow CSR address (`hpmcounter3`).
pub const HPMCOUNTER3: u32 = 0xC03;

/// Last user performance counter shadow CSR address (`hpmcounter31`).
pub const HPMCOUNTER31: u32 = 0xC1F;

/// Vector length CSR address.
pub const VL: u32 = 0xC20;

/// Vector type CSR address.
pub const VTYPE: u32 = 0xC21;

/// Vector register length in bytes CSR address.
pub const VLENB: u32 = 0xC22;

/// Machine hardware thread ID CSR address.
pub const MHARTID: u32 = 0xF14;

/// Supervisor interrupt enable bit in `mstatus` register.
pub const MSTATUS_SIE: u64 = 1 << 1;

/// Machine interrupt enable bit in `mstatus` register.
pub const MSTATUS_MIE: u64 = 1 << 3;

/// Supervisor previous interrupt enable bit in `mstatus` register.
pub const MSTATUS_SPIE: u64 = 1 << 5;

/// Machine previous interrupt enable bit in `mstatus` register.
pub const MSTATUS_MPIE: u64 = 1 << 7;

/// Supervisor previous privilege mode bit in `mstatus` register.
pub const MSTATUS_SPP: u64 = 1 << 8;

/// Vector state field mask in `mstatus` register.
pub const MSTATUS_VS: u64 = 3 << 9;

/// Machine previous privilege mode field mask in `mstatus` register.
pub const MSTATUS_MPP: u64 = 3 << 11;

/// Bit shift for machine previous privilege mode field in `mstatus` register.
pub const MSTATUS_MPP_SHIFT: u64 = 11;

/// Floating-point state field mask in `mstatus` register.
pub const MSTATUS_FS: u64 = 3 << 13;

/// Bits of `mstatus` visible through `sstatus`.
pub const SSTATUS_MASK: u64 = MSTATUS_SIE | MSTATUS_SPIE | MSTATUS_SPP | MSTATUS_VS | MSTATUS_FS;

/// Supervisor software interrupt pending bit in `mip` register.
pub const MIP_SSIP: u64 = 1 << 1;

/// Machine software interrupt pending bit in `mip` register.
pub const MIP_MSIP: u64 = 1 << 3;

/// Supervisor timer interrupt pending bit in `mip` register.
pub const MIP_STIP: u64 = 1 << 5;

/// Machine timer interrupt pending bit in `mip` register.
pub const MIP_MTIP: u64 = 1 << 7;

/// Supervisor external interrupt pending bit in `mip` register.
pub const MIP_SEIP: u64 = 1 << 9;

/// Machine external interrupt pending bit in `mip` register.
pub const MIP_MEIP: u64 = 1 << 11;

/// Supervisor-level interrupt bits; the only ones `mideleg` can delegate.
pub const MIP_SUPERVISOR_MASK: u64 = MIP_SSIP | MIP_STIP | MIP_SEIP;

/// `dcsr.prv` field mask.
pub const DCSR_PRV: u64 = 3;

/// `dcsr.step` bit.
pub const DCSR_STEP: u64 = 1 << 2;

/// `dcsr.halt` bit (sticky halt request).
pub const DCSR_HALT: u64 = 1 << 3;

/// `dcsr.cause` field shift.
pub const DCSR_CAUSE_SHIFT: u64 = 6;

/// `dcsr.cause` field mask (after shifting).
pub const DCSR_CAUSE_MASK: u64 = 7;

/// `dcsr.stepie` bit.
pub const DCSR_STEPIE: u64 = 1 << 11;

/// `dcsr.ebreaku` bit.
pub const DCSR_EBREAKU: u64 = 1 << 12;

/// `dcsr.ebreaks` bit.
pub const DCSR_EBREAKS: u64 = 1 << 13;

/// `dcsr.ebreakm` bit.
pub const DCSR_EBREAKM: u64 = 1 << 15;

/// `dcsr.xdebugver` value: external debug support present.
pub const DCSR_XDEBUGVER: u64 = 1 << 30;

/// Number of `mhpmcounter` registers (3 through 31).
pub const NUM_HPM_COUNTERS: usize = 29;

/// Debug control and status register.
///
/// Kept structured because the step loop consults its fields on every batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dcsr {
    /// Privilege mode the hart was in when it entered debug mode; restored by `dret`.
    pub prv: PrivilegeMode,
    /// Single-step on resume.
    pub step: bool,
    /// `ebreak` in M-mode enters debug mode.
    pub ebreakm: bool,
    /// `ebreak` in S-mode enters debug mode.
    pub ebreaks: bool,
    /// `ebreak` in U-mode enters debug mode.
    pub ebreaku: bool,
    /// Interrupts are taken while single-stepping.
    pub stepie: bool,
    /// Sticky halt request.
    pub halt: bool,
    /// Why debug mode was last entered (see `cause::debug`).
    pub cause: u8,
}

impl Dcsr {
    /// Packs the fields into the architectural register layout.
    pub fn read(&self) -> u64 {
        let flag = |set: bool, bit: u64| if set { bit } else { 0 };
        DCSR_XDEBUGVER
            | flag(self.ebreakm, DCSR_EBREAKM)
            | flag(self.ebreaks, DCSR_EBREAKS)
            | flag(self.ebreaku, DCSR_EBREAKU)
            | flag(self.stepie, DCSR_STEPIE)
            | ((u64::from(self.cause) & DCSR_CAUSE_MASK) << DCSR_CAUSE_SHIFT)
            | flag(self.halt, DCSR_HALT)
            | flag(self.step, DCSR_STEP)
            | u64::from(self.prv.to_u8())
    }

    /// Updates the writable fields. `cause` is read-only to software.
    pub fn write(&mut self, val: u64) {
        self.prv = PrivilegeMode::from_u8((val & DCSR_PRV) as u8);
        self.step = val & DCSR_STEP != 0;
        self.halt = val & DCSR_HALT != 0;
        self.stepie = val & DCSR_STEPIE != 0;
        self.ebreaku = val & DCSR_EBREAKU != 0;
        self.ebreaks = val & DCSR_EBREAKS != 0;
        self.ebreakm = val & DCSR_EBREAKM != 0;
    }

    /// Records a debug-mode entry.
    pub fn write_cause_and_prv(&mut self, cause: u8, prv: PrivilegeMode) {
        self.cause = cause;
        self.prv = prv;
    }

    /// Returns true when `ebreak` executed in `prv` should enter debug mode.
    pub const fn ebreak_enters_debug(&self, prv: PrivilegeMode) -> bool {
        match prv {
            PrivilegeMode::Machine => self.ebreakm,
            PrivilegeMode::Supervisor => self.ebreaks,
            PrivilegeMode::User => self.ebreaku,
        }
    }
}

/// Control and Status Register file.
///
/// Holds the machine, supervisor, debug and counter CSRs. `sstatus`, `sie`
/// and `sip` are views of their machine counterparts and have no storage.
#[derive(Clone, Debug, Default)]
pub struct Csrs {
    /// Machine status register.
    pub mstatus: u64,
    /// Machine ISA register.
    pub misa: u64,
    /// Machine exception delegation.
    pub medeleg: u64,
    /// Machine interrupt delegation.
    pub mideleg: u64,
    /// Machine interrupt enable.
    pub mie: u64,
    /// Machine trap vector base address.
    pub mtvec: u64,
    /// Machine scratch register.
    pub mscratch: u64,
    /// Machine exception program counter.
    pub mepc: u64,
    /// Machine trap cause.
    pub mcause: u64,
    /// Machine trap value.
    pub mtval: u64,
    /// Machine interrupt pending.
    pub mip: u64,
    /// Supervisor trap vector base address.
    pub stvec: u64,
    /// Supervisor scratch register.
    pub sscratch: u64,
    /// Supervisor exception program counter.
    pub sepc: u64,
    /// Supervisor trap cause.
    pub scause: u64,
    /// Supervisor trap value.
    pub stval: u64,
    /// Supervisor address translation and protection.
    pub satp: u64,
    /// Machine cycle counter. Bumped 1:1 with `minstret`.
    pub mcycle: u64,
    /// Machine instructions retired counter.
    pub minstret: u64,
    /// `mhpmcounter3` through `mhpmcounter31`, indexed from 0.
    pub mhpmcounter: [u64; NUM_HPM_COUNTERS],
    /// Debug control and status.
    pub dcsr: Dcsr,
    /// Debug program counter.
    pub dpc: u64,
    /// Debug scratch register 0.
    pub dscratch0: u64,
    /// Hart id.
    pub mhartid: u64,
}

impl Csrs {
    /// Reads a CSR value by its address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    ///
    /// # Returns
    ///
    /// The value, or `None` when the address is not a CSR stored here.
    pub fn read(&self, addr: u32) -> Option<u64> {
        let val = match addr {
            SSTATUS => self.mstatus & SSTATUS_MASK,
            SIE => self.mie & self.mideleg,
            STVEC => self.stvec,
            SSCRATCH => self.sscratch,
            SEPC => self.sepc,
            SCAUSE => self.scause,
            STVAL => self.stval,
            SIP => self.mip & self.mideleg,
            SATP => self.satp,
            MSTATUS => self.mstatus,
            MISA => self.misa,
            MEDELEG => self.medeleg,
            MIDELEG => self.mideleg,
            MIE => self.mie,
            MTVEC => self.mtvec,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MIP => self.mip,
            DCSR => self.dcsr.read(),
            DPC => self.dpc,
            DSCRATCH0 => self.dscratch0,
            MCYCLE | CYCLE => self.mcycle,
            MINSTRET | INSTRET => self.minstret,
            MHPMCOUNTER3..=MHPMCOUNTER31 => self.mhpmcounter[(addr - MHPMCOUNTER3) as usize],
            HPMCOUNTER3..=HPMCOUNTER31 => self.mhpmcounter[(addr - HPMCOUNTER3) as usize],
            MHARTID => self.mhartid,
            _ => return None,
        };
        Some(val)
    }

    /// Writes a value to a CSR by its address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    /// * `val` - The 64-bit value to write.
    ///
    /// # Returns
    ///
    /// `false` when the address is unknown or read-only.
    pub fn write(&mut self, addr: u32, val: u64) -> bool {
        match addr {
            SSTATUS => self.mstatus = (self.mstatus & !SSTATUS_MASK) | (val & SSTATUS_MASK),
            SIE => self.mie = (self.mie & !self.mideleg) | (val & self.mideleg),
            STVEC => self.stvec = val,
            SSCRATCH => self.sscratch = val,
            SEPC => self.sepc = val & !1,
            SCAUSE => self.scause = val,
            STVAL => self.stval = val,
            SIP => {
                let writable = self.mideleg & MIP_SSIP;
                self.mip = (self.mip & !writable) | (val & writable);
            }
            SATP => self.satp = val,
            MSTATUS => self.mstatus = val,
            MISA => {}
            MEDELEG => self.medeleg = val,
            MIDELEG => self.mideleg = val & MIP_SUPERVISOR_MASK,
            MIE => self.mie = val,
            MTVEC => self.mtvec = val,
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val & !1,
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            MIP => self.mip = val,
            DCSR => self.dcsr.write(val),
            DPC => self.dpc = val & !1,
            DSCRATCH0 => self.dscratch0 = val,
            MCYCLE => self.mcycle = val,
            MINSTRET => self.minstret = val,
            MHPMCOUNTER3..=MHPMCOUNTER31 => {
                self.mhpmcounter[(addr - MHPMCOUNTER3) as usize] = val;
            }
            _ => return false,
        }
        true
    }

    /// Increments `mhpmcounter<n>` (3 through 31). Other indices are ignored.
    pub fn bump_hpm(&mut self, n: usize, by: u64) {
        if let Some(counter) = n.checked_sub(3).and_then(|i| self.mhpmcounter.get_mut(i)) {
            *counter = counter.wrapping_add(by);
        }
    }

    /// Reads `mhpmcounter<n>`, or 0 outside 3 through 31.
    pub fn hpm(&self, n: usize) -> u64 {
        n.checked_sub(3)
            .and_then(|i| self.mhpmcounter.get(i))
            .copied()
            .unwrap_or(0)
    }
}

/// Mnemonic of a CSR, as printed in commit-log `c<addr>_<name>` labels.
pub const fn csr_name(addr: u32) -> &'static str {
    match addr {
        VSTART => "vstart",
        VXSAT => "vxsat",
        VXRM => "vxrm",
        VCSR => "vcsr",
        SSTATUS => "sstatus",
        SIE => "sie",
        STVEC => "stvec",
        SSCRATCH => "sscratch",
        SEPC => "sepc",
        SCAUSE => "scause",
        STVAL => "stval",
        SIP => "sip",
        SATP => "satp",
        MSTATUS => "mstatus",
        MISA => "misa",
        MEDELEG => "medeleg",
        MIDELEG => "mideleg",
        MIE => "mie",
        MTVEC => "mtvec",
        MSCRATCH => "mscratch",
        MEPC => "mepc",
        MCAUSE => "mcause",
        MTVAL => "mtval",
        MIP => "mip",
        DCSR => "dcsr",
        DPC => "dpc",
        DSCRATCH0 => "dscratch0",
        MCYCLE => "mcycle",
        MINSTRET => "minstret",
        MHPMCOUNTER3..=MHPMCOUNTER31 => "mhpmcounter",
        CYCLE => "cycle",
        INSTRET => "instret",
        HPMCOUNTER3..=HPMCOUNTER31 => "hpmcounter",
        VL => "vl",
        VTYPE => "vtype",
        VLENB => "vlenb",
        MHARTID => "mhartid",
        _ => "unknown",
    }
}
