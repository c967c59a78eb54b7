//! Constants shared by the step loop, trap delivery and tracing.

/// Next-PC sentinel: the instruction must be re-fetched and re-executed once
/// the pipeline is serialized. It did not retire.
pub const PC_SERIALIZE_BEFORE: u64 = 3;

/// Next-PC sentinel: the instruction retired and wrote the real next PC to
/// `state.pc`; the loop must re-fetch before continuing.
pub const PC_SERIALIZE_AFTER: u64 = 5;

/// Interrupt flag in `mcause`/`scause`.
pub const CAUSE_INTERRUPT_BIT: u64 = 1 << 63;

/// Debug ROM entry point, where a hart parks after entering debug mode.
pub const DEBUG_ROM_ENTRY: u64 = 0x800;

/// Debug ROM exception vector, taken by traps raised while in debug mode.
pub const DEBUG_ROM_TVEC: u64 = 0x808;

/// Default icache slot count.
pub const ICACHE_ENTRIES: usize = 1024;

/// `addi x0, x0, 1`: marks the start of the region of interest.
pub const ROI_START_INSN: u32 = 0x0010_0013;

/// `addi x0, x0, 2`: marks the end of the region of interest.
pub const ROI_END_INSN: u32 = 0x0020_0013;

/// Number of architectural registers in each register file.
pub const NUM_REGS: usize = 32;
