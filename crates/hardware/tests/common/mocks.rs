//! `mockall` doubles for the core's seams.

use mockall::mock;
use rvx_core::common::Trap;
use rvx_core::core::units::mmu::Mmu;
use rvx_core::isa::decode::InsnFetch;
use rvx_core::trace::sink::{InstructionRecord, MagicCode, TraceSink};

// Trace sink with scripted expectations.
mock! {
    pub Sink {}

    impl TraceSink for Sink {
        fn instruction(&mut self, record: &InstructionRecord) -> std::io::Result<()>;
        fn magic(&mut self, code: MagicCode, arg1: u64, arg2: u64) -> std::io::Result<()>;
    }
}

// Memory with scripted fetches and data accesses.
mock! {
    pub Memory {}

    impl Mmu for Memory {
        fn load_insn(&mut self, pc: u64) -> Result<InsnFetch, Trap>;
        fn load(&mut self, addr: u64, size: usize) -> Result<u64, Trap>;
        fn store(&mut self, addr: u64, size: usize, val: u64) -> Result<(), Trap>;
    }
}
