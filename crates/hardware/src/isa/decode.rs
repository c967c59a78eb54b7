//! Opcode-table instruction decoder.
//!
//! Decoding maps a raw instruction word to the semantic handler that executes
//! it. The table is an ordered list of `(mask, match)` pairs; the first entry
//! with `word & mask == match` wins. Words that match nothing decode to the
//! illegal-instruction handler, so every fetch yields something executable and
//! the fault surfaces when the instruction runs.

use std::fmt;

use crate::common::Exception;
use crate::core::Cpu;
use crate::isa::encoding::{
    MASK_ADDI, MASK_BRANCH, MASK_CSR, MASK_FENCE_I, MASK_JAL, MASK_JALR, MASK_LOAD, MASK_LUI,
    MASK_STORE, MASK_SYSTEM_EXACT, MASK_VARITH, MASK_VMEM, MASK_VMV_V_X, MASK_VSETIVLI,
    MASK_VSETVL, MASK_VSETVLI, MATCH_ADDI, MATCH_BEQ, MATCH_BNE, MATCH_CSRRC, MATCH_CSRRS,
    MATCH_CSRRW, MATCH_FENCE_I, MATCH_JAL, MATCH_JALR, MATCH_LB, MATCH_LBU, MATCH_LD, MATCH_LH,
    MATCH_LHU, MATCH_LUI, MATCH_LW, MATCH_LWU, MATCH_SB, MATCH_SD, MATCH_SH, MATCH_SW,
    MATCH_VADD_VI, MATCH_VADD_VV, MATCH_VADD_VX, MATCH_VL_E8, MATCH_VL_E16, MATCH_VL_E32,
    MATCH_VL_E64, MATCH_VMV_V_X, MATCH_VS_E8, MATCH_VS_E16, MATCH_VS_E32, MATCH_VS_E64,
    MATCH_VSETIVLI, MATCH_VSETVL, MATCH_VSETVLI, MATCH_VSSRL_VV,
};
use crate::isa::instruction::Insn;
use crate::isa::privileged::opcodes::{DRET, EBREAK, ECALL, MRET, SRET, WFI};
use crate::isa::semantics::{scalar, system, vector_arith, vector_cfg, vector_mem};

/// Semantic handler: executes `insn` fetched from `pc` and returns the next PC
/// (or a serialization sentinel).
pub type InsnFn = fn(&mut Cpu, Insn, u64) -> Result<u64, Exception>;

/// Result of fetching one instruction: the word plus its resolved handler.
#[derive(Clone, Copy)]
pub struct InsnFetch {
    /// The fetched instruction.
    pub insn: Insn,
    /// Handler that executes it.
    pub func: InsnFn,
}

impl fmt::Debug for InsnFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsnFetch")
            .field("insn", &format_args!("{:#010x}", self.insn.bits()))
            .finish_non_exhaustive()
    }
}

/// One decodable instruction form.
#[derive(Clone, Copy)]
pub struct InsnDesc {
    /// Mnemonic, for diagnostics.
    pub name: &'static str,
    /// Bits that must match.
    pub matches: u32,
    /// Bits that participate in the match.
    pub mask: u32,
    /// Handler.
    pub func: InsnFn,
}

impl fmt::Debug for InsnDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010x}/{:#010x})", self.name, self.matches, self.mask)
    }
}

/// Ordered `(mask, match)` decode table.
#[derive(Clone, Debug, Default)]
pub struct OpcodeTable {
    entries: Vec<InsnDesc>,
}

impl OpcodeTable {
    /// Creates an empty table; everything decodes as illegal.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of every instruction form the core implements.
    pub fn standard() -> Self {
        let mut table = Self::new();
        let forms: [(&'static str, u32, u32, InsnFn); 43] = [
            ("addi", MATCH_ADDI, MASK_ADDI, scalar::addi),
            ("lui", MATCH_LUI, MASK_LUI, scalar::lui),
            ("jal", MATCH_JAL, MASK_JAL, scalar::jal),
            ("jalr", MATCH_JALR, MASK_JALR, scalar::jalr),
            ("beq", MATCH_BEQ, MASK_BRANCH, scalar::beq),
            ("bne", MATCH_BNE, MASK_BRANCH, scalar::bne),
            ("lb", MATCH_LB, MASK_LOAD, scalar::load),
            ("lh", MATCH_LH, MASK_LOAD, scalar::load),
            ("lw", MATCH_LW, MASK_LOAD, scalar::load),
            ("ld", MATCH_LD, MASK_LOAD, scalar::load),
            ("lbu", MATCH_LBU, MASK_LOAD, scalar::load),
            ("lhu", MATCH_LHU, MASK_LOAD, scalar::load),
            ("lwu", MATCH_LWU, MASK_LOAD, scalar::load),
            ("sb", MATCH_SB, MASK_STORE, scalar::store),
            ("sh", MATCH_SH, MASK_STORE, scalar::store),
            ("sw", MATCH_SW, MASK_STORE, scalar::store),
            ("sd", MATCH_SD, MASK_STORE, scalar::store),
            ("fence.i", MATCH_FENCE_I, MASK_FENCE_I, system::fence_i),
            ("csrrw", MATCH_CSRRW, MASK_CSR, system::csrrw),
            ("csrrs", MATCH_CSRRS, MASK_CSR, system::csrrs),
            ("csrrc", MATCH_CSRRC, MASK_CSR, system::csrrc),
            ("ecall", ECALL, MASK_SYSTEM_EXACT, system::ecall),
            ("ebreak", EBREAK, MASK_SYSTEM_EXACT, system::ebreak),
            ("mret", MRET, MASK_SYSTEM_EXACT, system::mret),
            ("sret", SRET, MASK_SYSTEM_EXACT, system::sret),
            ("dret", DRET, MASK_SYSTEM_EXACT, system::dret),
            ("wfi", WFI, MASK_SYSTEM_EXACT, system::wfi),
            ("vsetvli", MATCH_VSETVLI, MASK_VSETVLI, vector_cfg::vsetvli),
            ("vsetivli", MATCH_VSETIVLI, MASK_VSETIVLI, vector_cfg::vsetivli),
            ("vsetvl", MATCH_VSETVL, MASK_VSETVL, vector_cfg::vsetvl),
            ("vle8", MATCH_VL_E8, MASK_VMEM, vector_mem::vector_load),
            ("vle16", MATCH_VL_E16, MASK_VMEM, vector_mem::vector_load),
            ("vle32", MATCH_VL_E32, MASK_VMEM, vector_mem::vector_load),
            ("vle64", MATCH_VL_E64, MASK_VMEM, vector_mem::vector_load),
            ("vse8", MATCH_VS_E8, MASK_VMEM, vector_mem::vector_store),
            ("vse16", MATCH_VS_E16, MASK_VMEM, vector_mem::vector_store),
            ("vse32", MATCH_VS_E32, MASK_VMEM, vector_mem::vector_store),
            ("vse64", MATCH_VS_E64, MASK_VMEM, vector_mem::vector_store),
            ("vmv.v.x", MATCH_VMV_V_X, MASK_VMV_V_X, vector_arith::vmv_v_x),
            ("vadd.vv", MATCH_VADD_VV, MASK_VARITH, vector_arith::vadd_vv),
            ("vadd.vx", MATCH_VADD_VX, MASK_VARITH, vector_arith::vadd_vx),
            ("vadd.vi", MATCH_VADD_VI, MASK_VARITH, vector_arith::vadd_vi),
            ("vssrl.vv", MATCH_VSSRL_VV, MASK_VARITH, vector_arith::vssrl_vv),
        ];
        for (name, matches, mask, func) in forms {
            table.register(InsnDesc {
                name,
                matches,
                mask,
                func,
            });
        }
        table
    }

    /// Appends a form. Earlier entries take precedence.
    pub fn register(&mut self, desc: InsnDesc) {
        self.entries.push(desc);
    }

    /// Finds the form of a 32-bit word.
    pub fn lookup(&self, word: u32) -> Option<&InsnDesc> {
        self.entries.iter().find(|d| word & d.mask == d.matches)
    }

    /// Decodes a fetched instruction pattern.
    pub fn decode(&self, bits: u64) -> InsnFetch {
        let insn = Insn::new(bits);
        let func = if insn.length() == 4 {
            self.lookup(insn.word()).map_or(system::illegal as InsnFn, |d| d.func)
        } else {
            system::illegal
        };
        InsnFetch { insn, func }
    }

    /// Number of registered forms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no form is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
