//! Human-readable commit log.
//!
//! One line per retired instruction:
//!
//! ```text
//! core   0: 3 0x0000000080000000 (0x00500093) x1  0x0000000000000005
//! ```
//!
//! The header carries the hart id, the numeric privilege the instruction ran
//! at, the PC and the raw encoding. Register writes follow in log-key order,
//! then loads (` mem <addr>`) and stores (` mem <addr> <value>`). Values are
//! printed as fixed-width hex by bit width; widths of 128 and above are
//! printed as 64-bit chunks, most significant first.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::common::{RegKind, SimError};
use crate::core::arch::csr::csr_name;
use crate::core::arch::vector::VectorUnit;
use crate::core::cpu::state::InsnLog;
use crate::isa::instruction::Insn;

/// Appends `value` formatted for a `width`-bit operand.
///
/// `chunks` holds the value as 64-bit words, least significant first.
///
/// # Errors
///
/// `SimError::UnsupportedValueWidth` unless `width` is 8, 16, 32, 64 or a
/// power of two covered by `chunks`.
pub fn format_value(out: &mut String, width: u32, chunks: &[u64]) -> Result<(), SimError> {
    let low = chunks.first().copied().unwrap_or(0);
    let _ = match width {
        8 => write!(out, "0x{:02x}", low as u8),
        16 => write!(out, "0x{:04x}", low as u16),
        32 => write!(out, "0x{:08x}", low as u32),
        64 => write!(out, "0x{low:016x}"),
        w if w.is_power_of_two() && w > 64 && chunks.len() >= (w / 64) as usize => {
            out.push_str("0x");
            for chunk in chunks[..(w / 64) as usize].iter().rev() {
                let _ = write!(out, "{chunk:016x}");
            }
            Ok(())
        }
        w => return Err(SimError::UnsupportedValueWidth(w)),
    };
    Ok(())
}

fn format_scalar(out: &mut String, width: u32, value: u128) -> Result<(), SimError> {
    format_value(out, width, &[value as u64, (value >> 64) as u64])
}

/// Formats the commit-log line of one retired instruction, without the
/// trailing newline.
///
/// # Errors
///
/// `SimError::UnknownRegisterTag` for a corrupt log key and
/// `SimError::UnsupportedValueWidth` for an unprintable width.
pub fn format_line(
    hart_id: u32,
    pc: u64,
    insn: Insn,
    log: &InsnLog,
    vu: &VectorUnit,
) -> Result<String, SimError> {
    let mut line = String::with_capacity(96);
    let _ = write!(line, "core{hart_id:>4}: {} ", log.priv_mode.to_u8());
    format_scalar(&mut line, log.xlen, u128::from(pc))?;
    line.push_str(" (");
    format_scalar(&mut line, (insn.length() * 8) as u32, u128::from(insn.bits()))?;
    line.push(')');

    let mut shown_vtype = false;
    for (&id, &value) in &log.reg_write {
        if id.0 == 0 {
            continue;
        }
        let kind = id.kind()?;
        let rd = id.index();
        if !shown_vtype && matches!(kind, RegKind::Vector | RegKind::VectorGeneric) {
            let _ = write!(line, " e{} {} l{}", vu.vsew, vu.lmul_label(), vu.vl);
            shown_vtype = true;
        }
        match kind {
            RegKind::Int => {
                let _ = write!(line, " x{rd:<2} ");
                format_scalar(&mut line, log.xlen, value)?;
            }
            RegKind::Float => {
                let _ = write!(line, " f{rd:<2} ");
                format_scalar(&mut line, log.flen, value)?;
            }
            RegKind::Vector => {
                let _ = write!(line, " v{rd:<2} ");
                format_value(&mut line, vu.vlen(), &vu.reg_chunks(rd))?;
            }
            RegKind::VectorGeneric => {}
            RegKind::Csr => {
                let _ = write!(line, " c{rd}_{} ", csr_name(rd as u32));
                format_scalar(&mut line, log.xlen, value)?;
            }
        }
    }

    for load in &log.mem_read {
        line.push_str(" mem ");
        format_scalar(&mut line, log.xlen, u128::from(load.addr))?;
    }
    for store in &log.mem_write {
        line.push_str(" mem ");
        format_scalar(&mut line, log.xlen, u128::from(store.addr))?;
        line.push(' ');
        format_scalar(&mut line, u32::from(store.size) * 8, u128::from(store.value))?;
    }
    Ok(line)
}

/// Commit-log text sink.
pub struct CommitLog {
    out: Box<dyn Write>,
}

impl CommitLog {
    /// Logs to an arbitrary writer.
    pub fn new(out: Box<dyn Write>) -> Self {
        Self { out }
    }

    /// Logs to standard error.
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Logs to a newly created file.
    ///
    /// # Errors
    ///
    /// The file cannot be created.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(Box::new(BufWriter::new(File::create(path)?))))
    }

    /// Writes the line of one retired instruction.
    ///
    /// # Errors
    ///
    /// Formatting failures from [`format_line`] and `SimError::CommitLog` on I/O.
    pub fn write_insn(
        &mut self,
        hart_id: u32,
        pc: u64,
        insn: Insn,
        log: &InsnLog,
        vu: &VectorUnit,
    ) -> Result<(), SimError> {
        let mut line = format_line(hart_id, pc, insn, log, vu)?;
        line.push('\n');
        self.out
            .write_all(line.as_bytes())
            .map_err(SimError::CommitLog)
    }

    /// Flushes buffered lines.
    ///
    /// # Errors
    ///
    /// `SimError::CommitLog` on I/O.
    pub fn flush(&mut self) -> Result<(), SimError> {
        self.out.flush().map_err(SimError::CommitLog)
    }
}

impl std::fmt::Debug for CommitLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitLog").finish_non_exhaustive()
    }
}
