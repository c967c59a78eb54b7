//! Instruction-trace sinks.
//!
//! A [`TraceSink`] consumes one [`InstructionRecord`] per executed micro-op
//! plus out-of-band [`MagicCode`] markers. The core ships three sinks:
//! 1. **`NullTraceSink`:** Discards everything; installed when tracing is off.
//! 2. **`VecTraceSink`:** Collects events in memory behind a shared handle.
//! 3. **`StreamTraceSink`:** Writes a compact little-endian binary stream to
//!    any `Write`, readable back with [`read_events`].

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;

/// Out-of-band marker codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum MagicCode {
    /// Start of the region of interest.
    RoiStart = 1,
    /// End of the region of interest.
    RoiEnd = 2,
    /// User command; carries `vl` and `vtype` after a `vset*`.
    User = 5,
}

impl MagicCode {
    /// Decodes a wire code.
    pub const fn from_u64(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::RoiStart),
            2 => Some(Self::RoiEnd),
            5 => Some(Self::User),
            _ => None,
        }
    }
}

/// One executed micro-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionRecord {
    /// Instruction address.
    pub address: u64,
    /// Encoded length in bytes.
    pub size: u64,
    /// Data addresses the micro-op touched, in execution order.
    pub addresses: Vec<u64>,
    /// The instruction is a control transfer.
    pub is_branch: bool,
    /// The control transfer was taken.
    pub taken: bool,
    /// Predicated execution.
    pub is_predicated: bool,
    /// The micro-op executed.
    pub executed: bool,
}

impl InstructionRecord {
    /// Number of data addresses.
    pub fn num_addresses(&self) -> usize {
        self.addresses.len()
    }
}

/// A recorded sink call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// An executed micro-op.
    Instruction(InstructionRecord),
    /// An out-of-band marker.
    Magic {
        /// Marker code.
        code: MagicCode,
        /// First argument.
        arg1: u64,
        /// Second argument.
        arg2: u64,
    },
}

/// Consumer of instruction-trace events.
pub trait TraceSink {
    /// Accepts one executed micro-op.
    ///
    /// # Errors
    ///
    /// I/O failures of the underlying destination.
    fn instruction(&mut self, record: &InstructionRecord) -> io::Result<()>;

    /// Accepts an out-of-band marker.
    ///
    /// # Errors
    ///
    /// I/O failures of the underlying destination.
    fn magic(&mut self, code: MagicCode, arg1: u64, arg2: u64) -> io::Result<()>;

    /// Whether events are consumed at all. Producers skip building records
    /// for a disabled sink.
    fn enabled(&self) -> bool {
        true
    }

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// I/O failures of the underlying destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn enabled(&self) -> bool {
        false
    }

    fn instruction(&mut self, _record: &InstructionRecord) -> io::Result<()> {
        Ok(())
    }

    fn magic(&mut self, _code: MagicCode, _arg1: u64, _arg2: u64) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sink. Clones share the same event buffer, so a caller can keep
/// one handle and give the other to a hart.
#[derive(Clone, Debug, Default)]
pub struct VecTraceSink {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl VecTraceSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    /// Recorded micro-op records only.
    pub fn instructions(&self) -> Vec<InstructionRecord> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Instruction(r) => Some(r.clone()),
                TraceEvent::Magic { .. } => None,
            })
            .collect()
    }

    /// Drains the recorded events.
    pub fn take(&self) -> Vec<TraceEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl TraceSink for VecTraceSink {
    fn instruction(&mut self, record: &InstructionRecord) -> io::Result<()> {
        self.events
            .borrow_mut()
            .push(TraceEvent::Instruction(record.clone()));
        Ok(())
    }

    fn magic(&mut self, code: MagicCode, arg1: u64, arg2: u64) -> io::Result<()> {
        self.events
            .borrow_mut()
            .push(TraceEvent::Magic { code, arg1, arg2 });
        Ok(())
    }
}

const TAG_INSTRUCTION: u8 = 1;
const TAG_MAGIC: u8 = 2;

const FLAG_BRANCH: u8 = 1 << 0;
const FLAG_TAKEN: u8 = 1 << 1;
const FLAG_PREDICATED: u8 = 1 << 2;
const FLAG_EXECUTED: u8 = 1 << 3;

/// Binary stream sink.
///
/// Record layout (little-endian):
/// - instruction: `u8 tag=1, u64 address, u8 size, u8 flags, u16 count, count * u64 address`
/// - magic: `u8 tag=2, u64 code, u64 arg1, u64 arg2`
#[derive(Debug)]
pub struct StreamTraceSink<W: Write> {
    out: W,
}

impl<W: Write> StreamTraceSink<W> {
    /// Wraps a writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for StreamTraceSink<W> {
    fn instruction(&mut self, record: &InstructionRecord) -> io::Result<()> {
        let count = u16::try_from(record.addresses.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many addresses"))?;
        let size = u8::try_from(record.size)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "instruction too long"))?;
        let mut flags = 0;
        for (set, bit) in [
            (record.is_branch, FLAG_BRANCH),
            (record.taken, FLAG_TAKEN),
            (record.is_predicated, FLAG_PREDICATED),
            (record.executed, FLAG_EXECUTED),
        ] {
            if set {
                flags |= bit;
            }
        }
        self.out.write_all(&[TAG_INSTRUCTION])?;
        self.out.write_all(&record.address.to_le_bytes())?;
        self.out.write_all(&[size, flags])?;
        self.out.write_all(&count.to_le_bytes())?;
        for addr in &record.addresses {
            self.out.write_all(&addr.to_le_bytes())?;
        }
        Ok(())
    }

    fn magic(&mut self, code: MagicCode, arg1: u64, arg2: u64) -> io::Result<()> {
        self.out.write_all(&[TAG_MAGIC])?;
        for word in [code as u64, arg1, arg2] {
            self.out.write_all(&word.to_le_bytes())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn read_u64(input: &mut impl Read) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Decodes a stream written by [`StreamTraceSink`].
///
/// # Errors
///
/// Truncated input, an unknown record tag or an unknown magic code.
pub fn read_events(mut input: impl Read) -> io::Result<Vec<TraceEvent>> {
    let mut events = Vec::new();
    let mut tag = [0u8; 1];
    loop {
        if input.read(&mut tag)? == 0 {
            return Ok(events);
        }
        match tag[0] {
            TAG_INSTRUCTION => {
                let address = read_u64(&mut input)?;
                let mut head = [0u8; 4];
                input.read_exact(&mut head)?;
                let count = u16::from_le_bytes([head[2], head[3]]);
                let addresses = (0..count)
                    .map(|_| read_u64(&mut input))
                    .collect::<io::Result<Vec<_>>>()?;
                let flags = head[1];
                events.push(TraceEvent::Instruction(InstructionRecord {
                    address,
                    size: u64::from(head[0]),
                    addresses,
                    is_branch: flags & FLAG_BRANCH != 0,
                    taken: flags & FLAG_TAKEN != 0,
                    is_predicated: flags & FLAG_PREDICATED != 0,
                    executed: flags & FLAG_EXECUTED != 0,
                }));
            }
            TAG_MAGIC => {
                let raw = read_u64(&mut input)?;
                let code = MagicCode::from_u64(raw).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("unknown magic code {raw}"))
                })?;
                let arg1 = read_u64(&mut input)?;
                let arg2 = read_u64(&mut input)?;
                events.push(TraceEvent::Magic { code, arg1, arg2 });
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown trace record tag {other}"),
                ));
            }
        }
    }
}
