//! Flat physical memory.
//!
//! This module implements the simplest `Mmu`: identity-mapped RAM regions with
//! no translation and no devices. It provides:
//! 1. **Regions:** One or more byte buffers, each mapped at a base address.
//! 2. **Fetch:** Instruction fetch that reads as many parcels as the length
//!    encoding asks for and decodes through an [`OpcodeTable`].
//! 3. **Loading:** Helpers that place raw bytes or instruction words.
//!
//! Accesses that fall outside every region raise the matching access fault.

use crate::common::Trap;
use crate::core::units::mmu::Mmu;
use crate::isa::decode::{InsnFetch, OpcodeTable};
use crate::isa::instruction::length_from_low_bits;

#[derive(Clone, Debug)]
struct Region {
    base: u64,
    bytes: Vec<u8>,
}

impl Region {
    fn offset(&self, addr: u64, size: usize) -> Option<usize> {
        let offset = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        (offset.checked_add(size)? <= self.bytes.len()).then_some(offset)
    }
}

/// Identity-mapped RAM.
///
/// # Examples
///
/// ```
/// use rvx_core::core::units::mmu::Mmu;
/// use rvx_core::soc::FlatMemory;
///
/// let mut ram = FlatMemory::new(0x8000_0000, 0x1000);
/// ram.store(0x8000_0010, 4, 0xdead_beef).unwrap();
/// assert_eq!(ram.load(0x8000_0010, 2).unwrap(), 0xbeef);
/// assert!(ram.load(0x9000_0000, 1).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct FlatMemory {
    regions: Vec<Region>,
    table: OpcodeTable,
}

impl FlatMemory {
    /// Creates `size` bytes of zeroed RAM at `base`, decoding with the
    /// standard opcode table.
    pub fn new(base: u64, size: usize) -> Self {
        Self {
            regions: vec![Region {
                base,
                bytes: vec![0; size],
            }],
            table: OpcodeTable::standard(),
        }
    }

    /// Replaces the opcode table used for instruction fetch.
    #[must_use]
    pub fn with_table(mut self, table: OpcodeTable) -> Self {
        self.table = table;
        self
    }

    /// Maps another zeroed region of `size` bytes at `base` (a debug ROM, for
    /// instance).
    pub fn add_region(&mut self, base: u64, size: usize) {
        self.regions.push(Region {
            base,
            bytes: vec![0; size],
        });
    }

    fn find(&self, addr: u64, size: usize) -> Option<(usize, usize)> {
        self.regions
            .iter()
            .enumerate()
            .find_map(|(i, r)| r.offset(addr, size).map(|off| (i, off)))
    }

    fn read(&self, addr: u64, size: usize) -> Option<u64> {
        let (region, off) = self.find(addr, size)?;
        let mut buf = [0u8; 8];
        buf[..size].copy_from_slice(&self.regions[region].bytes[off..off + size]);
        Some(u64::from_le_bytes(buf))
    }

    /// Copies `data` to `addr`. Returns false when the range is not mapped.
    pub fn load_bytes(&mut self, addr: u64, data: &[u8]) -> bool {
        match self.find(addr, data.len()) {
            Some((region, off)) => {
                self.regions[region].bytes[off..off + data.len()].copy_from_slice(data);
                true
            }
            None => false,
        }
    }

    /// Writes consecutive 32-bit instruction words starting at `addr`.
    /// Returns false when the range is not mapped.
    pub fn write_words(&mut self, addr: u64, words: &[u32]) -> bool {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.load_bytes(addr, &bytes)
    }
}

impl Mmu for FlatMemory {
    fn load_insn(&mut self, pc: u64) -> Result<InsnFetch, Trap> {
        if pc & 3 != 0 {
            return Err(Trap::InstructionAddressMisaligned(pc));
        }
        let low = self.read(pc, 2).ok_or(Trap::InstructionAccessFault(pc))?;
        let length = length_from_low_bits(low) as usize;
        let bits = self
            .read(pc, length)
            .ok_or(Trap::InstructionAccessFault(pc))?;
        Ok(self.table.decode(bits))
    }

    fn load(&mut self, addr: u64, size: usize) -> Result<u64, Trap> {
        self.read(addr, size).ok_or(Trap::LoadAccessFault(addr))
    }

    fn store(&mut self, addr: u64, size: usize, val: u64) -> Result<(), Trap> {
        let (region, off) = self.find(addr, size).ok_or(Trap::StoreAccessFault(addr))?;
        self.regions[region].bytes[off..off + size].copy_from_slice(&val.to_le_bytes()[..size]);
        Ok(())
    }
}
