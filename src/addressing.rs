//! Address value types for the two SNES cartridge address spaces.
//!
//! A "PC" offset is a flat byte position in the ROM file (copier header
//! included); a "SNES" address is what the game's CPU sees, subject to the
//! cartridge's bank mapping. Pointer values are raw 24-bit bank:hi:lo
//! triples stored inside the ROM. Translation between PC and SNES needs a
//! loaded ROM (the mapper lives there); pointer <-> SNES does not.

use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

/// Bank-mapping schemes recognized at ROM load time.
///
/// Detection falls back to `LoRom` whenever the SA-1 marker byte is absent,
/// so an unsupported mapper is silently treated as LoROM. Known limitation;
/// no other mappers are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperType {
    LoRom,
    Sa1Rom,
    FullSa1Rom,
}

/// Flat byte offset into the on-disk/in-memory ROM image, header included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PcOffset(pub usize);

/// 24-bit address as seen by the game's CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnesAddress(pub u32);

/// Raw 24-bit cartridge pointer: bank in bits 16-23, high byte in 8-15,
/// low byte in 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerValue(u32);

/// Default sprite entry point: a shared RTL stub at $01:8021. A table slot
/// still holding this value has no custom code attached.
pub const RTL_POINTER: PointerValue = PointerValue::from_parts(0x01, 0x80, 0x21);

impl PointerValue {
    pub const fn new(raw: u32) -> PointerValue {
        PointerValue(raw & 0xFF_FFFF)
    }

    pub const fn from_parts(bank: u8, high: u8, low: u8) -> PointerValue {
        PointerValue(((bank as u32) << 16) | ((high as u32) << 8) | (low as u32))
    }

    pub fn bank(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn low(self) -> u8 {
        self.0 as u8
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Reinterpret the pointer as the SNES address it targets.
    pub fn addr(self) -> SnesAddress {
        SnesAddress(self.0)
    }

    /// True when the pointer still holds the RTL sentinel, i.e. nothing has
    /// been installed in this slot.
    pub fn is_empty(self) -> bool {
        self == RTL_POINTER
    }
}

impl Default for PointerValue {
    fn default() -> PointerValue {
        RTL_POINTER
    }
}

impl From<PointerValue> for SnesAddress {
    fn from(ptr: PointerValue) -> SnesAddress {
        ptr.addr()
    }
}

impl Display for PcOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:#08x}", self.0)
    }
}

impl Display for SnesAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "${:06X}", self.0)
    }
}

impl Display for PointerValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "${:02X}:{:02X}{:02X}", self.bank(), self.high(), self.low())
    }
}
