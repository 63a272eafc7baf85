//! ROM container: owns the image bytes, knows the mapper, and translates
//! between PC offsets and SNES addresses.
//!
//! The translation formulas are the standard LoROM / SA-1 mappings used by
//! the usual SMW tooling. Only LoROM, SA1ROM and FullSA1ROM are handled;
//! anything else ends up treated as LoROM by the detector.

use std::fs;
use std::ops::Index;
use std::ops::IndexMut;
use std::path::Path;
use std::path::PathBuf;

use log::debug;

use crate::addressing::{MapperType, PcOffset, PointerValue, SnesAddress};
use crate::rats;

/// Largest payload the buffer accommodates. The buffer is allocated at this
/// size up front so the patch engine can grow the ROM in place.
pub const MAX_ROM_SIZE: usize = 16 * 1024 * 1024;

/// SA-1 bank bases selectable through the bank mapping registers. `None`
/// slots never point at file data.
const SA1_BANKS: [Option<u32>; 8] = [
    Some(0x000000),
    Some(0x100000),
    None,
    None,
    Some(0x200000),
    Some(0x300000),
    None,
    None,
];

/// SNES address of the Lunar Magic version string ("x.yz") in an edited ROM.
const LM_VERSION_ADDR: u32 = 0x0FF0B4;

/// Versions above this expose the extended level format.
const LM_VERSION_EXLEVEL: u32 = 253;

/// A loaded cartridge image. Owns the byte buffer exclusively; `close`
/// consumes the container after writing the image back out.
pub struct Rom {
    name: PathBuf,
    data: Vec<u8>,
    size: usize,
    header_size: usize,
    mapper: MapperType,
}

impl Rom {
    /// Wrap raw file bytes, splitting off any copier header and detecting
    /// the mapper. A file size that is an exact multiple of 32 KiB has no
    /// header; otherwise the remainder (512 bytes in practice) is header.
    pub fn new<P: AsRef<Path>>(path: P, mut data: Vec<u8>) -> Rom {
        let name = path.as_ref().to_path_buf();
        let total = data.len();
        let header_size = total & 0x7FFF;
        let size = total - header_size;
        data.resize(MAX_ROM_SIZE + header_size, 0);
        let mapper = if data[header_size + 0x7FD5] == 0x23 {
            if data[header_size + 0x7FD7] == 0x0D {
                MapperType::FullSa1Rom
            } else {
                MapperType::Sa1Rom
            }
        } else {
            MapperType::LoRom
        };
        debug!(
            "Loaded {}: {} payload bytes, {} header bytes, mapper {:?}",
            name.display(),
            size,
            header_size,
            mapper
        );
        Rom {
            name,
            data,
            size,
            header_size,
            mapper,
        }
    }

    /// Read a ROM image from disk. On failure the caller gets an error and
    /// no container exists to misuse.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Rom, String> {
        let data = fs::read(path.as_ref())
            .map_err(|e| format!("Failed to open ROM {}: {}", path.as_ref().display(), e))?;
        Ok(Rom::new(path, data))
    }

    /// Write the image (header + payload) back to its file, truncating or
    /// creating as needed.
    pub fn save(&self) -> Result<(), String> {
        fs::write(&self.name, &self.data[..self.header_size + self.size])
            .map_err(|e| format!("Failed to write ROM {}: {}", self.name.display(), e))?;
        debug!(
            "Wrote {} bytes to {}",
            self.header_size + self.size,
            self.name.display()
        );
        Ok(())
    }

    /// Save and release the container.
    pub fn close(self) -> Result<(), String> {
        self.save()
    }

    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Payload size in bytes, excluding any copier header.
    pub fn size(&self) -> usize {
        self.size
    }

    /// 0 for headerless images, 512 for images with a copier header.
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    pub fn mapper(&self) -> MapperType {
        self.mapper
    }

    /// Translate a flat file offset to the SNES address the CPU would use
    /// for that byte, or `None` when the offset lies in a region the mapper
    /// never exposes.
    pub fn pc_to_snes(&self, pc: PcOffset) -> Option<SnesAddress> {
        let addr = pc.0.checked_sub(self.header_size)? as u32;
        match self.mapper {
            MapperType::LoRom => Some(SnesAddress(
                ((addr << 1) & 0x7F0000) | (addr & 0x7FFF) | 0x8000,
            )),
            MapperType::Sa1Rom => {
                for (i, bank) in SA1_BANKS.iter().enumerate() {
                    if *bank == Some(addr & 0x700000) {
                        return Some(SnesAddress(
                            0x008000
                                | ((i as u32) << 21)
                                | ((addr & 0x0F8000) << 1)
                                | (addr & 0x7FFF),
                        ));
                    }
                }
                None
            }
            MapperType::FullSa1Rom => {
                if addr & 0x400000 == 0x400000 {
                    Some(SnesAddress(addr | 0xC00000))
                } else if addr & 0x600000 == 0x000000 {
                    Some(SnesAddress(((addr << 1) & 0x3F0000) | 0x8000 | (addr & 0x7FFF)))
                } else if addr & 0x600000 == 0x200000 {
                    Some(SnesAddress(
                        0x800000 | ((addr << 1) & 0x3F0000) | 0x8000 | (addr & 0x7FFF),
                    ))
                } else {
                    None
                }
            }
        }
    }

    /// Translate a SNES address to its flat file offset, or `None` for
    /// system areas, WRAM mirrors and other unmapped regions. Never wraps
    /// silently.
    pub fn snes_to_pc(&self, snes: SnesAddress) -> Option<PcOffset> {
        let addr = snes.0;
        let pc = match self.mapper {
            MapperType::LoRom => {
                if addr & 0xFE0000 == 0x7E0000
                    || addr & 0x408000 == 0x000000
                    || addr & 0x708000 == 0x700000
                {
                    return None;
                }
                ((addr & 0x7F0000) >> 1) | (addr & 0x7FFF)
            }
            MapperType::Sa1Rom => {
                if addr & 0x408000 == 0x008000 {
                    let base = SA1_BANKS[((addr & 0xE00000) >> 21) as usize]?;
                    base | ((addr & 0x1F0000) >> 1) | (addr & 0x007FFF)
                } else if addr & 0xC00000 == 0xC00000 {
                    let base =
                        SA1_BANKS[(((addr & 0x100000) >> 20) | ((addr & 0x200000) >> 19)) as usize]?;
                    base | (addr & 0x0FFFFF)
                } else {
                    return None;
                }
            }
            MapperType::FullSa1Rom => {
                if addr & 0xC00000 == 0xC00000 {
                    (addr & 0x3FFFFF) | 0x400000
                } else if addr & 0xC00000 == 0x000000 || addr & 0xC00000 == 0x800000 {
                    if addr & 0x008000 == 0x000000 {
                        return None;
                    }
                    ((addr & 0x800000) >> 2) | ((addr & 0x3F0000) >> 1) | (addr & 0x7FFF)
                } else {
                    return None;
                }
            }
        };
        Some(PcOffset(pc as usize + self.header_size))
    }

    /// Read the 24-bit pointer stored at `addr` and OR the given bank byte
    /// in. For pointers the ROM stores without their bank byte.
    pub fn pointer_snes(&self, addr: SnesAddress, bank: u32) -> Option<PointerValue> {
        let pc = self.snes_to_pc(addr)?;
        Some(PointerValue::new(self.read_long(pc) | (bank << 16)))
    }

    /// Unchecked single-byte read. Callers must keep `addr` within
    /// `header_size + size`; this is the hot path and does not validate.
    pub fn read_byte(&self, addr: PcOffset) -> u8 {
        self.data[addr.0]
    }

    /// Unchecked little-endian 16-bit read. Same contract as `read_byte`.
    pub fn read_word(&self, addr: PcOffset) -> u16 {
        u16::from_le_bytes([self.data[addr.0], self.data[addr.0 + 1]])
    }

    /// Unchecked little-endian 24-bit read. Same contract as `read_byte`.
    pub fn read_long(&self, addr: PcOffset) -> u32 {
        u32::from_le_bytes([
            self.data[addr.0],
            self.data[addr.0 + 1],
            self.data[addr.0 + 2],
            0,
        ])
    }

    /// Borrow `len` bytes starting at `addr`. The view cannot outlive the
    /// container.
    pub fn read_slice(&self, addr: PcOffset, len: usize) -> &[u8] {
        &self.data[addr.0..addr.0 + len]
    }

    /// Size of the reserved block whose payload starts at `addr`, if a
    /// valid tag + checksum header precedes it. Checked reads only; the
    /// zero fill past the payload is not considered part of the image.
    pub fn rats_size(&self, addr: PcOffset) -> Option<u16> {
        rats::rats_size(&self.data[..self.header_size + self.size], addr)
    }

    /// The Lunar Magic version stamped into an edited ROM, combined as
    /// major * 100 + minor * 10 + patch. `None` if the version bytes are
    /// not reachable under this mapper.
    pub fn lm_version(&self) -> Option<u32> {
        let major = self.read_byte(self.snes_to_pc(SnesAddress(LM_VERSION_ADDR))?) as u32;
        // +2 instead of +1 to skip the dot in the version string
        let minor = self.read_byte(self.snes_to_pc(SnesAddress(LM_VERSION_ADDR + 2))?) as u32;
        let patch = self.read_byte(self.snes_to_pc(SnesAddress(LM_VERSION_ADDR + 3))?) as u32;
        Some(major * 100 + minor * 10 + patch)
    }

    /// Whether the editing Lunar Magic was new enough to use the extended
    /// level format.
    pub fn is_exlevel(&self) -> bool {
        self.lm_version().map_or(false, |v| v > LM_VERSION_EXLEVEL)
    }
}

impl Index<PcOffset> for Rom {
    type Output = u8;

    fn index(&self, addr: PcOffset) -> &u8 {
        &self.data[addr.0]
    }
}

impl IndexMut<PcOffset> for Rom {
    fn index_mut(&mut self, addr: PcOffset) -> &mut u8 {
        &mut self.data[addr.0]
    }
}
