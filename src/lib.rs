//! Core data model for a SMW sprite insertion tool: the loaded ROM image
//! with mapper-aware address translation, RATS reserved-block validation,
//! staged patch output, and sprite descriptor data.

pub mod addressing;
pub mod patchfile;
pub mod rats;
pub mod rom;
pub mod sprite;


#[cfg(test)]
mod tests {
    use crate::addressing::{MapperType, PcOffset};
    use crate::rom::Rom;
    use std::fs;
    use std::io;

    use log;
    use test_log::test;

    #[test]
    fn open_translate_save() -> io::Result<()> {
        let path =
            std::env::temp_dir().join(format!("spritely_smoke_{}.smc", std::process::id()));

        // synthesize a headerless 1 MiB LoROM image
        let mut image = vec![0u8; 0x100000];
        image[0x7FC0..0x7FC0 + 8].copy_from_slice(b"SMOKEROM");
        fs::write(&path, &image)?;

        let rom = Rom::open(&path).expect("Should open the synthesized ROM");
        assert_eq!(rom.mapper(), MapperType::LoRom);
        assert_eq!(rom.size(), 0x100000);
        assert_eq!(rom.header_size(), 0);
        log::info!(
            "{}: mapper {:?}, {} bytes",
            rom.name().display(),
            rom.mapper(),
            rom.size()
        );

        let snes = rom.pc_to_snes(PcOffset(0x7FC0)).unwrap();
        assert_eq!(rom.snes_to_pc(snes), Some(PcOffset(0x7FC0)));
        assert_eq!(rom.read_slice(PcOffset(0x7FC0), 8), b"SMOKEROM");

        // close writes the image back without growing it
        rom.close().expect("Should write the ROM back");
        assert_eq!(fs::metadata(&path)?.len(), 0x100000);

        fs::remove_file(&path)?;
        Ok(())
    }
}
