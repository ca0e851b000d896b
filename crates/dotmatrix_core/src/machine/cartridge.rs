use std::fmt;

use super::ROM_SIZE;
use crate::error::CoreError;

const HEADER_END: usize = 0x150;
const TITLE: std::ops::Range<usize> = 0x134..0x144;

/// Cartridge type byte for a plain ROM with no mapper.
pub const ROM_ONLY: u8 = 0x00;

/// Fields of the cartridge header at 0x0134..0x014F.
///
/// Only ROM-only cartridges are accepted. Checksums are extracted for
/// diagnostics but a mismatch is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub licensee_code: [u8; 2],
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size: u8,
    pub ram_size: u8,
    pub region: u8,
    pub old_licensee_code: u8,
    pub version: u8,
    pub header_checksum: u8,
    /// Stored big-endian in the header.
    pub global_checksum: u16,
    computed_header_checksum: u8,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, CoreError> {
        if rom.len() < HEADER_END {
            return Err(CoreError::RomTooSmall(rom.len()));
        }
        if rom.len() > ROM_SIZE {
            return Err(CoreError::RomTooLarge(rom.len()));
        }

        let cartridge_type = rom[0x147];
        if cartridge_type != ROM_ONLY {
            log::error!("unsupported cartridge type 0x{:02X}", cartridge_type);
            return Err(CoreError::UnsupportedCartridgeType(cartridge_type));
        }

        let title_bytes = &rom[TITLE];
        let title_len = title_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(title_bytes.len());
        let title = String::from_utf8_lossy(&title_bytes[..title_len])
            .trim_end()
            .to_string();

        let computed_header_checksum = rom[0x134..=0x14C]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1));

        Ok(Self {
            title,
            licensee_code: [rom[0x144], rom[0x145]],
            sgb_flag: rom[0x146],
            cartridge_type,
            rom_size: rom[0x148],
            ram_size: rom[0x149],
            region: rom[0x14A],
            old_licensee_code: rom[0x14B],
            version: rom[0x14C],
            header_checksum: rom[0x14D],
            global_checksum: u16::from_be_bytes([rom[0x14E], rom[0x14F]]),
            computed_header_checksum,
        })
    }

    #[inline]
    pub fn computed_header_checksum(&self) -> u8 {
        self.computed_header_checksum
    }

    /// Whether the stored header checksum matches the one the boot ROM
    /// would compute.
    #[inline]
    pub fn header_checksum_valid(&self) -> bool {
        self.header_checksum == self.computed_header_checksum
    }
}

impl fmt::Display for CartridgeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" type=0x{:02X} rom=0x{:02X} ram=0x{:02X} region=0x{:02X} licensee={}{} old_licensee=0x{:02X} v{} header_checksum=0x{:02X}{} global_checksum=0x{:04X}",
            self.title,
            self.cartridge_type,
            self.rom_size,
            self.ram_size,
            self.region,
            self.licensee_code[0] as char,
            self.licensee_code[1] as char,
            self.old_licensee_code,
            self.version,
            self.header_checksum,
            if self.header_checksum_valid() { "" } else { " (mismatch)" },
            self.global_checksum,
        )
    }
}
