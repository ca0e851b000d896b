/// Errors raised by the emulator core.
///
/// All of them are fatal for the running machine: the caller is expected to
/// stop ticking and report the error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The CPU fetched an opcode with no defined instruction.
    UnknownOpcode { opcode: u8, address: u16 },
    /// LCDC selected 8x16 sprites, which the renderer does not draw.
    UnsupportedSpriteSize,
    /// The cartridge header names a mapper other than ROM-only.
    UnsupportedCartridgeType(u8),
    /// The ROM image does not fit the 32 KiB ROM-only window.
    RomTooLarge(usize),
    /// The ROM image is too short to contain a cartridge header.
    RomTooSmall(usize),
    /// The boot ROM image is not exactly 256 bytes.
    InvalidBootRomSize(usize),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CoreError::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode 0x{:02X} at 0x{:04X}", opcode, address)
            }
            CoreError::UnsupportedSpriteSize => write!(f, "8x16 sprites are not supported"),
            CoreError::UnsupportedCartridgeType(kind) => {
                write!(f, "unsupported cartridge type 0x{:02X}", kind)
            }
            CoreError::RomTooLarge(len) => {
                write!(f, "ROM is {} bytes; ROM-only cartridges hold at most 32768", len)
            }
            CoreError::RomTooSmall(len) => {
                write!(f, "ROM is {} bytes; too short for a cartridge header", len)
            }
            CoreError::InvalidBootRomSize(len) => {
                write!(f, "boot ROM must be exactly 256 bytes, got {}", len)
            }
        }
    }
}

impl std::error::Error for CoreError {}
