mod bus;
mod cartridge;
mod gameboy;
mod ppu;
mod timer;

pub use bus::{HwRegister, SystemBus, BOOT_ROM_SIZE};
pub use cartridge::CartridgeHeader;
pub use gameboy::GameBoy;
pub use ppu::{Ppu, PpuMode, Shade};
pub use timer::Timer;

/// Total addressable memory for the Game Boy (64 KiB).
const MEMORY_SIZE: usize = 0x10000;

/// Size of the cartridge ROM window mapped at 0x0000. Only ROM-only
/// cartridges are supported, so this is also the largest accepted image.
pub const ROM_SIZE: usize = 0x8000;
