use dotmatrix_common::input::{Button, Direction};

use super::{MEMORY_SIZE, ROM_SIZE};
use crate::cpu::{Bus, Interrupt};
use crate::error::CoreError;

mod dma;
mod init;
mod joypad;
mod registers;

pub use registers::HwRegister;

/// Size of the DMG boot ROM overlaid on 0x0000..0x00FF.
pub const BOOT_ROM_SIZE: usize = 0x100;

const ECHO_START: u16 = 0xE000;
const ECHO_END: u16 = 0xFDFF;
const ECHO_OFFSET: u16 = 0x2000;

/// The system bus: sole owner of the 64 KiB memory image.
///
/// Hardware registers live inside the image at their mapped addresses, so
/// the CPU, PPU and timer all observe the same bytes. CPU accesses go
/// through the [`Bus`] impl, which applies the memory map rules; the PPU and
/// timer use the side-effect free [`SystemBus::register`] accessors.
pub struct SystemBus {
    memory: Box<[u8]>,
    boot_rom: Box<[u8]>,
    boot_rom_mapped: bool,
    /// Pressed direction keys (bit set means pressed).
    directions: Direction,
    /// Pressed buttons (bit set means pressed).
    buttons: Button,
    /// DIV was written since the timer last ticked.
    div_reset: bool,
}

impl SystemBus {
    /// Build the bus from an optional boot ROM (exactly 256 bytes) and an
    /// optional ROM-only cartridge image.
    ///
    /// Without a boot ROM, 0xFF50 starts at 1 so the overlay is never
    /// mapped. Without a cartridge, the ROM window reads 0xFF.
    pub fn new(boot_rom: Option<&[u8]>, rom: Option<&[u8]>) -> Result<Self, CoreError> {
        if let Some(boot) = boot_rom {
            if boot.len() != BOOT_ROM_SIZE {
                return Err(CoreError::InvalidBootRomSize(boot.len()));
            }
        }

        let mut memory = vec![0u8; MEMORY_SIZE].into_boxed_slice();
        memory[..ROM_SIZE].fill(0xFF);
        if let Some(rom) = rom {
            if rom.len() > ROM_SIZE {
                return Err(CoreError::RomTooLarge(rom.len()));
            }
            memory[..rom.len()].copy_from_slice(rom);
        }

        let mut bus = Self {
            memory,
            boot_rom: boot_rom.map(Box::from).unwrap_or_default(),
            boot_rom_mapped: boot_rom.is_some(),
            directions: Direction::empty(),
            buttons: Button::empty(),
            div_reset: false,
        };
        bus.apply_dmg_initial_io_state();
        if !bus.boot_rom_mapped {
            bus.set_register(HwRegister::Boot, 0x01);
        }
        Ok(bus)
    }

    #[inline]
    pub fn boot_rom_mapped(&self) -> bool {
        self.boot_rom_mapped
    }

    /// Mutable handle to the byte backing `addr`, after boot ROM overlay and
    /// echo RAM redirection. Writes through this handle bypass IO side
    /// effects and the ROM write protection.
    pub fn access(&mut self, addr: u16) -> &mut u8 {
        if self.boot_rom_mapped && (addr as usize) < BOOT_ROM_SIZE {
            return &mut self.boot_rom[addr as usize];
        }
        let addr = if (ECHO_START..=ECHO_END).contains(&addr) {
            addr - ECHO_OFFSET
        } else {
            addr
        };
        &mut self.memory[addr as usize]
    }

    /// Raw read of the memory image, bypassing the boot ROM overlay. Used by
    /// the renderer for VRAM and OAM.
    #[inline]
    pub(crate) fn peek(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }
}

impl Bus for SystemBus {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0xFEA0..=0xFEFF => 0xFF,
            0xFF0F => self.memory[addr as usize] | 0xE0,
            _ => *self.access(addr),
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            // Cartridge ROM is read-only; writes are dropped silently.
            0x0000..=0x7FFF => {}
            0xFEA0..=0xFEFF => {}
            0xFF00 => {
                self.memory[addr as usize] = value;
                self.refresh_p1();
            }
            0xFF04 => {
                self.memory[addr as usize] = 0;
                self.div_reset = true;
            }
            0xFF0F => self.memory[addr as usize] = value & 0x1F,
            0xFF46 => {
                self.memory[addr as usize] = value;
                self.do_oam_dma(value);
            }
            0xFF50 => {
                self.memory[addr as usize] = value;
                if value != 0 && self.boot_rom_mapped {
                    self.boot_rom_mapped = false;
                    log::info!("boot ROM unmapped");
                }
            }
            _ => *self.access(addr) = value,
        }
    }
}

impl SystemBus {
    /// Set the request bit for `interrupt` in IF.
    #[inline]
    pub fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.memory[HwRegister::If.addr() as usize] |= interrupt.mask();
    }

    /// Consume a pending DIV reset so the timer can restart its period.
    #[inline]
    pub(crate) fn take_div_reset(&mut self) -> bool {
        std::mem::take(&mut self.div_reset)
    }
}
