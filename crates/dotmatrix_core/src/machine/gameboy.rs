use dotmatrix_common::input::{Button, Direction};

use super::ppu::FRAME_CYCLES;
use super::{CartridgeHeader, Ppu, Shade, SystemBus, Timer};
use crate::cpu::{Cpu, DMG_INTERRUPT_VECTORS};
use crate::error::CoreError;

/// High-level Game Boy machine.
///
/// Owns the CPU, the bus and the peripherals, and advances them in lockstep:
/// every CPU step is followed by a PPU and timer tick of the same length.
pub struct GameBoy {
    pub cpu: Cpu,
    pub bus: SystemBus,
    pub ppu: Ppu,
    pub timer: Timer,
    header: Option<CartridgeHeader>,
}

impl GameBoy {
    /// Build a machine from an optional boot ROM and an optional ROM-only
    /// cartridge image.
    ///
    /// With a boot ROM the CPU starts at 0x0000 inside the overlay. Without
    /// one the machine starts in the state the boot ROM would leave behind:
    /// PC at 0x0100, post-boot registers, overlay unmapped.
    pub fn new(boot_rom: Option<&[u8]>, rom: Option<&[u8]>) -> Result<Self, CoreError> {
        let header = rom.map(CartridgeHeader::parse).transpose()?;
        if let Some(header) = &header {
            log::info!("cartridge: {}", header);
        }

        let bus = SystemBus::new(boot_rom, rom)?;
        let cpu = if boot_rom.is_some() {
            Cpu::new(0x0000, DMG_INTERRUPT_VECTORS)
        } else {
            Cpu::post_boot()
        };

        Ok(Self {
            cpu,
            bus,
            ppu: Ppu::new(),
            timer: Timer::new(),
            header,
        })
    }

    /// Run one CPU step and advance the PPU and timer by the same amount.
    ///
    /// At least one cycle always elapses so a halted CPU cannot starve the
    /// peripherals that would wake it.
    pub fn step(&mut self) -> Result<u32, CoreError> {
        let cycles = self.cpu.step(&mut self.bus)?.max(1);
        self.ppu.tick(&mut self.bus, cycles)?;
        self.timer.tick(&mut self.bus, cycles);
        Ok(cycles)
    }

    /// Step until the PPU enters the next VBlank. Returns the cycles run.
    ///
    /// Bounded to two frames of cycles so a machine with a stuck PPU state
    /// still returns.
    pub fn step_frame(&mut self) -> Result<u32, CoreError> {
        let target = self.ppu.frame_count() + 1;
        let mut cycles = 0u32;
        while self.ppu.frame_count() < target && cycles < FRAME_CYCLES * 2 {
            cycles += self.step()?;
        }
        Ok(cycles)
    }

    pub fn press_direction(&mut self, direction: Direction, pressed: bool) {
        self.bus.set_direction(direction, pressed);
    }

    pub fn press_button(&mut self, button: Button, pressed: bool) {
        self.bus.set_button(button, pressed);
    }

    #[inline]
    pub fn screen_buffer(&self) -> &[Shade] {
        self.ppu.screen_buffer()
    }

    /// The frame buffer as packed RGB24 bytes, row-major.
    pub fn frame_rgb24(&self) -> Vec<u8> {
        self.screen_buffer()
            .iter()
            .flat_map(|shade| {
                let (r, g, b) = shade.to_color().rgb();
                [r, g, b]
            })
            .collect()
    }

    #[inline]
    pub fn header(&self) -> Option<&CartridgeHeader> {
        self.header.as_ref()
    }

    #[inline]
    pub fn boot_rom_mapped(&self) -> bool {
        self.bus.boot_rom_mapped()
    }
}
