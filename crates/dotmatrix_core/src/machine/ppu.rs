//! Scanline-based picture processing unit.
//!
//! Each line is 456 T-cycles; lines 0..=143 cycle through OAM search, pixel
//! transfer and HBlank, lines 144..=153 are VBlank. A line is composited
//! into the frame buffer in one go when it enters HBlank.

mod render;

use bitflags::bitflags;
use dotmatrix_common::Color;

use super::{HwRegister, SystemBus};
use crate::cpu::Interrupt;
use crate::error::CoreError;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const LINE_CYCLES: u32 = 456;
pub const LINES_PER_FRAME: u8 = 154;
pub const FRAME_CYCLES: u32 = LINE_CYCLES * LINES_PER_FRAME as u32;
const OAM_END: u32 = 80;
const TRANSFER_END: u32 = 250;
const VBLANK_START: u8 = SCREEN_HEIGHT as u8;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Lcdc: u8 {
        const BG_ENABLE = 1 << 0;
        const OBJ_ENABLE = 1 << 1;
        const OBJ_TALL = 1 << 2;
        const BG_MAP_HIGH = 1 << 3;
        const TILE_DATA_UNSIGNED = 1 << 4;
        const WINDOW_ENABLE = 1 << 5;
        const WINDOW_MAP_HIGH = 1 << 6;
        const LCD_ENABLE = 1 << 7;
    }
}

bitflags! {
    /// Interrupt selects and the coincidence flag in STAT (0xFF41).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Stat: u8 {
        const COINCIDENCE = 1 << 2;
        const HBLANK_SELECT = 1 << 3;
        const VBLANK_SELECT = 1 << 4;
        const OAM_SELECT = 1 << 5;
        const LYC_SELECT = 1 << 6;
    }
}

/// PPU mode, numbered as reported in STAT bits 1-0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    SearchingOam = 2,
    TransferringData = 3,
}

impl PpuMode {
    /// Mode for a position in the frame, derived purely from timing.
    pub fn at(line: u8, dot: u32) -> Self {
        if line >= VBLANK_START {
            PpuMode::VBlank
        } else if dot < OAM_END {
            PpuMode::SearchingOam
        } else if dot < TRANSFER_END {
            PpuMode::TransferringData
        } else {
            PpuMode::HBlank
        }
    }
}

/// One of the four DMG grey levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shade {
    #[default]
    White = 0,
    LightGrey = 1,
    DarkGrey = 2,
    Black = 3,
}

impl Shade {
    /// Resolve a 2-bit colour index through a palette register.
    #[inline]
    pub fn from_palette(palette: u8, index: u8) -> Self {
        match (palette >> (index * 2)) & 0x03 {
            0 => Shade::White,
            1 => Shade::LightGrey,
            2 => Shade::DarkGrey,
            _ => Shade::Black,
        }
    }

    pub fn to_color(self) -> Color {
        match self {
            Shade::White => Color::DMG_WHITE,
            Shade::LightGrey => Color::DMG_LIGHT_GREY,
            Shade::DarkGrey => Color::DMG_DARK_GREY,
            Shade::Black => Color::DMG_BLACK,
        }
    }
}

pub struct Ppu {
    /// Position within the current line, 0..LINE_CYCLES.
    dot: u32,
    line: u8,
    /// Mode at the end of the last tick, kept only to detect edges.
    mode: PpuMode,
    /// OR of all enabled STAT sources; the interrupt fires on its rising edge.
    stat_line: bool,
    frame_count: u64,
    screen: Vec<Shade>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            dot: 0,
            line: 0,
            mode: PpuMode::SearchingOam,
            stat_line: false,
            frame_count: 0,
            screen: vec![Shade::White; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    #[inline]
    pub fn mode(&self) -> PpuMode {
        self.mode
    }

    #[inline]
    pub fn line(&self) -> u8 {
        self.line
    }

    #[inline]
    pub fn dot(&self) -> u32 {
        self.dot
    }

    /// Number of VBlank periods entered so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Row-major 160x144 frame buffer.
    #[inline]
    pub fn screen_buffer(&self) -> &[Shade] {
        &self.screen
    }

    /// Advance by `cycles` T-cycles.
    ///
    /// Time is consumed in chunks that stop at every mode boundary so no
    /// edge is skipped, however large `cycles` is.
    pub fn tick(&mut self, bus: &mut SystemBus, cycles: u32) -> Result<(), CoreError> {
        let mut remaining = cycles;
        while remaining > 0 {
            let boundary = if self.dot < OAM_END {
                OAM_END
            } else if self.dot < TRANSFER_END {
                TRANSFER_END
            } else {
                LINE_CYCLES
            };
            let step = remaining.min(boundary - self.dot);
            self.dot += step;
            remaining -= step;

            if self.dot >= LINE_CYCLES {
                self.dot = 0;
                self.line = (self.line + 1) % LINES_PER_FRAME;
                bus.set_register(HwRegister::Ly, self.line);
            }

            self.update_mode(bus)?;
            self.update_stat(bus);
        }
        Ok(())
    }

    fn update_mode(&mut self, bus: &mut SystemBus) -> Result<(), CoreError> {
        let mode = PpuMode::at(self.line, self.dot);
        if mode == self.mode {
            return Ok(());
        }
        self.mode = mode;

        match mode {
            PpuMode::HBlank => {
                let lcdc = Lcdc::from_bits_retain(bus.register(HwRegister::Lcdc));
                if lcdc.contains(Lcdc::LCD_ENABLE) {
                    let row = self.line as usize * SCREEN_WIDTH;
                    render::render_line(
                        bus,
                        lcdc,
                        self.line,
                        &mut self.screen[row..row + SCREEN_WIDTH],
                    )?;
                }
            }
            PpuMode::VBlank => {
                self.frame_count += 1;
                bus.request_interrupt(Interrupt::VBlank);
                log::debug!(
                    "VBlank edge: frame={} IF=0x{:02X}",
                    self.frame_count,
                    bus.register(HwRegister::If)
                );
            }
            PpuMode::SearchingOam | PpuMode::TransferringData => {}
        }
        Ok(())
    }

    /// Refresh STAT bits 2-0 and raise the STAT interrupt on a rising edge
    /// of the combined source line.
    fn update_stat(&mut self, bus: &mut SystemBus) {
        let raw = bus.register(HwRegister::Stat);
        let select = Stat::from_bits_truncate(raw);
        let coincidence = self.line == bus.register(HwRegister::Lyc);

        let mut stat = (raw & !0x07) | self.mode as u8;
        if coincidence {
            stat |= Stat::COINCIDENCE.bits();
        }
        bus.set_register(HwRegister::Stat, stat);

        let line = (coincidence && select.contains(Stat::LYC_SELECT))
            || match self.mode {
                PpuMode::HBlank => select.contains(Stat::HBLANK_SELECT),
                PpuMode::VBlank => select.contains(Stat::VBLANK_SELECT),
                PpuMode::SearchingOam => select.contains(Stat::OAM_SELECT),
                PpuMode::TransferringData => false,
            };

        if line && !self.stat_line {
            bus.request_interrupt(Interrupt::LcdStat);
            log::debug!(
                "STAT interrupt: STAT=0x{:02X} LY={} mode={:?}",
                stat,
                self.line,
                self.mode
            );
        }
        self.stat_line = line;
    }
}
