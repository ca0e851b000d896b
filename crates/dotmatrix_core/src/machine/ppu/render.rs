use super::{Lcdc, Shade};
use crate::error::CoreError;
use crate::machine::{HwRegister, SystemBus};
use crate::SCREEN_WIDTH;

const OAM_START: u16 = 0xFE00;
const SPRITE_COUNT: u16 = 40;
const SPRITE_HEIGHT: i16 = 8;

const ATTR_PRIORITY: u8 = 0x80;
const ATTR_FLIP_Y: u8 = 0x40;
const ATTR_FLIP_X: u8 = 0x20;
const ATTR_PALETTE: u8 = 0x10;

/// Colour index (0-3) of pixel (x, y) in the 16-byte tile at `tile_addr`.
///
/// Each tile row is two bytes: the low bitplane then the high bitplane,
/// with the leftmost pixel in bit 7.
#[inline]
fn tile_pixel(bus: &SystemBus, tile_addr: u16, x: u8, y: u8) -> u8 {
    let row = tile_addr.wrapping_add(y as u16 * 2);
    let lo = bus.peek(row);
    let hi = bus.peek(row.wrapping_add(1));
    let bit = 7 - x;
    (((hi >> bit) & 0x01) << 1) | ((lo >> bit) & 0x01)
}

/// Address of a background/window tile. In the signed mode the id is an
/// offset from 0x9000.
#[inline]
fn bg_tile_addr(lcdc: Lcdc, tile_id: u8) -> u16 {
    if lcdc.contains(Lcdc::TILE_DATA_UNSIGNED) {
        0x8000 + tile_id as u16 * 16
    } else {
        0x9000u16.wrapping_add_signed(tile_id as i8 as i16 * 16)
    }
}

/// Colour index at (x, y) of a 256x256 tile map.
#[inline]
fn map_pixel(bus: &SystemBus, lcdc: Lcdc, map_base: u16, x: u8, y: u8) -> u8 {
    let map_addr = map_base + (y as u16 / 8) * 32 + (x as u16 / 8);
    let tile = bg_tile_addr(lcdc, bus.peek(map_addr));
    tile_pixel(bus, tile, x & 7, y & 7)
}

/// Composite one scanline: background, then window, then sprites.
pub(super) fn render_line(
    bus: &SystemBus,
    lcdc: Lcdc,
    line: u8,
    out: &mut [Shade],
) -> Result<(), CoreError> {
    let bgp = bus.register(HwRegister::Bgp);
    // Raw colour indices, needed for sprite priority.
    let mut bg_index = [0u8; SCREEN_WIDTH];

    if lcdc.contains(Lcdc::BG_ENABLE) {
        let scx = bus.register(HwRegister::Scx);
        let scy = bus.register(HwRegister::Scy);
        let map_base = if lcdc.contains(Lcdc::BG_MAP_HIGH) { 0x9C00 } else { 0x9800 };
        let y = line.wrapping_add(scy);
        for x in 0..SCREEN_WIDTH {
            bg_index[x] = map_pixel(bus, lcdc, map_base, (x as u8).wrapping_add(scx), y);
        }
    }

    let wy = bus.register(HwRegister::Wy);
    if lcdc.contains(Lcdc::WINDOW_ENABLE) && line >= wy {
        let left = bus.register(HwRegister::Wx) as i16 - 7;
        let map_base = if lcdc.contains(Lcdc::WINDOW_MAP_HIGH) { 0x9C00 } else { 0x9800 };
        let y = line - wy;
        for x in left.max(0)..SCREEN_WIDTH as i16 {
            bg_index[x as usize] = map_pixel(bus, lcdc, map_base, (x - left) as u8, y);
        }
    }

    for (shade, &index) in out.iter_mut().zip(bg_index.iter()) {
        *shade = Shade::from_palette(bgp, index);
    }

    if lcdc.contains(Lcdc::OBJ_ENABLE) {
        if lcdc.contains(Lcdc::OBJ_TALL) {
            log::error!("8x16 sprites selected (LCDC=0x{:02X}) on line {}", lcdc.bits(), line);
            return Err(CoreError::UnsupportedSpriteSize);
        }
        render_sprites(bus, line, &bg_index, out);
    }

    Ok(())
}

fn render_sprites(bus: &SystemBus, line: u8, bg_index: &[u8], out: &mut [Shade]) {
    let obp0 = bus.register(HwRegister::Obp0);
    let obp1 = bus.register(HwRegister::Obp1);

    // Walk OAM backwards so lower-indexed sprites end up on top.
    for i in (0..SPRITE_COUNT).rev() {
        let entry = OAM_START + i * 4;
        let top = bus.peek(entry) as i16 - 16;
        let left = bus.peek(entry + 1) as i16 - 8;
        let tile = bus.peek(entry + 2);
        let attrs = bus.peek(entry + 3);

        let row = line as i16 - top;
        if !(0..SPRITE_HEIGHT).contains(&row) {
            continue;
        }

        let row = (if attrs & ATTR_FLIP_Y != 0 { 7 - row } else { row }) as u8;
        let palette = if attrs & ATTR_PALETTE != 0 { obp1 } else { obp0 };
        let tile_addr = 0x8000 + tile as u16 * 16;

        for col in 0..8i16 {
            let x = left + col;
            if x < 0 || x >= SCREEN_WIDTH as i16 {
                continue;
            }
            let src_col = (if attrs & ATTR_FLIP_X != 0 { 7 - col } else { col }) as u8;
            let index = tile_pixel(bus, tile_addr, src_col, row);
            if index == 0 {
                continue;
            }
            if attrs & ATTR_PRIORITY != 0 && bg_index[x as usize] != 0 {
                continue;
            }
            out[x as usize] = Shade::from_palette(palette, index);
        }
    }
}
