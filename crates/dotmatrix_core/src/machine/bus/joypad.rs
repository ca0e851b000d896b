use dotmatrix_common::input::{Button, Direction};

use super::{HwRegister, SystemBus};
use crate::cpu::Interrupt;

const SELECT_DIRECTIONS: u8 = 0x10;
const SELECT_BUTTONS: u8 = 0x20;

impl SystemBus {
    pub fn set_direction(&mut self, direction: Direction, pressed: bool) {
        if pressed && !self.directions.contains(direction) {
            self.request_interrupt(Interrupt::Joypad);
        }
        self.directions.set(direction, pressed);
        self.refresh_p1();
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed && !self.buttons.contains(button) {
            self.request_interrupt(Interrupt::Joypad);
        }
        self.buttons.set(button, pressed);
        self.refresh_p1();
    }

    /// Recompute P1's input nibble from the selected groups.
    ///
    /// Bits 5 (buttons) and 4 (directions) select a group when 0. A pressed
    /// key in a selected group reads as 0; bits 7-6 always read as 1.
    pub(super) fn refresh_p1(&mut self) {
        let select = self.register(HwRegister::P1) & (SELECT_DIRECTIONS | SELECT_BUTTONS);

        let mut low = 0x0F;
        if select & SELECT_DIRECTIONS == 0 {
            low &= !self.directions.bits();
        }
        if select & SELECT_BUTTONS == 0 {
            low &= !self.buttons.bits();
        }
        self.set_register(HwRegister::P1, 0xC0 | select | (low & 0x0F));
    }
}
