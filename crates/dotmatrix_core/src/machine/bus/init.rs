use super::{HwRegister, SystemBus};

impl SystemBus {
    /// Initialise I/O registers to the DMG power-up values.
    pub(super) fn apply_dmg_initial_io_state(&mut self) {
        use HwRegister::*;

        let initial = [
            (P1, 0xCF),
            (Div, 0x18),
            (Tima, 0x00),
            (Tma, 0x00),
            (Tac, 0x00),
            // IF's upper 3 bits read back as 1; only the low 5 are stored.
            (If, 0x01),
            (Lcdc, 0x91),
            (Stat, 0x81),
            (Scy, 0x00),
            (Scx, 0x00),
            (Ly, 0x00),
            (Lyc, 0x00),
            (Bgp, 0xFC),
            (Wy, 0x00),
            (Wx, 0x00),
            (Ie, 0x00),
        ];
        for (reg, value) in initial {
            self.set_register(reg, value);
        }
    }
}
