use super::SystemBus;
use crate::cpu::Bus;

const OAM_START: u16 = 0xFE00;
const OAM_SIZE: u16 = 0xA0;

impl SystemBus {
    /// OAM DMA: copy 160 bytes from `value << 8` to the sprite table.
    ///
    /// The transfer is instantaneous; the 160 M-cycle duration and the bus
    /// conflicts it causes on hardware are not modelled.
    pub(super) fn do_oam_dma(&mut self, value: u8) {
        let base = (value as u16) << 8;
        for i in 0..OAM_SIZE {
            let byte = self.read8(base.wrapping_add(i));
            self.memory[(OAM_START + i) as usize] = byte;
        }
    }
}
