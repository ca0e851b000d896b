use crate::cpu::table::Timing;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// PUSH rr, with the `rp2` encoding (AF instead of SP).
    pub(in crate::cpu) fn exec_push_rr(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));
        let value = match (opcode >> 4) & 0x03 {
            3 => self.regs.af(),
            rp => self.read_rp(rp),
        };
        self.push_u16(bus, value);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_pop_rr(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));
        let value = self.pop_u16(bus);
        match (opcode >> 4) & 0x03 {
            3 => self.regs.set_af(value),
            rp => self.write_rp(rp, value),
        }
        Timing::Base
    }
}
