use crate::cpu::table::Timing;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_inc8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(
            matches!(opcode, 0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C),
            "unexpected INC r opcode {opcode:#04x}"
        );

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, reg, result);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_dec8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(
            matches!(opcode, 0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D),
            "unexpected DEC r opcode {opcode:#04x}"
        );

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, reg, result);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_inc16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));
        let rp = opcode >> 4;
        let value = self.read_rp(rp).wrapping_add(1);
        self.write_rp(rp, value);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_dec16(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));
        let rp = opcode >> 4;
        let value = self.read_rp(rp).wrapping_sub(1);
        self.write_rp(rp, value);
        Timing::Base
    }
}
