use super::regs::FlagSet::{Leave, Off, On};
use super::table::Timing;
use super::{Bus, Cpu};

// CB-prefixed handlers. The opcode passed in is the byte after the prefix,
// split as x (bits 6-7), y (bits 3-5) and z (bits 0-2).

impl Cpu {
    /// RLC/RRC/RL/RR/SLA/SRA/SWAP/SRL r.
    pub(in crate::cpu) fn exec_cb_shift(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        let z = opcode & 0x07;
        let value = self.read_reg8(bus, z);
        let result = self.alu_shift(opcode >> 3, value);
        self.write_reg8(bus, z, result);
        Timing::Base
    }

    /// BIT y,r. Flags `Z01-`.
    pub(in crate::cpu) fn exec_cb_bit(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        let y = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, opcode & 0x07);
        self.set_flags(value & (1 << y) == 0, Off, On, Leave);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_cb_res(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let value = self.read_reg8(bus, z);
        self.write_reg8(bus, z, value & !(1 << y));
        Timing::Base
    }

    pub(in crate::cpu) fn exec_cb_set(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let value = self.read_reg8(bus, z);
        self.write_reg8(bus, z, value | (1 << y));
        Timing::Base
    }
}
