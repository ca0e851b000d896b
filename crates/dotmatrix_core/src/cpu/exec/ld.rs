use crate::cpu::table::Timing;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_ld_rr_d16(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        let value = self.fetch16(bus);
        self.write_rp(opcode >> 4, value);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ld_r_d8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));
        let value = self.fetch8(bus);
        self.write_reg8(bus, opcode >> 3, value);
        Timing::Base
    }

    /// LD r,r' (0x40-0x7F except 0x76, which is HALT).
    pub(in crate::cpu) fn exec_ld_r_r(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);
        let value = self.read_reg8(bus, opcode & 0x07);
        self.write_reg8(bus, opcode >> 3, value);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ld_a16_sp(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        let addr = self.fetch16(bus);
        let [hi, lo] = self.regs.sp.to_be_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ldh_a8(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));
        let addr = 0xFF00 | self.fetch8(bus) as u16;
        if opcode == 0xE0 {
            bus.write8(addr, self.regs.a());
        } else {
            let value = bus.read8(addr);
            self.regs.set_a(value);
        }
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ldh_c(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));
        let addr = 0xFF00 | self.regs.c() as u16;
        if opcode == 0xE2 {
            bus.write8(addr, self.regs.a());
        } else {
            let value = bus.read8(addr);
            self.regs.set_a(value);
        }
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ld_a16_a(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));
        let addr = self.fetch16(bus);
        if opcode == 0xEA {
            bus.write8(addr, self.regs.a());
        } else {
            let value = bus.read8(addr);
            self.regs.set_a(value);
        }
        Timing::Base
    }

    /// Address for the `(BC)`, `(DE)`, `(HL+)`, `(HL-)` forms, applying the
    /// HL post-increment/decrement.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(in crate::cpu) fn exec_ld_indirect_a(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));
        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a());
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ld_a_indirect(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));
        let addr = self.indirect_addr(opcode);
        let value = bus.read8(addr);
        self.regs.set_a(value);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ld_sp_hl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.regs.sp = self.regs.hl();
        Timing::Base
    }
}
