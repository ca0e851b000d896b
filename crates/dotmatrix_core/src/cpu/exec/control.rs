use crate::cpu::table::Timing;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_jr(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.jr(bus, true)
    }

    pub(in crate::cpu) fn exec_jr_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));
        let cond = self.condition(opcode);
        self.jr(bus, cond)
    }

    pub(in crate::cpu) fn exec_jp_a16(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.jp(bus, true)
    }

    pub(in crate::cpu) fn exec_jp_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA));
        let cond = self.condition(opcode);
        self.jp(bus, cond)
    }

    pub(in crate::cpu) fn exec_jp_hl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.regs.pc = self.regs.hl();
        Timing::Base
    }

    pub(in crate::cpu) fn exec_call_a16(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.call(bus, true)
    }

    pub(in crate::cpu) fn exec_call_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xC4 | 0xCC | 0xD4 | 0xDC));
        let cond = self.condition(opcode);
        self.call(bus, cond)
    }

    pub(in crate::cpu) fn exec_ret(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.ret(bus, true)
    }

    pub(in crate::cpu) fn exec_ret_cc(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));
        let cond = self.condition(opcode);
        self.ret(bus, cond)
    }

    pub(in crate::cpu) fn exec_reti(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.ime = true;
        self.ei_pending = false;
        self.ret(bus, true)
    }

    pub(in crate::cpu) fn exec_rst(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(
            opcode,
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF
        ));
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = (opcode & 0x38) as u16;
        Timing::Base
    }
}
