use crate::cpu::table::Timing;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    fn alu_dispatch(&mut self, operation: u8, value: u8) {
        match operation & 0x07 {
            0 => self.alu_add(value, false),
            1 => self.alu_add(value, true),
            2 => self.alu_sub(value, false),
            3 => self.alu_sub(value, true),
            4 => self.alu_and(value),
            5 => self.alu_xor(value),
            6 => self.alu_or(value),
            _ => self.alu_cp(value),
        }
    }

    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,r (0x80-0xBF).
    pub(in crate::cpu) fn exec_alu_reg(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!((0x80..=0xBF).contains(&opcode));
        let value = self.read_reg8(bus, opcode & 0x07);
        self.alu_dispatch(opcode >> 3, value);
        Timing::Base
    }

    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,d8.
    pub(in crate::cpu) fn exec_alu_imm(&mut self, bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));
        let value = self.fetch8(bus);
        self.alu_dispatch(opcode >> 3, value);
        Timing::Base
    }

    /// RLCA/RRCA/RLA/RRA. Same as the CB rotates except Z is always cleared.
    pub(in crate::cpu) fn exec_rotate_a(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));
        let result = self.alu_shift(opcode >> 3, self.regs.a());
        self.regs.set_a(result);
        self.set_flag(crate::cpu::Flag::Z, false);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_add_hl_rr(&mut self, _bus: &mut dyn Bus, opcode: u8) -> Timing {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));
        let value = self.read_rp(opcode >> 4);
        self.alu_add16_hl(value);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_add_sp_r8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        let imm = self.fetch8(bus);
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ld_hl_sp_r8(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        let imm = self.fetch8(bus);
        let result = self.alu_add16_signed(self.regs.sp, imm);
        self.regs.set_hl(result);
        Timing::Base
    }

    pub(in crate::cpu) fn exec_daa(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.alu_daa();
        Timing::Base
    }

    /// CPL. Flags `-11-`.
    pub(in crate::cpu) fn exec_cpl(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        use crate::cpu::FlagSet::{Leave, On};
        self.regs.set_a(!self.regs.a());
        self.set_flags(Leave, On, On, Leave);
        Timing::Base
    }

    /// SCF. Flags `-001`.
    pub(in crate::cpu) fn exec_scf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        use crate::cpu::FlagSet::{Leave, Off, On};
        self.set_flags(Leave, Off, Off, On);
        Timing::Base
    }

    /// CCF. Flags `-00C`.
    pub(in crate::cpu) fn exec_ccf(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        use crate::cpu::FlagSet::{Leave, Off};
        let carry = self.get_flag(crate::cpu::Flag::C);
        self.set_flags(Leave, Off, Off, !carry);
        Timing::Base
    }
}
