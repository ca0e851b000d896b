use super::table::Timing;
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Helper to read an 8-bit register or (HL) by index.
    ///
    /// The encoding matches the standard Game Boy register order used by
    /// opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8(&mut self, bus: &mut dyn Bus, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b(),
            1 => self.regs.c(),
            2 => self.regs.d(),
            3 => self.regs.e(),
            4 => self.regs.h(),
            5 => self.regs.l(),
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a(),
        }
    }

    /// Helper to write an 8-bit register or (HL) by index.
    ///
    /// The encoding matches `read_reg8`.
    #[inline]
    pub(super) fn write_reg8(&mut self, bus: &mut dyn Bus, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.set_b(value),
            1 => self.regs.set_c(value),
            2 => self.regs.set_d(value),
            3 => self.regs.set_e(value),
            4 => self.regs.set_h(value),
            5 => self.regs.set_l(value),
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.set_a(value),
        }
    }

    /// Read a 16-bit register pair by its `rp` encoding: 0=BC 1=DE 2=HL 3=SP.
    #[inline]
    pub(super) fn read_rp(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    #[inline]
    pub(super) fn fetch8(&mut self, bus: &mut dyn Bus) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(super) fn fetch16(&mut self, bus: &mut dyn Bus) -> u16 {
        let value = bus.read16(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(2);
        value
    }

    #[inline]
    pub(super) fn push_u16(&mut self, bus: &mut dyn Bus, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        // Stack grows downward. We want memory[SP] = low, memory[SP+1] = high.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16(&mut self, bus: &mut dyn Bus) -> u16 {
        let value = bus.read16(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    /// Condition code from bits 3-4 of a branch opcode: NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, opcode: u8) -> bool {
        match (opcode >> 3) & 0x03 {
            0 => !self.get_flag(Flag::Z),
            1 => self.get_flag(Flag::Z),
            2 => !self.get_flag(Flag::C),
            _ => self.get_flag(Flag::C),
        }
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is a signed 8-bit offset relative to the address
    /// following the operand.
    pub(super) fn jr(&mut self, bus: &mut dyn Bus, cond: bool) -> Timing {
        let offset = self.fetch8(bus) as i8;
        if cond {
            self.regs.pc = self.regs.pc.wrapping_add_signed(offset as i16);
            Timing::Taken
        } else {
            Timing::Base
        }
    }

    /// Absolute jump helper used by JP a16 and JP cc,a16.
    pub(super) fn jp(&mut self, bus: &mut dyn Bus, cond: bool) -> Timing {
        let addr = self.fetch16(bus);
        if cond {
            self.regs.pc = addr;
            Timing::Taken
        } else {
            Timing::Base
        }
    }

    /// Call helper used by CALL a16 and CALL cc,a16.
    pub(super) fn call(&mut self, bus: &mut dyn Bus, cond: bool) -> Timing {
        let addr = self.fetch16(bus);
        if cond {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
            Timing::Taken
        } else {
            Timing::Base
        }
    }

    /// Return helper used by RET and RET cc.
    pub(super) fn ret(&mut self, bus: &mut dyn Bus, cond: bool) -> Timing {
        if cond {
            self.regs.pc = self.pop_u16(bus);
            Timing::Taken
        } else {
            Timing::Base
        }
    }
}
