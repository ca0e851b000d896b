use super::regs::FlagSet::{Leave, Off, On};
use super::{Cpu, Flag};

impl Cpu {
    /// Core 8-bit ADD/ADC operation on A. Flags `Z0HC`.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry_in = u8::from(use_carry && self.get_flag(Flag::C));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.set_a(result);
        self.set_flags(result == 0, Off, half > 0x0F, full > 0xFF);
    }

    /// Core 8-bit SUB/SBC operation on A. Flags `Z1HC`.
    ///
    /// `use_carry` selects between SUB (false) and SBC (true).
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let result = self.sub_flags(a, value, use_carry);
        self.regs.set_a(result);
    }

    /// Compare A with `value`, setting flags as if `A - value` was performed.
    /// A itself is not modified.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        let a = self.regs.a();
        self.sub_flags(a, value, false);
    }

    fn sub_flags(&mut self, a: u8, value: u8, use_carry: bool) -> u8 {
        let carry_in = i16::from(use_carry && self.get_flag(Flag::C));

        // Borrow from bit 4: the subtrahend's low nibble exceeds the minuend's.
        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        self.set_flags(result == 0, On, half < 0, full < 0);
        result
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);
        self.set_flags(result == 0, Off, On, Off);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);
        self.set_flags(result == 0, Off, Off, Off);
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);
        self.set_flags(result == 0, Off, Off, Off);
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// This follows the standard Game Boy DAA behaviour:
    /// - Uses C, H, N, and A to compute a correction value.
    /// - Updates A, Z, H, C; leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a();
        let mut adjust: u8 = if self.get_flag(Flag::C) { 0x60 } else { 0x00 };
        if self.get_flag(Flag::H) {
            adjust |= 0x06;
        }

        if !self.get_flag(Flag::N) {
            // After an addition.
            if (a & 0x0F) > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            // After a subtraction.
            a = a.wrapping_sub(adjust);
        }

        self.set_flags(a == 0, Leave, Off, adjust >= 0x60);
        self.regs.set_a(a);
    }

    /// 8-bit increment helper used by INC r and INC (HL). Flags `Z0H-`.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flags(result == 0, Off, (value & 0x0F) == 0x0F, Leave);
        result
    }

    /// 8-bit decrement helper used by DEC r and DEC (HL). Flags `Z1H-`.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flags(result == 0, On, (value & 0x0F) == 0, Leave);
        result
    }

    /// 16-bit add helper for `ADD HL,rr`. Flags `-0HC`.
    ///
    /// H is the carry out of the low byte, C the carry out of bit 15.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        let result = hl.wrapping_add(value);

        let half = (hl & 0x00FF) + (value & 0x00FF) > 0x00FF;
        let carry = hl as u32 + value as u32 > 0xFFFF;
        self.set_flags(Leave, Off, half, carry);

        self.regs.set_hl(result);
    }

    /// 16-bit add helper for instructions that add a signed 8-bit immediate
    /// to a 16-bit base (ADD SP,r8 and LD HL,SP+r8). Flags `00HC`, with H
    /// and C computed from the low byte.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        let half = (base & 0x000F) + (offset & 0x000F) > 0x000F;
        let carry = (base & 0x00FF) + (offset & 0x00FF) > 0x00FF;
        self.set_flags(Off, Off, half, carry);
        base.wrapping_add(offset)
    }

    /// Shared rotate/shift core for the CB table and the accumulator rotates.
    ///
    /// `kind` follows the CB encoding: 0=RLC 1=RRC 2=RL 3=RR 4=SLA 5=SRA
    /// 6=SWAP 7=SRL. Returns the result; flags are `Z00C` (`Z000` for SWAP).
    pub(super) fn alu_shift(&mut self, kind: u8, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry) = match kind {
            0 => (value.rotate_left(1), value & 0x80 != 0),
            1 => (value.rotate_right(1), value & 0x01 != 0),
            2 => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            3 => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            4 => (value << 1, value & 0x80 != 0),
            5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            6 => (value.rotate_left(4), false),
            _ => (value >> 1, value & 0x01 != 0),
        };
        self.set_flags(result == 0, Off, Off, carry);
        result
    }
}
