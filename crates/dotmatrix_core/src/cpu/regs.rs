use super::Cpu;

/// A 16-bit register that can also be addressed as two 8-bit halves.
///
/// The high byte is always the first register of the pair (B in BC, H in HL),
/// computed by shift/mask rather than by memory layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterPair(u16);

impl RegisterPair {
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: u16) {
        self.0 = value;
    }

    #[inline]
    pub const fn hi(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn lo(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub fn set_hi(&mut self, value: u8) {
        self.0 = (self.0 & 0x00FF) | ((value as u16) << 8);
    }

    #[inline]
    pub fn set_lo(&mut self, value: u8) {
        self.0 = (self.0 & 0xFF00) | value as u16;
    }
}

/// Registers for the Game Boy CPU (SM83).
///
/// A/F, B/C, D/E and H/L live in register pairs; SP and PC are independent.
/// The low nibble of F always reads back as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    af: RegisterPair,
    bc: RegisterPair,
    de: RegisterPair,
    hl: RegisterPair,
    pub sp: u16,
    pub pc: u16,
}

macro_rules! byte_accessors {
    ($pair:ident, $hi:ident, $set_hi:ident, $lo:ident, $set_lo:ident) => {
        #[inline]
        pub fn $hi(&self) -> u8 {
            self.$pair.hi()
        }

        #[inline]
        pub fn $set_hi(&mut self, value: u8) {
            self.$pair.set_hi(value);
        }

        #[inline]
        pub fn $lo(&self) -> u8 {
            self.$pair.lo()
        }

        #[inline]
        pub fn $set_lo(&mut self, value: u8) {
            self.$pair.set_lo(value);
        }
    };
}

impl Registers {
    byte_accessors!(bc, b, set_b, c, set_c);
    byte_accessors!(de, d, set_d, e, set_e);
    byte_accessors!(hl, h, set_h, l, set_l);

    #[inline]
    pub fn a(&self) -> u8 {
        self.af.hi()
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af.set_hi(value);
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.af.lo()
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        // Lower 4 bits of F are always zero.
        self.af.set_lo(value & 0xF0);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        self.af.get()
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.af.set(value & 0xFFF0);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.bc.get()
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.bc.set(value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.de.get()
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.de.set(value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl.get()
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl.set(value);
    }

    /// Register values the DMG boot ROM leaves behind at 0x0100.
    pub fn dmg_post_boot() -> Self {
        Self {
            af: RegisterPair::new(0x01B0),
            bc: RegisterPair::new(0x0013),
            de: RegisterPair::new(0x00D8),
            hl: RegisterPair::new(0x014D),
            sp: 0xFFFE,
            pc: 0x0100,
        }
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0-3 are always zero.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

/// Per-flag effect of an instruction: force on, force off, or leave as is.
///
/// Mirrors the usual flag effect strings, e.g. `INC r` is `Z0H-`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagSet {
    Leave,
    Off,
    On,
}

impl From<bool> for FlagSet {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            FlagSet::On
        } else {
            FlagSet::Off
        }
    }
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f() & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        let f = self.regs.f();
        if value {
            self.regs.set_f(f | (1 << bit));
        } else {
            self.regs.set_f(f & !(1 << bit));
        }
    }

    #[inline]
    fn apply_flag(&mut self, flag: Flag, effect: FlagSet) {
        match effect {
            FlagSet::Leave => {}
            FlagSet::Off => self.set_flag(flag, false),
            FlagSet::On => self.set_flag(flag, true),
        }
    }

    /// Apply a Z/N/H/C effect in one go.
    #[inline]
    pub(crate) fn set_flags(
        &mut self,
        z: impl Into<FlagSet>,
        n: impl Into<FlagSet>,
        h: impl Into<FlagSet>,
        c: impl Into<FlagSet>,
    ) {
        self.apply_flag(Flag::Z, z.into());
        self.apply_flag(Flag::N, n.into());
        self.apply_flag(Flag::H, h.into());
        self.apply_flag(Flag::C, c.into());
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
            self.af(),
            self.bc(),
            self.de(),
            self.hl(),
            self.sp,
            self.pc
        )
    }
}
