use super::{Bus, Cpu, RunState};

pub const IF_ADDR: u16 = 0xFF0F;
pub const IE_ADDR: u16 = 0xFFFF;

/// T-cycles charged for an interrupt dispatch.
pub const DISPATCH_CYCLES: u32 = 20;

/// Handler addresses on the DMG, indexed by [`Interrupt::index`].
pub const DMG_INTERRUPT_VECTORS: [u16; 5] = [0x0040, 0x0048, 0x0050, 0x0058, 0x0060];

/// Interrupt sources, in priority order (VBlank is highest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit position in IF/IE.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

impl Cpu {
    /// Dispatch the highest-priority pending interrupt, if IME allows it.
    ///
    /// A pending interrupt always ends HALT. With IME clear the CPU just
    /// resumes at the next instruction; with IME set the return address is
    /// pushed, the IF bit is acknowledged and PC moves to the vector.
    /// Returns the cycles spent dispatching, or `None` if nothing was taken.
    pub(in crate::cpu) fn service_interrupts(&mut self, bus: &mut dyn Bus) -> Option<u32> {
        let ie = bus.read8(IE_ADDR);
        let iflags = bus.read8(IF_ADDR);
        let pending = ie & iflags & 0x1F;
        if pending == 0 {
            return None;
        }

        if !self.ime {
            if self.state == RunState::Halted {
                self.state = RunState::Running;
            }
            return None;
        }

        let index = pending.trailing_zeros() as usize;
        let vector = self.vectors[index];
        let pc = self.regs.pc;

        self.ime = false;
        self.state = RunState::Running;
        self.push_u16(bus, pc);
        bus.write8(IF_ADDR, iflags & !(1 << index));
        self.regs.pc = vector;

        log::debug!(
            "interrupt {:?}: vector=0x{:04X} pc=0x{:04X} sp=0x{:04X} IF=0x{:02X} IE=0x{:02X}",
            Interrupt::ALL[index],
            vector,
            pc,
            self.regs.sp,
            iflags & 0x1F,
            ie,
        );

        Some(DISPATCH_CYCLES)
    }
}
