use super::SystemBus;

/// Named hardware registers inside the memory image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum HwRegister {
    P1 = 0xFF00,
    Div = 0xFF04,
    Tima = 0xFF05,
    Tma = 0xFF06,
    Tac = 0xFF07,
    If = 0xFF0F,
    Lcdc = 0xFF40,
    Stat = 0xFF41,
    Scy = 0xFF42,
    Scx = 0xFF43,
    Ly = 0xFF44,
    Lyc = 0xFF45,
    Dma = 0xFF46,
    Bgp = 0xFF47,
    Obp0 = 0xFF48,
    Obp1 = 0xFF49,
    Wy = 0xFF4A,
    Wx = 0xFF4B,
    Boot = 0xFF50,
    Ie = 0xFFFF,
}

impl HwRegister {
    #[inline]
    pub const fn addr(self) -> u16 {
        self as u16
    }
}

impl SystemBus {
    /// Current value of a hardware register, without read side effects.
    #[inline]
    pub fn register(&self, reg: HwRegister) -> u8 {
        self.memory[reg.addr() as usize]
    }

    /// Store a hardware register value directly, without the write side
    /// effects a CPU store would trigger (DIV reset, DMA, P1 refresh).
    #[inline]
    pub fn set_register(&mut self, reg: HwRegister, value: u8) {
        self.memory[reg.addr() as usize] = value;
    }
}
