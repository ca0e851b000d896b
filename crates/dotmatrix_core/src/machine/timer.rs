use super::{HwRegister, SystemBus};
use crate::cpu::Interrupt;

/// T-cycles per DIV increment (16384 Hz).
pub const DIV_PERIOD: u32 = 256;

/// T-cycles per TIMA increment, indexed by TAC bits 1-0.
pub const TIMA_PERIODS: [u32; 4] = [1024, 16, 64, 256];

const TAC_ENABLE: u8 = 0x04;

/// Divider and programmable timer.
///
/// The counters themselves are the DIV/TIMA registers on the bus; this only
/// keeps the cycle remainders between ticks.
#[derive(Debug, Default)]
pub struct Timer {
    div_cycles: u32,
    tima_cycles: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, bus: &mut SystemBus, cycles: u32) {
        // A write to DIV restarts the divider period.
        if bus.take_div_reset() {
            self.div_cycles = 0;
        }

        self.div_cycles += cycles;
        while self.div_cycles >= DIV_PERIOD {
            self.div_cycles -= DIV_PERIOD;
            let div = bus.register(HwRegister::Div).wrapping_add(1);
            bus.set_register(HwRegister::Div, div);
        }

        let tac = bus.register(HwRegister::Tac);
        if tac & TAC_ENABLE == 0 {
            return;
        }

        let period = TIMA_PERIODS[(tac & 0x03) as usize];
        self.tima_cycles += cycles;
        while self.tima_cycles >= period {
            self.tima_cycles -= period;
            match bus.register(HwRegister::Tima) {
                0xFF => {
                    let tma = bus.register(HwRegister::Tma);
                    bus.set_register(HwRegister::Tima, tma);
                    bus.request_interrupt(Interrupt::Timer);
                }
                tima => bus.set_register(HwRegister::Tima, tima + 1),
            }
        }
    }
}
