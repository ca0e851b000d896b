use crate::cpu::table::Timing;
use crate::cpu::{Bus, Cpu, RunState};

impl Cpu {
    pub(in crate::cpu) fn exec_halt(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.state = RunState::Halted;
        Timing::Base
    }

    pub(in crate::cpu) fn exec_stop(&mut self, bus: &mut dyn Bus, _opcode: u8) -> Timing {
        // STOP is officially a 2-byte instruction; the second byte is
        // often 0 and ignored.
        let _padding = self.fetch8(bus);
        self.state = RunState::Stopped;
        Timing::Base
    }

    pub(in crate::cpu) fn exec_di(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        self.ime = false;
        self.ei_pending = false;
        Timing::Base
    }

    pub(in crate::cpu) fn exec_ei(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        // IME becomes 1 after the *next* instruction completes.
        self.ei_pending = true;
        Timing::Base
    }
}
