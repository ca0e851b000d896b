use super::interrupts::IF_ADDR;
use super::table::{CB_OPCODES, CB_PREFIX, OPCODES};
use super::{Bus, Cpu, RunState};
use crate::error::CoreError;

/// Cycles reported for each tick spent in HALT or STOP.
pub const IDLE_CYCLES: u32 = 4;

const P1_ADDR: u16 = 0xFF00;

impl Cpu {
    /// Advance the CPU by one step: an interrupt dispatch, an idle HALT/STOP
    /// slot, or a single instruction. Returns the T-cycles consumed.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CoreError> {
        let bus: &mut dyn Bus = bus;

        if let Some(cycles) = self.service_interrupts(bus) {
            return Ok(cycles);
        }

        match self.state {
            RunState::Running => {}
            RunState::Halted => return Ok(IDLE_CYCLES),
            RunState::Stopped => {
                // STOP ends once any joypad input line is pulled low.
                let p1 = bus.read8(P1_ADDR);
                if p1 & 0x0F != 0x0F {
                    log::debug!("leaving STOP, P1=0x{:02X}", p1);
                    self.state = RunState::Running;
                }
                return Ok(IDLE_CYCLES);
            }
        }

        let promote_ime = self.ei_pending;
        let cycles = self.execute(bus)?;
        // EI takes effect after the instruction following it, unless that
        // instruction was DI.
        if promote_ime && self.ei_pending {
            self.ime = true;
            self.ei_pending = false;
        }
        Ok(cycles)
    }

    fn execute(&mut self, bus: &mut dyn Bus) -> Result<u32, CoreError> {
        let address = self.regs.pc;
        let opcode = self.fetch8(bus);

        let (entry, operand) = if opcode == CB_PREFIX {
            let cb = self.fetch8(bus);
            (&CB_OPCODES[cb as usize], cb)
        } else {
            match &OPCODES[opcode as usize] {
                Some(entry) => (entry, opcode),
                None => {
                    self.regs.pc = address;
                    log::error!(
                        "unknown opcode 0x{:02X} at 0x{:04X} IF=0x{:02X} {}",
                        opcode,
                        address,
                        bus.read8(IF_ADDR),
                        self.regs,
                    );
                    return Err(CoreError::UnknownOpcode { opcode, address });
                }
            }
        };

        log::trace!("{:04X}: {:<14} {}", address, entry.mnemonic, self.regs);

        let timing = (entry.handler)(self, bus, operand);
        Ok(entry.cycles_for(timing))
    }
}
