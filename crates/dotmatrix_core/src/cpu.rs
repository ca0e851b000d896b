//! Sharp SM83 CPU core.
//!
//! The CPU is table-driven: [`table`] maps each opcode to a handler plus its
//! cycle costs, and [`Cpu::step`] runs one interrupt dispatch or one
//! instruction per call.

mod alu;
mod bus;
mod cb;
pub mod disasm;
mod exec;
mod helpers;
pub mod interrupts;
mod regs;
mod step;
mod table;

pub use bus::Bus;
pub use interrupts::{Interrupt, DMG_INTERRUPT_VECTORS};
pub use regs::{Flag, FlagSet, RegisterPair, Registers};
pub use step::IDLE_CYCLES;
pub use table::UNDEFINED_OPCODES;

/// Execution state of the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    /// Entered by HALT; left when an enabled interrupt becomes pending.
    Halted,
    /// Entered by STOP; left when a joypad line reads low.
    Stopped,
}

pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    /// Set by EI; IME is raised after the next instruction completes.
    ei_pending: bool,
    state: RunState,
    vectors: [u16; 5],
}

impl Cpu {
    /// Create a CPU that starts executing at `start_address` and dispatches
    /// interrupts through `vectors` (indexed by [`Interrupt::index`]).
    pub fn new(start_address: u16, vectors: [u16; 5]) -> Self {
        let mut regs = Registers::default();
        regs.pc = start_address;
        Self {
            regs,
            ime: false,
            ei_pending: false,
            state: RunState::Running,
            vectors,
        }
    }

    /// CPU state as the DMG boot ROM leaves it when jumping to 0x0100.
    pub fn post_boot() -> Self {
        Self {
            regs: Registers::dmg_post_boot(),
            ..Self::new(0x0100, DMG_INTERRUPT_VECTORS)
        }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.state == RunState::Halted
    }

    #[inline]
    pub fn ei_pending(&self) -> bool {
        self.ei_pending
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new(0x0000, DMG_INTERRUPT_VECTORS)
    }
}

#[cfg(test)]
mod tests;
