use crate::machine::GameBoy;

/// Hooks called by the [`Emulator`](super::Emulator) as it steps.
///
/// All methods default to doing nothing.
pub trait StepObserver {
    /// After every machine step.
    fn on_step(&mut self, _machine: &GameBoy) {}

    /// Execution reached a breakpoint at `pc`; single-step mode is now on.
    fn on_breakpoint(&mut self, _machine: &GameBoy, _pc: u16) {}

    /// The boot ROM overlay was just unmapped, so code below 0x0100 changed.
    fn on_boot_rom_unmapped(&mut self, _machine: &GameBoy) {}
}
