//! Wall-clock driven orchestration of a [`GameBoy`].
//!
//! The emulator is advanced in time slices: each [`Emulator::tick`] turns a
//! millisecond delta into a cycle budget and steps the machine until the
//! budget is spent. Debugger state, observers and the input source live
//! here rather than in the machine so several emulators can coexist.

mod config;
mod debugger;
mod observer;
mod speed;

use dotmatrix_common::input::{InputEvent, InputSource};

pub use config::{SystemConfig, DMG_CLOCK_HZ};
pub use debugger::{Debugger, HISTORY_SIZE, MAX_BREAKPOINTS};
pub use observer::StepObserver;
pub use speed::SpeedMeter;

use crate::error::CoreError;
use crate::machine::GameBoy;

/// Outcome of one [`Emulator::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Cycle budget for this slice, after clamping.
    pub budget: u64,
    /// Cycles actually executed during this call.
    pub cycles_run: u64,
    /// The budget hit the `max_slice_ms` ceiling.
    pub clamped: bool,
    /// Emulation speed, reported when a measurement window closes.
    pub speed: Option<f32>,
}

pub struct Emulator {
    machine: GameBoy,
    config: SystemConfig,
    debugger: Debugger,
    observers: Vec<Box<dyn StepObserver>>,
    input: Option<Box<dyn InputSource>>,
    /// Cycles executed beyond the previous slice's budget.
    cycle_debt: u64,
    speed: SpeedMeter,
}

impl Emulator {
    pub fn new(machine: GameBoy, config: SystemConfig) -> Self {
        let speed = SpeedMeter::new(&config);
        Self {
            machine,
            config,
            debugger: Debugger::default(),
            observers: Vec::new(),
            input: None,
            cycle_debt: 0,
            speed,
        }
    }

    #[inline]
    pub fn machine(&self) -> &GameBoy {
        &self.machine
    }

    #[inline]
    pub fn machine_mut(&mut self) -> &mut GameBoy {
        &mut self.machine
    }

    #[inline]
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    #[inline]
    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    #[inline]
    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    /// Speed ratio of the last completed measurement window.
    #[inline]
    pub fn last_speed(&self) -> Option<f32> {
        self.speed.last()
    }

    pub fn add_observer(&mut self, observer: Box<dyn StepObserver>) {
        self.observers.push(observer);
    }

    pub fn set_input_source(&mut self, input: Box<dyn InputSource>) {
        self.input = Some(input);
    }

    /// Advance emulation by `dt_ms` milliseconds of wall-clock time.
    ///
    /// In single-step mode only a pending [`Debugger::request_step`] is
    /// honoured and `dt_ms` is ignored.
    pub fn tick(&mut self, dt_ms: u32) -> Result<TickReport, CoreError> {
        self.poll_input();

        if self.debugger.single_step() {
            if !self.debugger.take_step_request() {
                return Ok(TickReport::default());
            }
            let cycles = self.step()? as u64;
            return Ok(TickReport {
                cycles_run: cycles,
                ..TickReport::default()
            });
        }

        if dt_ms == 0 {
            return Ok(TickReport::default());
        }

        let mut budget = self.config.cycles_per_ms() * dt_ms as u64;
        let ceiling = self.config.max_slice_cycles();
        let clamped = budget > ceiling;
        if clamped {
            log::warn!(
                "capping slice of {} ms to {} ms ({} cycles)",
                dt_ms,
                self.config.max_slice_ms,
                ceiling
            );
            budget = ceiling;
        }

        let mut elapsed = self.cycle_debt;
        let mut cycles_run = 0u64;
        // A breakpoint hit switches to single-step mode and ends the slice.
        while elapsed < budget && !self.debugger.single_step() {
            let cycles = self.step()? as u64;
            elapsed += cycles;
            cycles_run += cycles;
        }
        self.cycle_debt = elapsed.saturating_sub(budget);

        let speed = self.speed.record(dt_ms, budget);

        Ok(TickReport {
            budget,
            cycles_run,
            clamped,
            speed,
        })
    }

    /// Run one machine step and dispatch debugger and observer hooks.
    fn step(&mut self) -> Result<u32, CoreError> {
        let pc = self.machine.cpu.regs.pc;
        let boot_was_mapped = self.machine.boot_rom_mapped();

        let cycles = self.machine.step()?;
        self.debugger.record(pc);

        for observer in &mut self.observers {
            observer.on_step(&self.machine);
        }

        if boot_was_mapped && !self.machine.boot_rom_mapped() {
            for observer in &mut self.observers {
                observer.on_boot_rom_unmapped(&self.machine);
            }
        }

        let next = self.machine.cpu.regs.pc;
        if self.debugger.has_breakpoint(next) {
            log::info!("breakpoint hit at 0x{:04X}", next);
            self.debugger.enable_single_step();
            for observer in &mut self.observers {
                observer.on_breakpoint(&self.machine, next);
            }
        }

        Ok(cycles)
    }

    fn poll_input(&mut self) {
        let Some(input) = self.input.as_mut() else {
            return;
        };
        for event in input.poll_events() {
            match event {
                InputEvent::Direction { direction, pressed } => {
                    self.machine.press_direction(direction, pressed)
                }
                InputEvent::Button { button, pressed } => {
                    self.machine.press_button(button, pressed)
                }
            }
        }
    }
}
