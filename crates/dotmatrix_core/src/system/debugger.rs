pub const MAX_BREAKPOINTS: usize = 16;

/// Number of recently executed instruction addresses kept.
pub const HISTORY_SIZE: usize = 8;

/// Breakpoints, single-step control and a short execution history.
#[derive(Debug, Default)]
pub struct Debugger {
    breakpoints: Vec<u16>,
    single_step: bool,
    step_requested: bool,
    history: [Option<u16>; HISTORY_SIZE],
    head: usize,
}

impl Debugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a breakpoint. Returns false if the table is full.
    pub fn add_breakpoint(&mut self, addr: u16) -> bool {
        if self.breakpoints.contains(&addr) {
            return true;
        }
        if self.breakpoints.len() >= MAX_BREAKPOINTS {
            log::warn!("breakpoint table full, ignoring 0x{:04X}", addr);
            return false;
        }
        self.breakpoints.push(addr);
        true
    }

    /// Remove the breakpoint at `addr` if set, otherwise set it. Returns
    /// whether a breakpoint is set at `addr` afterwards.
    pub fn toggle_breakpoint(&mut self, addr: u16) -> bool {
        if let Some(pos) = self.breakpoints.iter().position(|&bp| bp == addr) {
            self.breakpoints.swap_remove(pos);
            return false;
        }
        self.add_breakpoint(addr)
    }

    #[inline]
    pub fn has_breakpoint(&self, addr: u16) -> bool {
        self.breakpoints.contains(&addr)
    }

    pub fn breakpoints(&self) -> &[u16] {
        &self.breakpoints
    }

    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    #[inline]
    pub fn single_step(&self) -> bool {
        self.single_step
    }

    pub fn enable_single_step(&mut self) {
        self.single_step = true;
    }

    pub fn toggle_single_step(&mut self) {
        self.single_step = !self.single_step;
        self.step_requested = false;
    }

    /// Let the next tick execute exactly one step while in single-step mode.
    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    pub(super) fn take_step_request(&mut self) -> bool {
        std::mem::take(&mut self.step_requested)
    }

    pub(super) fn record(&mut self, pc: u16) {
        self.history[self.head] = Some(pc);
        self.head = (self.head + 1) % HISTORY_SIZE;
    }

    /// Recently executed instruction addresses, oldest first.
    pub fn recent(&self) -> Vec<u16> {
        (0..HISTORY_SIZE)
            .filter_map(|i| self.history[(self.head + i) % HISTORY_SIZE])
            .collect()
    }
}
