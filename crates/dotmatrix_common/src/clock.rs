use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond time source used only for pacing.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `Instant`, counting from construction.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock advanced by hand. Handy for deterministic pacing tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Turns successive clock readings into per-slice deltas.
#[derive(Debug)]
pub struct Pacer<C: Clock> {
    clock: C,
    last_ms: u64,
}

impl<C: Clock> Pacer<C> {
    pub fn new(clock: C) -> Self {
        let last_ms = clock.now_ms();
        Self { clock, last_ms }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Milliseconds elapsed since the previous call (or construction).
    pub fn delta_ms(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let dt = now.saturating_sub(self.last_ms);
        self.last_ms = now;
        dt.min(u32::MAX as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_reports_deltas_between_readings() {
        let mut pacer = Pacer::new(ManualClock::new(100));
        assert_eq!(pacer.delta_ms(), 0);
        pacer.clock().advance(16);
        assert_eq!(pacer.delta_ms(), 16);
        pacer.clock().advance(1);
        pacer.clock().advance(2);
        assert_eq!(pacer.delta_ms(), 3);
    }
}
