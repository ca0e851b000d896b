use super::SystemConfig;

/// Measures emulated time against wall-clock time over a fixed window.
#[derive(Debug)]
pub struct SpeedMeter {
    clock_hz: u64,
    window_ms: u32,
    threshold: f32,
    elapsed_ms: u32,
    cycles: u64,
    last: Option<f32>,
}

impl SpeedMeter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            clock_hz: config.clock_hz,
            window_ms: config.speed_window_ms,
            threshold: config.speed_warning_threshold,
            elapsed_ms: 0,
            cycles: 0,
            last: None,
        }
    }

    /// Account for a slice of `dt_ms` that was given `cycles` of budget.
    /// Returns the speed ratio whenever a window closes.
    pub fn record(&mut self, dt_ms: u32, cycles: u64) -> Option<f32> {
        self.elapsed_ms += dt_ms;
        self.cycles += cycles;
        if self.elapsed_ms < self.window_ms {
            return None;
        }

        let expected = self.clock_hz as f64 * self.elapsed_ms as f64 / 1000.0;
        let speed = (self.cycles as f64 / expected) as f32;
        self.elapsed_ms = 0;
        self.cycles = 0;
        self.last = Some(speed);

        if speed < self.threshold {
            log::warn!("emulation speed {:.2}", speed);
        }
        Some(speed)
    }

    /// Result of the most recently closed window.
    #[inline]
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}
