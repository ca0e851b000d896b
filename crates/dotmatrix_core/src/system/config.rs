use typed_builder::TypedBuilder;

/// DMG master clock in T-cycles per second.
pub const DMG_CLOCK_HZ: u64 = 4_194_304;

/// Pacing policy for the [`Emulator`](super::Emulator).
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct SystemConfig {
    #[builder(default = DMG_CLOCK_HZ)]
    pub clock_hz: u64,
    /// Longest wall-clock slice executed in one tick; larger deltas are
    /// clamped so a stalled host does not trigger a catch-up spiral.
    #[builder(default = 500)]
    pub max_slice_ms: u32,
    /// Speed ratio under which a warning is logged.
    #[builder(default = 0.99)]
    pub speed_warning_threshold: f32,
    #[builder(default = 1000)]
    pub speed_window_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SystemConfig {
    #[inline]
    pub fn cycles_per_ms(&self) -> u64 {
        self.clock_hz / 1000
    }

    #[inline]
    pub fn max_slice_cycles(&self) -> u64 {
        self.cycles_per_ms() * self.max_slice_ms as u64
    }
}
