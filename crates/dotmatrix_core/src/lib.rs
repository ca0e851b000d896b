pub mod cpu;
pub mod error;
pub mod machine;
pub mod system;

pub use error::CoreError;
pub use machine::GameBoy;
pub use system::{Emulator, SystemConfig, TickReport};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
