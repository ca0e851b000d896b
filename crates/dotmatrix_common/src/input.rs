//! Joypad input shared between the core and frontends.
//!
//! Both groups are plain bitmasks where a set bit means "pressed". The core
//! inverts them into the active-low P1 register when a group is selected.

use std::collections::VecDeque;

use bitflags::bitflags;

bitflags! {
    /// D-pad lines, in P1 bit order (P10..P13).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        const RIGHT = 1 << 0;
        const LEFT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
    }
}

bitflags! {
    /// Action buttons, in P1 bit order (P10..P13).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Button: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const SELECT = 1 << 2;
        const START = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Direction { direction: Direction, pressed: bool },
    Button { button: Button, pressed: bool },
}

/// Something the orchestrator can poll for joypad events once per time slice.
pub trait InputSource {
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// FIFO input source. Frontends push translated key events and the
/// orchestrator drains them on its next tick.
#[derive(Debug, Default)]
pub struct QueuedInput {
    events: VecDeque<InputEvent>,
}

impl QueuedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputSource for QueuedInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }
}
