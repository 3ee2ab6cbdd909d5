//! Shared test infrastructure for strip-countdown integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use heapless::Deque;
use strip_countdown::{
    Button, ButtonPins, CommandSource, Inputs, LedStrip, MAX_PIXELS, Millis, Rgb8, Settings,
    Ticks16, Ticks32, TimeSource,
};

// ============================================================================
// Mock Time Sources
// ============================================================================

/// Mock 32-bit clock with controllable time
pub struct MockClock {
    current_time: core::cell::Cell<Ticks32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(Ticks32(0)),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Ticks32(current.0.wrapping_add(millis)));
    }

    pub fn set_time(&self, time: Ticks32) {
        self.current_time.set(time);
    }
}

impl TimeSource<Ticks32> for MockClock {
    fn now(&self) -> Ticks32 {
        self.current_time.get()
    }
}

/// Mock 16-bit clock, for rollover tests
pub struct MockClock16 {
    current_time: core::cell::Cell<Ticks16>,
}

impl MockClock16 {
    pub fn starting_at(millis: u16) -> Self {
        Self {
            current_time: core::cell::Cell::new(Ticks16(millis)),
        }
    }

    pub fn advance(&self, millis: u16) {
        let current = self.current_time.get();
        self.current_time.set(Ticks16(current.0.wrapping_add(millis)));
    }
}

impl TimeSource<Ticks16> for MockClock16 {
    fn now(&self) -> Ticks16 {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Buttons
// ============================================================================

/// Active-low buttons: the pin reads low while pressed
#[derive(Default)]
pub struct MockPins {
    pressed: [bool; 3],
}

impl MockPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button) {
        self.pressed[button as usize] = true;
    }

    pub fn release(&mut self, button: Button) {
        self.pressed[button as usize] = false;
    }
}

impl ButtonPins for MockPins {
    fn read_level(&mut self, button: Button) -> bool {
        !self.pressed[button as usize]
    }
}

// ============================================================================
// Mock Command Source
// ============================================================================

/// Queued serial symbols, one consumed per read
pub struct MockCommands {
    queue: Deque<u8, 32>,
    reads: usize,
}

impl MockCommands {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
            reads: 0,
        }
    }

    pub fn send(&mut self, symbols: &[u8]) {
        for symbol in symbols {
            let _ = self.queue.push_back(*symbol);
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl CommandSource for MockCommands {
    fn read_symbol(&mut self) -> Option<u8> {
        self.reads += 1;
        self.queue.pop_front()
    }
}

// ============================================================================
// Mock LED Strip
// ============================================================================

const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

/// Strip that keeps a write buffer and the last latched frame
pub struct MockStrip {
    buffer: [Rgb8; MAX_PIXELS],
    shown: [Rgb8; MAX_PIXELS],
    show_count: usize,
    writes: usize,
}

impl MockStrip {
    pub fn new() -> Self {
        Self {
            buffer: [BLACK; MAX_PIXELS],
            shown: [BLACK; MAX_PIXELS],
            show_count: 0,
            writes: 0,
        }
    }

    /// Pixel as last latched by `show`
    pub fn pixel(&self, index: usize) -> Rgb8 {
        self.shown[index]
    }

    pub fn show_count(&self) -> usize {
        self.show_count
    }

    /// Pixel writes since the last `clear`
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl LedStrip for MockStrip {
    fn clear(&mut self) {
        self.buffer = [BLACK; MAX_PIXELS];
        self.writes = 0;
    }

    fn set_pixel(&mut self, index: usize, color: Rgb8) {
        self.buffer[index] = color;
        self.writes += 1;
    }

    fn show(&mut self) {
        self.shown = self.buffer;
        self.show_count += 1;
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Settings with `pixels` LEDs and a three-entry unit table starting at
/// `unit`, so duration option 0 selects `unit`
pub fn settings_with(pixels: usize, unit: u32) -> Settings {
    Settings::builder()
        .pixel_count(pixels)
        .units(&[Millis(unit), Millis(unit * 2), Millis(unit * 5)])
        .unwrap()
        .build()
        .unwrap()
}

pub fn go() -> Inputs {
    Inputs {
        go_rising: true,
        ..Inputs::default()
    }
}

pub fn esc() -> Inputs {
    Inputs {
        esc_rising: true,
        ..Inputs::default()
    }
}

pub fn more_pressed() -> Inputs {
    Inputs {
        more_rising: true,
        more_held: true,
        ..Inputs::default()
    }
}

pub fn more_held() -> Inputs {
    Inputs {
        more_held: true,
        ..Inputs::default()
    }
}

pub fn more_released() -> Inputs {
    Inputs {
        more_falling: true,
        ..Inputs::default()
    }
}

pub fn idle() -> Inputs {
    Inputs::default()
}
