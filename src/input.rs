//! Button sampling and per-cycle edge detection.

use crate::command::{Command, CommandSource};

/// One of the three momentary buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Starts the countdown, skips to the alarm, or advances a menu option.
    Go = 0,
    /// Pauses or resumes the countdown, or cancels the menu.
    Esc = 1,
    /// Skips one unit, switches menu category, or opens the menu when held.
    More = 2,
}

impl Button {
    /// All buttons in sampling order.
    pub const ALL: [Button; 3] = [Button::Go, Button::Esc, Button::More];
}

/// Trait for abstracting button GPIO.
///
/// Buttons are wired active-low with pull-ups: the pin reads high while the
/// button is released. Implementations return the raw level; the sampler does
/// the inversion.
pub trait ButtonPins {
    /// Returns the raw pin level of `button` (`true` = high = released).
    fn read_level(&mut self, button: Button) -> bool;
}

/// Everything the controller consumes from one input sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    /// Go was pressed since the previous sample.
    pub go_rising: bool,
    /// Esc was pressed since the previous sample.
    pub esc_rising: bool,
    /// More was pressed since the previous sample.
    pub more_rising: bool,
    /// More was released since the previous sample.
    pub more_falling: bool,
    /// More is held down this cycle.
    pub more_held: bool,
    /// Command decoded from this cycle's symbol, `NoOp` if none.
    pub command: Command,
}

impl Inputs {
    /// Inputs carrying only a command, with every button idle.
    pub fn command(command: Command) -> Self {
        Self {
            command,
            ..Self::default()
        }
    }
}

/// Tracks current and previous button states across cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSampler {
    current: [bool; 3],
    previous: [bool; 3],
}

impl InputSampler {
    /// Creates a sampler with every button released.
    pub const fn new() -> Self {
        Self {
            current: [false; 3],
            previous: [false; 3],
        }
    }

    /// Reads all buttons once, shifting the last sample into the previous
    /// slot.
    pub fn sample<P: ButtonPins>(&mut self, pins: &mut P) {
        self.previous = self.current;
        for button in Button::ALL {
            self.current[button as usize] = !pins.read_level(button);
        }
    }

    /// Samples buttons and reads at most one command symbol, producing this
    /// cycle's inputs.
    pub fn poll<P: ButtonPins, C: CommandSource>(&mut self, pins: &mut P, commands: &mut C) -> Inputs {
        self.sample(pins);
        let command = Command::from_reading(commands.read_symbol());

        Inputs {
            go_rising: self.rising(Button::Go),
            esc_rising: self.rising(Button::Esc),
            more_rising: self.rising(Button::More),
            more_falling: self.falling(Button::More),
            more_held: self.is_pressed(Button::More),
            command,
        }
    }

    /// Button is pressed in the latest sample.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.current[button as usize]
    }

    /// Button went from released to pressed between the last two samples.
    pub fn rising(&self, button: Button) -> bool {
        !self.previous[button as usize] && self.current[button as usize]
    }

    /// Button went from pressed to released between the last two samples.
    pub fn falling(&self, button: Button) -> bool {
        self.previous[button as usize] && !self.current[button as usize]
    }
}
