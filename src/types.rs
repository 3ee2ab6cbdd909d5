//! Core types for the configuration menu and engine settings.

use crate::colors::LedColor;

/// A configuration menu category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Category {
    /// Per-LED countdown duration, an index into the unit table.
    Duration = 0,

    /// What the strip does with LEDs that have run out.
    Effect = 1,

    /// Color of the countdown LEDs.
    Color = 2,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 3;

    /// All categories in menu order.
    pub const ALL: [Category; Category::COUNT] =
        [Category::Duration, Category::Effect, Category::Color];

    /// Position of the category in the option vector.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The category at `index`, wrapping modulo [`Category::COUNT`].
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Category::ALL[index % Category::COUNT]
    }

    /// The category following this one in menu order.
    #[inline]
    pub const fn next(self) -> Self {
        Category::from_index(self.index() + 1)
    }

    /// Color used by the menu to show which category is being edited.
    pub const fn menu_color(self) -> LedColor {
        match self {
            Category::Duration => LedColor::Blue,
            Category::Effect => LedColor::Yellow,
            Category::Color => LedColor::Green,
        }
    }
}

/// End-of-countdown effect applied to LEDs that are no longer lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Expired LEDs simply turn off.
    SwitchOff = 0,

    /// Expired LEDs blink red at a fast rate.
    FastBlink = 1,

    /// The LED currently running out dims linearly over its unit.
    FadeOut = 2,
}

impl Effect {
    /// Number of selectable effects.
    pub const COUNT: u8 = 3;

    /// Maps a menu option to an effect. Out-of-range options fall back to
    /// `SwitchOff`.
    pub const fn from_option(option: u8) -> Self {
        match option {
            1 => Effect::FastBlink,
            2 => Effect::FadeOut,
            _ => Effect::SwitchOff,
        }
    }
}

/// Engine settings validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// No countdown unit was provided.
    EmptyUnitTable,

    /// A countdown unit of zero milliseconds.
    ZeroDurationUnit,

    /// Unit table capacity exceeded.
    CapacityExceeded,

    /// Control period of zero milliseconds.
    ZeroControlPeriod,

    /// A blink frequency that is zero, negative or not a number.
    InvalidBlinkFrequency,

    /// A countdown, alarm or long press longer than the clock can measure.
    ExceedsClockRange,
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::EmptyUnitTable => {
                write!(f, "unit table must have at least one countdown unit")
            }
            SettingsError::ZeroDurationUnit => {
                write!(f, "countdown units must be longer than zero milliseconds")
            }
            SettingsError::CapacityExceeded => {
                write!(f, "unit table capacity exceeded")
            }
            SettingsError::ZeroControlPeriod => {
                write!(f, "control period must be longer than zero milliseconds")
            }
            SettingsError::InvalidBlinkFrequency => {
                write!(f, "blink frequencies must be positive")
            }
            SettingsError::ExceedsClockRange => {
                write!(f, "timings exceed the range of the clock")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}
