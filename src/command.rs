//! Single-character commands from the serial channel.

use crate::colors::LedColor;
use crate::types::{Category, Effect};

/// A decoded command symbol.
///
/// Commands are level-triggered: a symbol is active for exactly the cycle it
/// was read in, and a source that keeps sending it fires the event again on
/// every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// No symbol this cycle, or an unrecognized one.
    #[default]
    NoOp,
    /// `g`: same as a Go press.
    Go,
    /// `p`: pause the countdown.
    Pause,
    /// `r`: resume a paused countdown.
    Resume,
    /// `e`: leave the menu discarding edits.
    Cancel,
    /// `s`: leave the menu keeping edits.
    Save,
    /// `c`: open the menu.
    Config,
    /// `m`: same as a More press or release.
    More,
    /// `1`, `2`, `5`, `A`: select a countdown unit.
    SetDuration(u8),
    /// `o`, `b`, `f`: select an end-of-countdown effect.
    SetEffect(Effect),
    /// `B`, `G`, `Y`, `W`: select the countdown color.
    SetColor(LedColor),
}

impl Command {
    /// Decodes a raw symbol. Unknown symbols decode to `NoOp`.
    pub const fn from_symbol(symbol: u8) -> Self {
        match symbol {
            b'g' => Command::Go,
            b'p' => Command::Pause,
            b'r' => Command::Resume,
            b'e' => Command::Cancel,
            b's' => Command::Save,
            b'c' => Command::Config,
            b'm' => Command::More,
            b'1' => Command::SetDuration(0),
            b'2' => Command::SetDuration(1),
            b'5' => Command::SetDuration(2),
            b'A' => Command::SetDuration(3),
            b'o' => Command::SetEffect(Effect::SwitchOff),
            b'b' => Command::SetEffect(Effect::FastBlink),
            b'f' => Command::SetEffect(Effect::FadeOut),
            b'B' => Command::SetColor(LedColor::Blue),
            b'G' => Command::SetColor(LedColor::Green),
            b'Y' => Command::SetColor(LedColor::Yellow),
            b'W' => Command::SetColor(LedColor::White),
            _ => Command::NoOp,
        }
    }

    /// Decodes an optional reading, treating `None` as `NoOp`.
    pub const fn from_reading(reading: Option<u8>) -> Self {
        match reading {
            Some(symbol) => Command::from_symbol(symbol),
            None => Command::NoOp,
        }
    }

    /// For direct-set commands, the category they target and the option value
    /// they select.
    pub const fn direct_set(self) -> Option<(Category, u8)> {
        match self {
            Command::SetDuration(index) => Some((Category::Duration, index)),
            Command::SetEffect(effect) => Some((Category::Effect, effect as u8)),
            Command::SetColor(color) => match color.option() {
                Some(option) => Some((Category::Color, option)),
                None => None,
            },
            _ => None,
        }
    }
}

/// A source of command symbols, such as a UART receive buffer.
pub trait CommandSource {
    /// Returns the next pending symbol, or `None` if nothing arrived.
    ///
    /// Called at most once per control cycle.
    fn read_symbol(&mut self) -> Option<u8>;
}
