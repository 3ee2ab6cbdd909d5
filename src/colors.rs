//! Fixed LED color palette.
//!
//! Every color the engine can show is one of the [`LedColor`] variants. The
//! mapping to RGB triples is a fixed table; intensity scaling happens when a
//! logical LED is turned into a pixel.

use palette::Srgb;

/// An 8-bit RGB triple as written to the strip.
pub type Rgb8 = Srgb<u8>;

/// Pixel value of an unlit LED.
pub const RGB_OFF: Rgb8 = Srgb::new(0, 0, 0);

/// Colors available to the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    Off,
    Red,
    Blue,
    Green,
    Yellow,
    White,
}

impl LedColor {
    /// Number of colors selectable in the configuration menu.
    pub const SELECTABLE: u8 = 4;

    /// Maps a color-category menu option to a color. Out-of-range options fall
    /// back to `Blue`.
    pub const fn from_option(option: u8) -> Self {
        match option {
            1 => LedColor::Green,
            2 => LedColor::Yellow,
            3 => LedColor::White,
            _ => LedColor::Blue,
        }
    }

    /// Color-category menu option of a selectable color, the inverse of
    /// [`from_option`](LedColor::from_option). `None` for colors the menu
    /// cannot select.
    pub const fn option(self) -> Option<u8> {
        match self {
            LedColor::Blue => Some(0),
            LedColor::Green => Some(1),
            LedColor::Yellow => Some(2),
            LedColor::White => Some(3),
            LedColor::Off | LedColor::Red => None,
        }
    }

    /// Full-intensity RGB value.
    pub const fn rgb(self) -> Rgb8 {
        match self {
            LedColor::Off => RGB_OFF,
            LedColor::Red => Srgb::new(255, 0, 0),
            LedColor::Blue => Srgb::new(0, 0, 255),
            LedColor::Green => Srgb::new(0, 255, 0),
            LedColor::Yellow => Srgb::new(255, 255, 0),
            LedColor::White => Srgb::new(255, 255, 255),
        }
    }

    /// RGB value scaled by `intensity` (255 is full brightness).
    pub fn scaled(self, intensity: u8) -> Rgb8 {
        let rgb = self.rgb();
        Srgb::new(
            scale_channel(rgb.red, intensity),
            scale_channel(rgb.green, intensity),
            scale_channel(rgb.blue, intensity),
        )
    }
}

#[inline]
fn scale_channel(channel: u8, intensity: u8) -> u8 {
    ((u16::from(channel) * u16::from(intensity)) / 255) as u8
}
