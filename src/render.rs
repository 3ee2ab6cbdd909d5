//! Per-state render pipeline.
//!
//! [`render`] is a pure function of the machine state, time-in-state, the
//! saved pause time and the configuration. It produces a logical [`Frame`]
//! where LED 0 is the one that stays lit longest during a countdown. The
//! strip is wired the other way round, so [`Frame::present`] writes logical
//! LED `i` to physical pixel `N-1-i`.

use crate::colors::{LedColor, RGB_OFF, Rgb8};
use crate::config::Configuration;
use crate::fsm::State;
use crate::settings::Settings;
use crate::time::Millis;
use crate::types::Effect;
use crate::MAX_PIXELS;
use heapless::Vec;

/// Trait for abstracting addressable LED strip hardware.
///
/// Implementations buffer pixel writes and latch them on [`show`](LedStrip::show).
/// Handle any hardware errors internally - these methods cannot fail.
pub trait LedStrip {
    /// Turns every pixel in the buffer off.
    fn clear(&mut self);

    /// Writes one pixel into the buffer.
    fn set_pixel(&mut self, index: usize, color: Rgb8);

    /// Sends the buffer to the strip.
    fn show(&mut self);
}

/// One logical LED of the countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Led {
    /// Whether the LED is lit this frame.
    pub on: bool,
    /// Position in countdown order.
    pub index: usize,
    /// Brightness, 0 to 255.
    pub intensity: u8,
    /// Unscaled color.
    pub color: LedColor,
    /// Color scaled by intensity, black when off.
    pub rgb: Rgb8,
}

impl Led {
    const fn dark(index: usize) -> Self {
        Self {
            on: false,
            index,
            intensity: 0,
            color: LedColor::Off,
            rgb: RGB_OFF,
        }
    }
}

/// A full logical frame of `pixel_count` LEDs.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    leds: Vec<Led, MAX_PIXELS>,
}

impl Frame {
    /// Creates a frame with every LED off. `len` is clamped to `MAX_PIXELS`.
    pub fn dark(len: usize) -> Self {
        let mut leds = Vec::new();
        for index in 0..len.min(MAX_PIXELS) {
            let _ = leds.push(Led::dark(index));
        }
        Self { leds }
    }

    /// Number of logical LEDs.
    pub fn len(&self) -> usize {
        self.leds.len()
    }

    /// Returns true if the frame has no LEDs.
    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    /// All logical LEDs in countdown order.
    pub fn leds(&self) -> &[Led] {
        &self.leds
    }

    /// Logical LED at `index`.
    pub fn get(&self, index: usize) -> Option<&Led> {
        self.leds.get(index)
    }

    /// Number of LEDs that are on.
    pub fn lit_count(&self) -> usize {
        self.leds.iter().filter(|led| led.on).count()
    }

    /// Physical pixel index of logical LED `index`, which must be in range.
    fn physical_index(&self, index: usize) -> usize {
        self.leds.len() - 1 - index
    }

    /// Turns a logical LED on. Out-of-range indices are ignored.
    pub fn light(&mut self, index: usize, color: LedColor, intensity: u8) {
        if let Some(led) = self.leds.get_mut(index) {
            led.on = true;
            led.intensity = intensity;
            led.color = color;
            led.rgb = color.scaled(intensity);
        }
    }

    /// Clears the strip, writes every lit LED at its physical index and
    /// latches the frame.
    pub fn present<S: LedStrip>(&self, strip: &mut S) {
        strip.clear();
        for led in self.leds.iter().filter(|led| led.on) {
            strip.set_pixel(self.physical_index(led.index), led.rgb);
        }
        strip.show();
    }
}

/// Square wave at `frequency` Hz, true during the first half of each period.
///
/// The period is truncated to whole milliseconds and `t` is compared against
/// half of it, so odd periods are on for one millisecond longer than they are
/// off.
pub fn blink(t: Millis, frequency: f32) -> bool {
    let period = (1000.0 / frequency) as u32;
    if period == 0 {
        return true;
    }
    ((t.as_millis() % period) as f32) < period as f32 / 2.0
}

/// True if logical LED `index` is still running at `elapsed` into a countdown.
#[inline]
pub fn countdown_lit(index: usize, elapsed: Millis, unit: Millis) -> bool {
    elapsed < unit.saturating_mul(index as u32 + 1)
}

/// Builds the logical frame for a machine snapshot.
pub fn render(
    state: State,
    time_in_state: Millis,
    prev_tis: Millis,
    config: &Configuration,
    settings: &Settings,
) -> Frame {
    let mut frame = Frame::dark(settings.pixel_count());
    let rates = settings.blink_rates();
    let base = settings.base_intensity();
    let unit = settings.unit(config.duration_index());

    match state {
        State::Start => {}
        State::Countdown => render_countdown(&mut frame, time_in_state, unit, config, settings),
        State::Blink => {
            if blink(time_in_state, rates.alarm) {
                for index in 0..frame.len() {
                    frame.light(index, LedColor::Red, base);
                }
            }
        }
        State::Freeze => {
            if blink(time_in_state, rates.freeze) {
                for index in 0..frame.len() {
                    if countdown_lit(index, prev_tis, unit) {
                        frame.light(index, config.color(), base);
                    }
                }
            }
        }
        State::Config => render_menu(&mut frame, time_in_state, config, settings),
    }

    frame
}

fn render_countdown(
    frame: &mut Frame,
    elapsed: Millis,
    unit: Millis,
    config: &Configuration,
    settings: &Settings,
) {
    let base = settings.base_intensity();
    let effect = config.effect();
    let fast_on = blink(elapsed, settings.blink_rates().fast);

    for index in 0..frame.len() {
        if countdown_lit(index, elapsed, unit) {
            let running_out = elapsed >= unit.saturating_mul(index as u32);
            let intensity = if effect == Effect::FadeOut && running_out {
                fade(base, index, elapsed, unit)
            } else {
                base
            };
            frame.light(index, config.color(), intensity);
        } else if effect == Effect::FastBlink && fast_on {
            frame.light(index, LedColor::Red, base);
        }
    }
}

/// `base * ((index + 1) - elapsed / unit)`, truncated.
fn fade(base: u8, index: usize, elapsed: Millis, unit: Millis) -> u8 {
    let remaining = (index + 1) as f32 - elapsed.as_millis() as f32 / unit.as_millis() as f32;
    (f32::from(base) * remaining) as u8
}

/// Logical LED of the blinking menu indicator: the last physical pixel.
const MENU_INDICATOR: usize = 0;

fn render_menu(frame: &mut Frame, elapsed: Millis, config: &Configuration, settings: &Settings) {
    let category = config.active_category();
    let color = category.menu_color();
    let base = settings.base_intensity();

    // Option bar of `option + 1` LEDs, after the indicator
    let bar_end = (MENU_INDICATOR + 1 + usize::from(config.active_option()) + 1).min(frame.len());
    for index in MENU_INDICATOR + 1..bar_end {
        frame.light(index, color, base);
    }

    if blink(elapsed, settings.blink_rates().menu) {
        frame.light(MENU_INDICATOR, color, base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blink_two_hertz_halves() {
        for t in 0..250 {
            assert!(blink(Millis(t), 2.0), "t = {t}");
        }
        for t in 250..500 {
            assert!(!blink(Millis(t), 2.0), "t = {t}");
        }
        assert!(blink(Millis(500), 2.0));
        assert!(!blink(Millis(999), 2.0));
    }

    #[test]
    fn blink_odd_period_truncates() {
        // 3 Hz -> 333 ms period, on while t % 333 < 166.5
        assert!(blink(Millis(166), 3.0));
        assert!(!blink(Millis(167), 3.0));
        assert!(blink(Millis(333), 3.0));
    }

    #[test]
    fn fade_is_linear_over_the_unit() {
        assert_eq!(fade(255, 0, Millis(0), Millis(1000)), 255);
        assert_eq!(fade(255, 0, Millis(500), Millis(1000)), 127);
        assert_eq!(fade(255, 2, Millis(2750), Millis(1000)), 63);
    }

    #[test]
    fn dark_frame_has_requested_length() {
        let frame = Frame::dark(3);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.lit_count(), 0);
        assert_eq!(frame.physical_index(0), 2);
        assert_eq!(Frame::dark(MAX_PIXELS + 10).len(), MAX_PIXELS);
    }
}
