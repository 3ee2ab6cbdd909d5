//! Static engine parameters fixed at start-up.

use crate::time::{Millis, TimeInstant};
use crate::types::SettingsError;
use crate::{MAX_PIXELS, MAX_UNITS};
use heapless::Vec;

/// Default number of LEDs in the countdown.
pub const DEFAULT_PIXEL_COUNT: usize = 5;
/// Default interval between control cycles.
pub const DEFAULT_CONTROL_PERIOD: Millis = Millis(50);
/// Default time the alarm blinks before returning to start.
pub const DEFAULT_BLINK_DURATION: Millis = Millis(1000);
/// Default hold time of More that opens or commits the menu.
pub const DEFAULT_LONG_PRESS: Millis = Millis(2000);
/// Default countdown unit table.
pub const DEFAULT_UNITS: [Millis; 4] = [Millis(1000), Millis(2000), Millis(5000), Millis(10000)];

fn default_units() -> Vec<Millis, MAX_UNITS> {
    let mut units = Vec::new();
    for unit in DEFAULT_UNITS {
        let _ = units.push(unit);
    }
    units
}

/// Blink rates, in hertz, for the animated parts of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkRates {
    /// Whole strip in the alarm state.
    pub alarm: f32,
    /// Expired LEDs with the fast-blink effect.
    pub fast: f32,
    /// Frozen LEDs while paused.
    pub freeze: f32,
    /// Menu indicator pixel.
    pub menu: f32,
}

impl Default for BlinkRates {
    fn default() -> Self {
        Self {
            alarm: 4.0,
            fast: 10.0,
            freeze: 1.0,
            menu: 2.0,
        }
    }
}

/// Validated engine settings.
///
/// Built once with [`Settings::builder`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pixel_count: usize,
    control_period: Millis,
    blink_duration: Millis,
    long_press: Millis,
    units: Vec<Millis, MAX_UNITS>,
    blink_rates: BlinkRates,
    base_intensity: u8,
}

impl Settings {
    /// Creates a new settings builder with the default values.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Number of LEDs in the countdown, within `1..=MAX_PIXELS`.
    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Interval between control cycles.
    pub fn control_period(&self) -> Millis {
        self.control_period
    }

    /// How long the alarm blinks before returning to start.
    pub fn blink_duration(&self) -> Millis {
        self.blink_duration
    }

    /// How long More must be held to open or commit the menu.
    pub fn long_press(&self) -> Millis {
        self.long_press
    }

    /// Number of selectable countdown units.
    pub fn unit_count(&self) -> u8 {
        self.units.len() as u8
    }

    /// Countdown unit for a duration option. Out-of-range indices use the last
    /// unit.
    pub fn unit(&self, index: usize) -> Millis {
        match self.units.get(index) {
            Some(unit) => *unit,
            None => self.units.last().copied().unwrap_or(DEFAULT_UNITS[0]),
        }
    }

    /// Blink rates for the animated parts of the frame.
    pub fn blink_rates(&self) -> BlinkRates {
        self.blink_rates
    }

    /// Full brightness used for lit LEDs.
    pub fn base_intensity(&self) -> u8 {
        self.base_intensity
    }

    /// Countdown length with the longest unit in the table.
    pub fn longest_countdown(&self) -> Millis {
        let longest = self.units.iter().copied().max().unwrap_or(Millis::ZERO);
        longest.saturating_mul(self.pixel_count as u32)
    }

    /// Checks that every timed phase ends before a clock of type `I` wraps.
    ///
    /// A phase is only noticed on the first cycle after it ends, so each
    /// duration gets one control period of headroom.
    ///
    /// # Errors
    /// Returns `ExceedsClockRange` if the longest countdown, the alarm or the
    /// long press cannot be measured with `I`.
    pub fn check_clock_range<I: TimeInstant>(&self) -> Result<(), SettingsError> {
        let fits = |duration: Millis| {
            duration.0.saturating_add(self.control_period.0) <= I::MAX_DURATION.0
        };

        if fits(self.longest_countdown()) && fits(self.blink_duration) && fits(self.long_press) {
            Ok(())
        } else {
            Err(SettingsError::ExceedsClockRange)
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pixel_count: DEFAULT_PIXEL_COUNT,
            control_period: DEFAULT_CONTROL_PERIOD,
            blink_duration: DEFAULT_BLINK_DURATION,
            long_press: DEFAULT_LONG_PRESS,
            units: default_units(),
            blink_rates: BlinkRates::default(),
            base_intensity: u8::MAX,
        }
    }
}

/// Builder for validated engine settings.
#[derive(Debug)]
pub struct SettingsBuilder {
    pixel_count: usize,
    control_period: Millis,
    blink_duration: Millis,
    long_press: Millis,
    units: Option<Vec<Millis, MAX_UNITS>>,
    blink_rates: BlinkRates,
    base_intensity: u8,
}

impl SettingsBuilder {
    /// Creates a builder with the default values.
    pub fn new() -> Self {
        Self {
            pixel_count: DEFAULT_PIXEL_COUNT,
            control_period: DEFAULT_CONTROL_PERIOD,
            blink_duration: DEFAULT_BLINK_DURATION,
            long_press: DEFAULT_LONG_PRESS,
            units: None,
            blink_rates: BlinkRates::default(),
            base_intensity: u8::MAX,
        }
    }

    /// Sets the number of LEDs. Clamped to `1..=MAX_PIXELS` on build.
    pub fn pixel_count(mut self, count: usize) -> Self {
        self.pixel_count = count;
        self
    }

    /// Sets the interval between control cycles.
    pub fn control_period(mut self, period: Millis) -> Self {
        self.control_period = period;
        self
    }

    /// Sets how long the alarm blinks.
    pub fn blink_duration(mut self, duration: Millis) -> Self {
        self.blink_duration = duration;
        self
    }

    /// Sets the hold time of More that opens or commits the menu.
    pub fn long_press(mut self, duration: Millis) -> Self {
        self.long_press = duration;
        self
    }

    /// Appends a countdown unit to the table.
    ///
    /// The first call replaces the default table. Three units give the
    /// three-option duration menu, four the four-option one.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the table already holds `MAX_UNITS`
    /// entries.
    pub fn unit(mut self, unit: Millis) -> Result<Self, SettingsError> {
        let units = self.units.get_or_insert_with(Vec::new);
        units
            .push(unit)
            .map_err(|_| SettingsError::CapacityExceeded)?;
        Ok(self)
    }

    /// Replaces the whole unit table.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if `units` has more than `MAX_UNITS` entries.
    pub fn units(mut self, units: &[Millis]) -> Result<Self, SettingsError> {
        let table = Vec::from_slice(units).map_err(|_| SettingsError::CapacityExceeded)?;
        self.units = Some(table);
        Ok(self)
    }

    /// Sets the blink rates.
    pub fn blink_rates(mut self, rates: BlinkRates) -> Self {
        self.blink_rates = rates;
        self
    }

    /// Sets the brightness of lit LEDs.
    pub fn base_intensity(mut self, intensity: u8) -> Self {
        self.base_intensity = intensity;
        self
    }

    /// Builds and validates the settings.
    ///
    /// # Errors
    /// * `EmptyUnitTable` - the unit table has no entries
    /// * `ZeroDurationUnit` - a unit is zero milliseconds
    /// * `ZeroControlPeriod` - the control period is zero
    /// * `InvalidBlinkFrequency` - a blink rate is not strictly positive
    pub fn build(self) -> Result<Settings, SettingsError> {
        let units = self.units.unwrap_or_else(default_units);

        if units.is_empty() {
            return Err(SettingsError::EmptyUnitTable);
        }

        if units.iter().any(|unit| *unit == Millis::ZERO) {
            return Err(SettingsError::ZeroDurationUnit);
        }

        if self.control_period == Millis::ZERO {
            return Err(SettingsError::ZeroControlPeriod);
        }

        let rates = self.blink_rates;
        // Written as !(x > 0) so NaN is rejected too
        if [rates.alarm, rates.fast, rates.freeze, rates.menu]
            .iter()
            .any(|hz| !(*hz > 0.0))
        {
            return Err(SettingsError::InvalidBlinkFrequency);
        }

        Ok(Settings {
            pixel_count: self.pixel_count.clamp(1, MAX_PIXELS),
            control_period: self.control_period,
            blink_duration: self.blink_duration,
            long_press: self.long_press,
            units,
            blink_rates: rates,
            base_intensity: self.base_intensity,
        })
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::builder().build().unwrap();
        assert_eq!(settings.pixel_count(), 5);
        assert_eq!(settings.control_period(), Millis(50));
        assert_eq!(settings.long_press(), Millis(2000));
        assert_eq!(settings.unit_count(), 4);
        assert_eq!(settings.unit(3), Millis(10000));
    }

    #[test]
    fn pixel_count_is_clamped() {
        let low = Settings::builder().pixel_count(0).build().unwrap();
        assert_eq!(low.pixel_count(), 1);
        let high = Settings::builder().pixel_count(500).build().unwrap();
        assert_eq!(high.pixel_count(), MAX_PIXELS);
    }

    #[test]
    fn custom_units_replace_defaults() {
        let settings = Settings::builder()
            .unit(Millis(500))
            .unwrap()
            .unit(Millis(1000))
            .unwrap()
            .unit(Millis(2000))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(settings.unit_count(), 3);
        assert_eq!(settings.unit(0), Millis(500));
        assert_eq!(settings.unit(7), Millis(2000));
    }

    #[test]
    fn rejects_empty_unit_table() {
        let result = Settings::builder().units(&[]).unwrap().build();
        assert!(matches!(result, Err(SettingsError::EmptyUnitTable)));
    }

    #[test]
    fn rejects_zero_unit() {
        let result = Settings::builder().unit(Millis(0)).unwrap().build();
        assert!(matches!(result, Err(SettingsError::ZeroDurationUnit)));
    }

    #[test]
    fn rejects_too_many_units() {
        let mut builder = Settings::builder();
        for _ in 0..MAX_UNITS {
            builder = builder.unit(Millis(100)).unwrap();
        }
        assert!(matches!(
            builder.unit(Millis(100)),
            Err(SettingsError::CapacityExceeded)
        ));
    }

    #[test]
    fn rejects_bad_blink_rate() {
        let rates = BlinkRates {
            freeze: 0.0,
            ..BlinkRates::default()
        };
        let result = Settings::builder().blink_rates(rates).build();
        assert!(matches!(result, Err(SettingsError::InvalidBlinkFrequency)));

        let result = Settings::builder().control_period(Millis::ZERO).build();
        assert!(matches!(result, Err(SettingsError::ZeroControlPeriod)));
    }

    #[test]
    fn longest_countdown_uses_largest_unit() {
        let settings = Settings::builder().pixel_count(8).build().unwrap();
        assert_eq!(settings.longest_countdown(), Millis(80_000));
    }

    #[test]
    fn sixteen_bit_clock_range_is_checked() {
        use crate::time::{Ticks16, Ticks32};

        let defaults = Settings::builder().build().unwrap();
        assert_eq!(defaults.check_clock_range::<Ticks16>(), Ok(()));

        let long = Settings::builder().pixel_count(8).build().unwrap();
        assert_eq!(
            long.check_clock_range::<Ticks16>(),
            Err(SettingsError::ExceedsClockRange)
        );
        assert_eq!(long.check_clock_range::<Ticks32>(), Ok(()));

        // Needs one control period of headroom below the wrap
        let edge = Settings::builder()
            .pixel_count(1)
            .units(&[Millis(65_486)])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            edge.check_clock_range::<Ticks16>(),
            Err(SettingsError::ExceedsClockRange)
        );

        let alarm = Settings::builder().blink_duration(Millis(70_000)).build().unwrap();
        assert_eq!(
            alarm.check_clock_range::<Ticks16>(),
            Err(SettingsError::ExceedsClockRange)
        );
    }
}
