//! Time abstraction traits for platform-agnostic timing.
//!
//! Clock readings are fixed-width millisecond counters that wrap on overflow.
//! Every elapsed-time computation in the crate goes through
//! [`TimeInstant::duration_since`], which is wrapping subtraction, so a clock
//! rollover between two readings still yields the right duration.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// A duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Zero duration constant.
    pub const ZERO: Self = Millis(0);

    /// Creates duration from milliseconds.
    #[inline]
    pub const fn from_millis(millis: u32) -> Self {
        Millis(millis)
    }

    /// Converts duration to milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> u32 {
        self.0
    }

    /// Saturating subtraction (returns ZERO on underflow).
    #[inline]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Millis(self.0.saturating_sub(other.0))
    }

    /// Saturating multiplication by a count.
    #[inline]
    pub const fn saturating_mul(self, count: u32) -> Self {
        Millis(self.0.saturating_mul(count))
    }
}

/// Trait abstraction for wrapping instant types.
pub trait TimeInstant: Copy {
    /// Longest duration two readings of this counter can tell apart.
    const MAX_DURATION: Millis;

    /// Calculates the duration since an earlier instant.
    ///
    /// Must be wraparound-safe: `later.duration_since(earlier)` is the modular
    /// difference of the two counter readings.
    fn duration_since(&self, earlier: Self) -> Millis;

    /// Moves the instant forward, wrapping at the counter width.
    fn wrapping_add(self, duration: Millis) -> Self;

    /// Moves the instant backward, wrapping at the counter width.
    fn wrapping_sub(self, duration: Millis) -> Self;
}

/// A 16-bit millisecond counter, rolling over every 65.536 s.
///
/// Durations derived from it never exceed `u16::MAX` milliseconds. Settings
/// whose countdown does not fit are rejected by
/// [`Controller::new`](crate::Controller::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks16(pub u16);

impl TimeInstant for Ticks16 {
    const MAX_DURATION: Millis = Millis(u16::MAX as u32);

    #[inline]
    fn duration_since(&self, earlier: Self) -> Millis {
        Millis(u32::from(self.0.wrapping_sub(earlier.0)))
    }

    #[inline]
    fn wrapping_add(self, duration: Millis) -> Self {
        Ticks16(self.0.wrapping_add(duration.0 as u16))
    }

    #[inline]
    fn wrapping_sub(self, duration: Millis) -> Self {
        Ticks16(self.0.wrapping_sub(duration.0 as u16))
    }
}

/// A 32-bit millisecond counter, rolling over after roughly 49.7 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks32(pub u32);

impl TimeInstant for Ticks32 {
    const MAX_DURATION: Millis = Millis(u32::MAX);

    #[inline]
    fn duration_since(&self, earlier: Self) -> Millis {
        Millis(self.0.wrapping_sub(earlier.0))
    }

    #[inline]
    fn wrapping_add(self, duration: Millis) -> Self {
        Ticks32(self.0.wrapping_add(duration.0))
    }

    #[inline]
    fn wrapping_sub(self, duration: Millis) -> Self {
        Ticks32(self.0.wrapping_sub(duration.0))
    }
}
