// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic tick time and timebase conversion.
//!
//! [`TickTime`] represents a point on the display driver's monotonic
//! timeline, in platform-native ticks. Vsync timestamps, presentation
//! deadlines, and the detached-clock fallback all live on this one timeline;
//! the queues never compare times from different clocks.
//!
//! [`Duration`] is a span in the same tick units. [`Timebase`] carries the
//! rational conversion factor from ticks to nanoseconds for drivers whose
//! hardware timestamp unit is not already nanoseconds. All conversions use
//! `u128` intermediates to avoid overflow.
//!
//! A [`TickTime`] of zero doubles as the "as soon as possible" presentation
//! deadline throughout the crate, so real timestamps handed to the queues
//! must be non-zero. Monotonic clocks with an arbitrary epoch satisfy this
//! for free.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickTime(pub u64);

impl TickTime {
    /// The zero timestamp, used as the "as soon as possible" deadline.
    pub const ASAP: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns `true` for the "as soon as possible" deadline.
    #[inline]
    #[must_use]
    pub const fn is_asap(self) -> bool {
        self.0 == 0
    }

    /// Converts this tick time to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        let wide = self.0 as u128 * timebase.numer as u128 / timebase.denom as u128;
        wide as u64
    }

    /// Creates a [`TickTime`] from a nanosecond value and timebase.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn from_nanos(nanos: u64, timebase: Timebase) -> Self {
        let wide = nanos as u128 * timebase.denom as u128 / timebase.numer as u128;
        Self(wide as u64)
    }

    /// Returns the duration since an earlier time, or zero if `earlier` is
    /// after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Saturating addition of a duration.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }

    /// Checked subtraction of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_sub(self, duration: Duration) -> Option<Self> {
        match self.0.checked_sub(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for TickTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Duration> for TickTime {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sub for TickTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for TickTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TickTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`. Drivers whose vsync timestamps are
/// already nanoseconds use [`Timebase::NANOS`]; hardware timestamp counters
/// running at other rates (a 27 MHz system clock, for instance) supply their
/// own ratio.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in platform-native ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Saturating multiplication by a scalar tick count.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, rhs: u64) -> Self {
        Self(self.0.saturating_mul(rhs))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_round_trip_identity_timebase() {
        let tb = Timebase::NANOS;
        let t = TickTime(16_666_667);
        assert_eq!(t.to_nanos(tb), 16_666_667, "identity timebase");
        assert_eq!(TickTime::from_nanos(16_666_667, tb), t);
    }

    #[test]
    fn nanos_round_trip_27mhz_counter() {
        // 27 MHz hardware timestamp counter: 1000/27 ns per tick.
        let tb = Timebase::new(1000, 27);
        let ticks = 27_000_000_u64; // one second
        let nanos = TickTime(ticks).to_nanos(tb);
        assert_eq!(nanos, 1_000_000_000, "27 MHz counter over one second");
        assert_eq!(TickTime::from_nanos(nanos, tb).ticks(), ticks);
    }

    #[test]
    fn asap_deadline_is_zero() {
        assert!(TickTime::ASAP.is_asap());
        assert!(!TickTime(1).is_asap());
    }

    #[test]
    fn tick_time_duration_ops() {
        let t = TickTime(1000);
        let d = Duration(200);
        assert_eq!((t + d).ticks(), 1200);
        assert_eq!((t - d).ticks(), 800);
        assert_eq!(t.saturating_duration_since(TickTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(TickTime(400)), Duration(600));
        assert_eq!(t.checked_sub(Duration(2000)), None);
    }

    #[test]
    fn duration_arithmetic_saturates() {
        let interval = Duration(16_666_667);
        assert_eq!(interval.saturating_mul(2).ticks(), 33_333_334);
        assert_eq!(Duration(u64::MAX).saturating_mul(3), Duration(u64::MAX));
        assert_eq!(Duration(10).saturating_sub(Duration(20)), Duration::ZERO);
    }
}
