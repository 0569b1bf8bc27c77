//! Tick counting and wall-clock conversion
//!
//! The scheduler measures everything in ticks of the host's fixed-timestep
//! loop. [`TimeUnit`] is the tick count itself; [`TickRate`] is the
//! externally configured ticks-per-second used only to translate wall-clock
//! durations into ticks and back.

use std::fmt;
use std::num::NonZeroU32;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TickRateError;

/// A count of ticks.
///
/// Depending on context a `TimeUnit` is either an absolute tick-timestamp
/// (a value of the registry clock) or a span of ticks (a timer duration);
/// callers track which meaning applies. The count is signed: the time left
/// on a timer goes to zero or below the instant it becomes due.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeUnit(i64);

impl TimeUnit {
    pub const ZERO: Self = Self(0);

    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Convert a wall-clock duration to whole ticks at the given rate.
    ///
    /// Granularity is whole ticks: fractions truncate toward zero, so a
    /// duration shorter than one tick converts to zero ticks.
    pub fn from_duration(duration: Duration, rate: TickRate) -> Self {
        Self((duration.as_secs_f64() * f64::from(rate.get())) as i64)
    }

    /// Convert this tick count back to a wall-clock duration at the given
    /// rate. Zero and negative counts yield [`Duration::ZERO`].
    pub fn to_duration(self, rate: TickRate) -> Duration {
        if self.0 <= 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.0 as f64 / f64::from(rate.get()))
    }
}

impl From<i64> for TimeUnit {
    fn from(ticks: i64) -> Self {
        Self(ticks)
    }
}

impl From<i32> for TimeUnit {
    fn from(ticks: i32) -> Self {
        Self(i64::from(ticks))
    }
}

impl Add for TimeUnit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeUnit {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for TimeUnit {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for TimeUnit {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ticks-per-second of the host's fixed-timestep loop.
///
/// Supplied by the host when the registry is created and used only for
/// duration-to-tick conversion. A rate of zero is invalid configuration and is
/// rejected at construction rather than clamped. Note that timers scheduled
/// through [`TimeUnit::from_duration`] hold their tick count; if the host
/// later drives updates at a different real rate, those wall-clock durations
/// become inaccurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TickRate(NonZeroU32);

impl TickRate {
    pub fn new(ticks_per_second: u32) -> Result<Self, TickRateError> {
        NonZeroU32::new(ticks_per_second)
            .map(Self)
            .ok_or(TickRateError)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for TickRate {
    type Error = TickRateError;

    fn try_from(ticks_per_second: u32) -> Result<Self, Self::Error> {
        Self::new(ticks_per_second)
    }
}

impl From<TickRate> for u32 {
    fn from(rate: TickRate) -> Self {
        rate.get()
    }
}

impl fmt::Display for TickRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", self.0)
    }
}
