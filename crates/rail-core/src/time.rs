//! Time-of-day model.
//!
//! # Design
//!
//! The one time unit of the whole system is the **second**.  A [`Time`] is
//! a time of day in seconds since midnight; a [`Duration`] is a span in
//! seconds.  Adding a duration to a time wraps modulo 24 h, so a schedule
//! that runs past midnight simply continues at `00:00:xx`.
//!
//! Integer seconds keep every schedule computation exact (no floating-point
//! drift) and comparisons O(1).
//!
//! On the wire a `Time` is the string `"HH:MM:SS"`; anything else fails with
//! [`CoreError::InvalidFormat`].

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Seconds in one day.  `Time` values are always `< SECS_PER_DAY`.
pub const SECS_PER_DAY: u32 = 86_400;

// ── Duration ──────────────────────────────────────────────────────────────────

/// A span of time in whole seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Duration(pub u32);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Duration(secs)
    }

    /// Saturates at `u32::MAX` seconds.
    #[inline]
    pub const fn from_mins(mins: u32) -> Self {
        Duration(mins.saturating_mul(60))
    }

    #[inline]
    pub const fn secs(self) -> u32 {
        self.0
    }
}

/// Saturating.
impl std::ops::Add for Duration {
    type Output = Duration;
    #[inline]
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

// ── Time ──────────────────────────────────────────────────────────────────────

/// A time of day in seconds since midnight.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Time(u32);

impl Time {
    pub const MIDNIGHT: Time = Time(0);

    /// Build a time from seconds since midnight, wrapping into one day.
    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Time(secs % SECS_PER_DAY)
    }

    /// `hh:mm:00`.  Out-of-range components wrap into one day.
    #[inline]
    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Time::from_secs(hours * 3_600 + minutes * 60)
    }

    /// Strict constructor: fails unless `h < 24`, `m < 60`, `s < 60`.
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> CoreResult<Self> {
        if hours >= 24 || minutes >= 60 || seconds >= 60 {
            return Err(CoreError::InvalidFormat(format!(
                "{hours:02}:{minutes:02}:{seconds:02} is not a time of day"
            )));
        }
        Ok(Time(hours * 3_600 + minutes * 60 + seconds))
    }

    /// Parse `"HH:MM:SS"`.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidFormat(format!("expected \"HH:MM:SS\", got {s:?}"));

        let mut parts = s.trim().split(':');
        let mut next = || -> CoreResult<u32> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u32>().map_err(|_| invalid())
        };
        let (h, m, sec) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Time::from_hms(h, m, sec)
    }

    #[inline]
    pub const fn secs(self) -> u32 {
        self.0
    }

    /// `(hours, minutes, seconds)` components.
    pub fn hms(self) -> (u32, u32, u32) {
        (self.0 / 3_600, (self.0 % 3_600) / 60, self.0 % 60)
    }

    /// Forward distance from `earlier` to `self`, wrapping across midnight.
    #[inline]
    pub fn since(self, earlier: Time) -> Duration {
        Duration((self.0 + SECS_PER_DAY - earlier.0) % SECS_PER_DAY)
    }
}

impl std::ops::Add<Duration> for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: Duration) -> Time {
        Time(((self.0 as u64 + rhs.0 as u64) % SECS_PER_DAY as u64) as u32)
    }
}

impl std::ops::Sub for Time {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Time) -> Duration {
        self.since(rhs)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

impl FromStr for Time {
    type Err = CoreError;
    fn from_str(s: &str) -> CoreResult<Self> {
        Time::parse(s)
    }
}

impl TryFrom<String> for Time {
    type Error = CoreError;
    fn try_from(s: String) -> CoreResult<Self> {
        Time::parse(&s)
    }
}

impl From<Time> for String {
    fn from(t: Time) -> String {
        t.to_string()
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation clock: time of day plus the number of elapsed days.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Current time of day.
    pub time: Time,
    /// Whole days elapsed since the clock started.
    pub day: u32,
    /// Total simulated seconds since the clock started.
    pub elapsed_secs: u64,
}

impl SimClock {
    pub fn new(start: Time) -> Self {
        Self { time: start, day: 0, elapsed_secs: 0 }
    }

    /// Advance the clock by `secs` simulated seconds.
    pub fn advance(&mut self, secs: u32) {
        let total = self.time.secs() as u64 + secs as u64;
        self.day += (total / SECS_PER_DAY as u64) as u32;
        self.time = Time((total % SECS_PER_DAY as u64) as u32);
        self.elapsed_secs += secs as u64;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} {}", self.day, self.time)
    }
}
