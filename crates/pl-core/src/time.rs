//! Simulated time model.
//!
//! # Design
//!
//! Time is a monotonically non-decreasing `f64` scalar advanced only by the
//! scheduler, independent of wall-clock time.  A continuous scalar (rather
//! than an integer tick) is required because the canonical scenarios schedule
//! at fractional instants (part arrivals every 0.5 units).
//!
//! `SimTime` implements a total order via [`f64::total_cmp`] so it can key a
//! priority queue.  The scheduler rejects non-finite or negative delays at
//! call time (`InvalidDelay`), so ordinary comparisons never see NaN.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// An instant on (or a duration of) the simulated clock.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn new(value: f64) -> Self {
        SimTime(value)
    }

    /// Whether this value is usable as a delay: finite and non-negative.
    #[inline]
    pub fn is_valid_delay(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    /// The instant `delay` units after `self`.
    #[inline]
    pub fn after(self, delay: SimTime) -> SimTime {
        SimTime(self.0 + delay.0)
    }
}

impl PartialEq for SimTime {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl Sub for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

impl From<f64> for SimTime {
    #[inline]
    fn from(value: f64) -> Self {
        SimTime(value)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}
