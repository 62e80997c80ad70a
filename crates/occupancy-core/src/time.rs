// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Quantized Time
//!
//! Every instant handled by the timeline is a whole number of seconds since the
//! Unix epoch. This module wraps that number in newtypes so that instants and
//! durations cannot be mixed up:
//!
//! - `TimePoint`: an instant.
//! - `TimeDelta`: a signed duration, the difference of two `TimePoint`s.
//! - `Window`: the closed range `[start, end]` that scopes a timeline and clamps
//!   every event fed into it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops::Sub};

/// Rendering used for partition labels, matching `YYYY-MM-DD HH:MM:SS`.
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimePoint(i64);

impl TimePoint {
    #[inline]
    pub const fn new(seconds: i64) -> Self {
        TimePoint(seconds)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn checked_sub(self, other: TimePoint) -> Option<TimeDelta> {
        self.0.checked_sub(other.0).map(TimeDelta)
    }

    /// The UTC date/time this instant denotes, if chrono can represent it.
    #[inline]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Human-readable rendering of this instant.
    ///
    /// Instants outside chrono's representable range fall back to the raw
    /// second count suffixed with `s`.
    pub fn label(self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format(LABEL_FORMAT).to_string(),
            None => format!("{}s", self.0),
        }
    }
}

impl Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimePoint({})", self.0)
    }
}

impl From<i64> for TimePoint {
    #[inline]
    fn from(seconds: i64) -> Self {
        TimePoint(seconds)
    }
}

impl Sub for TimePoint {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: TimePoint) -> Self::Output {
        self.checked_sub(rhs)
            .expect("overflow in TimePoint - TimePoint")
    }
}

#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TimeDelta(i64);

impl TimeDelta {
    #[inline]
    pub const fn new(seconds: i64) -> Self {
        TimeDelta(seconds)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Display for TimeDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeDelta({})", self.0)
    }
}

impl From<i64> for TimeDelta {
    #[inline]
    fn from(seconds: i64) -> Self {
        TimeDelta(seconds)
    }
}

/// The closed range `[start, end]` a timeline observes.
///
/// The bounds are stored exactly as given. An inverted window (`start > end`)
/// is not rejected; clamping against it pins every instant to `start`, which
/// collapses the timeline to a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    start: TimePoint,
    end: TimePoint,
}

impl Window {
    #[inline]
    pub const fn new(start: TimePoint, end: TimePoint) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> TimePoint {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimePoint {
        self.end
    }

    /// Signed length `end - start` in seconds, exact for any pair of bounds.
    #[inline]
    pub fn length(&self) -> i128 {
        i128::from(self.end.value()) - i128::from(self.start.value())
    }

    /// `end - start` as a [`TimeDelta`], or `None` if it does not fit in an `i64`.
    #[inline]
    pub fn checked_length(&self) -> Option<TimeDelta> {
        self.end.checked_sub(self.start)
    }

    #[inline]
    pub fn contains(&self, t: TimePoint) -> bool {
        t >= self.start && t <= self.end
    }

    /// Clamps `t` to `max(start, min(end, t))`.
    ///
    /// `Ord::clamp` is not used because it panics on an inverted window.
    #[inline]
    pub fn clamp(&self, t: TimePoint) -> TimePoint {
        t.min(self.end).max(self.start)
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
