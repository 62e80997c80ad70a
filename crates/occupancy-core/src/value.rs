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

//! Caller-facing time values.
//!
//! A presence record or a window bound may arrive as a raw second count, a
//! fractional second count, a zoned timestamp, a naive wall-clock date/time, or
//! not at all. [`TimeValue`] names each of those shapes and
//! [`TimeValue::to_time_point`] is the one place they are quantized to whole
//! seconds. Fractions of a second are truncated toward zero.

use crate::{err::TimeConversionError, time::TimePoint};
use chrono::{DateTime, NaiveDateTime, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// No instant was recorded.
    #[default]
    Missing,
    /// Whole seconds since the Unix epoch.
    Seconds(i64),
    /// Seconds since the Unix epoch, possibly with a fractional part.
    FractionalSeconds(f64),
    /// A zoned timestamp.
    Timestamp(DateTime<Utc>),
    /// A wall-clock date/time without zone, read as if it were UTC.
    Naive(NaiveDateTime),
}

impl TimeValue {
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, TimeValue::Missing)
    }

    /// Quantizes this value to whole seconds.
    ///
    /// Returns `Ok(None)` for [`TimeValue::Missing`].
    ///
    /// # Errors
    ///
    /// Returns a [`TimeConversionError`] if a fractional value is not finite or
    /// does not fit into an `i64` after truncation.
    pub fn to_time_point(&self) -> Result<Option<TimePoint>, TimeConversionError> {
        let seconds = match *self {
            TimeValue::Missing => return Ok(None),
            TimeValue::Seconds(s) => s,
            TimeValue::FractionalSeconds(v) => v.to_i64().ok_or(TimeConversionError::new(v))?,
            TimeValue::Timestamp(dt) => truncate_toward_zero(dt),
            TimeValue::Naive(naive) => truncate_toward_zero(naive.and_utc()),
        };
        Ok(Some(TimePoint::new(seconds)))
    }
}

// `DateTime::timestamp` floors; pre-epoch instants with a sub-second part
// need one second added back to truncate toward zero instead.
#[inline]
fn truncate_toward_zero(dt: DateTime<Utc>) -> i64 {
    let secs = dt.timestamp();
    if secs < 0 && dt.timestamp_subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

impl From<i64> for TimeValue {
    #[inline]
    fn from(seconds: i64) -> Self {
        TimeValue::Seconds(seconds)
    }
}

impl From<i32> for TimeValue {
    #[inline]
    fn from(seconds: i32) -> Self {
        TimeValue::Seconds(i64::from(seconds))
    }
}

impl From<f64> for TimeValue {
    #[inline]
    fn from(seconds: f64) -> Self {
        TimeValue::FractionalSeconds(seconds)
    }
}

impl From<DateTime<Utc>> for TimeValue {
    #[inline]
    fn from(dt: DateTime<Utc>) -> Self {
        TimeValue::Timestamp(dt)
    }
}

impl From<NaiveDateTime> for TimeValue {
    #[inline]
    fn from(naive: NaiveDateTime) -> Self {
        TimeValue::Naive(naive)
    }
}

impl From<TimePoint> for TimeValue {
    #[inline]
    fn from(tp: TimePoint) -> Self {
        TimeValue::Seconds(tp.value())
    }
}

impl<T: Into<TimeValue>> From<Option<T>> for TimeValue {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(TimeValue::Missing, Into::into)
    }
}
