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

//! Presence records consumed by [`Timeline::ingest`](crate::timeline::Timeline::ingest).

use crate::config::TimeBasis;
use occupancy_core::value::TimeValue;
use serde::{Deserialize, Serialize};

/// Anything that was present from a start instant to an (optional) end instant.
///
/// Records carry an absolute pair of timestamps and, optionally, a local pair.
/// Implementors without a separate local pair can rely on the defaults, which
/// return the absolute values.
pub trait Presence {
    fn start_time(&self) -> TimeValue;

    fn end_time(&self) -> TimeValue;

    fn start_time_local(&self) -> TimeValue {
        self.start_time()
    }

    fn end_time_local(&self) -> TimeValue {
        self.end_time()
    }

    /// The `(start, end)` pair selected by `basis`.
    fn bounds(&self, basis: TimeBasis) -> (TimeValue, TimeValue) {
        match basis {
            TimeBasis::Absolute => (self.start_time(), self.end_time()),
            TimeBasis::Local => (self.start_time_local(), self.end_time_local()),
        }
    }
}

impl<P: Presence + ?Sized> Presence for &P {
    #[inline]
    fn start_time(&self) -> TimeValue {
        (**self).start_time()
    }

    #[inline]
    fn end_time(&self) -> TimeValue {
        (**self).end_time()
    }

    #[inline]
    fn start_time_local(&self) -> TimeValue {
        (**self).start_time_local()
    }

    #[inline]
    fn end_time_local(&self) -> TimeValue {
        (**self).end_time_local()
    }
}

impl Presence for (TimeValue, TimeValue) {
    #[inline]
    fn start_time(&self) -> TimeValue {
        self.0
    }

    #[inline]
    fn end_time(&self) -> TimeValue {
        self.1
    }
}

/// A materialized presence row, as read from an availability table.
///
/// Absent fields deserialize to [`TimeValue::Missing`]; an absent end means the
/// entity was still present when the data was captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceRecord {
    pub start_time: TimeValue,
    pub end_time: TimeValue,
    pub start_time_local: TimeValue,
    pub end_time_local: TimeValue,
}

impl PresenceRecord {
    /// A record whose local pair mirrors the absolute pair.
    #[inline]
    pub fn new(start: impl Into<TimeValue>, end: impl Into<TimeValue>) -> Self {
        let (start, end) = (start.into(), end.into());
        Self {
            start_time: start,
            end_time: end,
            start_time_local: start,
            end_time_local: end,
        }
    }

    #[inline]
    pub fn with_local(mut self, start: impl Into<TimeValue>, end: impl Into<TimeValue>) -> Self {
        self.start_time_local = start.into();
        self.end_time_local = end.into();
        self
    }
}

impl Presence for PresenceRecord {
    #[inline]
    fn start_time(&self) -> TimeValue {
        self.start_time
    }

    #[inline]
    fn end_time(&self) -> TimeValue {
        self.end_time
    }

    #[inline]
    fn start_time_local(&self) -> TimeValue {
        self.start_time_local
    }

    #[inline]
    fn end_time_local(&self) -> TimeValue {
        self.end_time_local
    }
}
