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

use occupancy_core::{err::TimeConversionError, time::Window};
use std::fmt::Display;

/// A timeline was requested without a start and/or end bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidRangeError {
    missing_start: bool,
    missing_end: bool,
}

impl InvalidRangeError {
    #[inline]
    pub fn new(missing_start: bool, missing_end: bool) -> Self {
        Self {
            missing_start,
            missing_end,
        }
    }

    #[inline]
    pub fn missing_start(&self) -> bool {
        self.missing_start
    }

    #[inline]
    pub fn missing_end(&self) -> bool {
        self.missing_end
    }
}

impl Display for InvalidRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match (self.missing_start, self.missing_end) {
            (true, true) => "start and end",
            (true, false) => "start",
            _ => "end",
        };
        write!(f, "Timeline range is missing its {}", what)
    }
}

impl std::error::Error for InvalidRangeError {}

/// A statistic that needs at least one sub-interval was asked of an empty partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EmptyPartitionError;

impl Display for EmptyPartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Partition has no sub-intervals")
    }
}

impl std::error::Error for EmptyPartitionError {}

/// The window spans more seconds than a single `i64` duration can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowTooLongError {
    window: Window,
}

impl WindowTooLongError {
    #[inline]
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }
}

impl Display for WindowTooLongError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Timeline window {} spans {} seconds, more than {}",
            self.window,
            self.window.length(),
            i64::MAX
        )
    }
}

impl std::error::Error for WindowTooLongError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineBuildError {
    InvalidRange(InvalidRangeError),
    Conversion(TimeConversionError),
    WindowTooLong(WindowTooLongError),
}

impl Display for TimelineBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TimelineBuildError::*;
        match self {
            InvalidRange(e) => write!(f, "{}", e),
            Conversion(e) => write!(f, "{}", e),
            WindowTooLong(e) => write!(f, "{}", e),
        }
    }
}

impl From<InvalidRangeError> for TimelineBuildError {
    fn from(err: InvalidRangeError) -> Self {
        Self::InvalidRange(err)
    }
}

impl From<TimeConversionError> for TimelineBuildError {
    fn from(err: TimeConversionError) -> Self {
        Self::Conversion(err)
    }
}

impl From<WindowTooLongError> for TimelineBuildError {
    fn from(err: WindowTooLongError) -> Self {
        Self::WindowTooLong(err)
    }
}

impl std::error::Error for TimelineBuildError {}
