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

//! # Occupancy Core (`occupancy-core`)
//!
//! Foundational types shared by the occupancy timeline:
//!
//! - [`time`]: `TimePoint`, `TimeDelta` and the closed `Window`,
//!   all measured in whole seconds since the Unix epoch.
//! - [`value`]: `TimeValue`, the tagged union of every shape a caller may hand in
//!   as an instant, together with its single conversion into whole seconds.
//! - [`err`]: conversion failures.

use num_traits::{PrimInt, Signed, Zero};
use std::fmt::{Debug, Display};

pub mod err;
pub mod time;
pub mod value;

/// Numeric type used for occupancy deltas and cumulative counts.
pub trait OccupancyCount: PrimInt + Signed + Zero + Send + Sync + Debug + Display {}
impl<T> OccupancyCount for T where T: PrimInt + Signed + Zero + Send + Sync + Debug + Display {}

pub mod prelude {
    pub use crate::OccupancyCount;
    pub use crate::err::TimeConversionError;
    pub use crate::time::{TimeDelta, TimePoint, Window};
    pub use crate::value::TimeValue;
}
