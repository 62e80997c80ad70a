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

//! # Occupancy Timeline (`occupancy-timeline`)
//!
//! Counts how many entities are present at every instant of a fixed window,
//! given their `(start, end)` presence intervals.
//!
//! The crate is layered on one shared structure:
//!
//! - **Event accumulator** ([`events::DeltaEvents`]): a sorted map from quantized
//!   instants to net occupancy deltas. Deltas landing on the same second merge.
//! - **Partition builder** ([`partition`]): walks the accumulator once and emits
//!   contiguous sub-intervals, each with the occupancy that holds across it.
//! - **Statistics** ([`stats`]): widest sub-interval, sub-interval count, and the
//!   time-weighted average occupancy (a Riemann sum over the window).
//!
//! [`timeline::Timeline`] ties the three together behind a window that clamps
//! every incoming instant.
//!
//! ```
//! use occupancy_timeline::prelude::*;
//!
//! let mut timeline: Timeline = Timeline::new(0, 10, TimelineConfig::default()).unwrap();
//! timeline
//!     .ingest([PresenceRecord::new(0, 5), PresenceRecord::new(2, 7)])
//!     .unwrap();
//!
//! assert_eq!(timeline.row_count(), 3);
//! assert!((timeline.average() - 1.4).abs() < 1e-12);
//! ```

pub mod config;
pub mod err;
pub mod events;
pub mod partition;
pub mod record;
pub mod stats;
pub mod timeline;

pub mod prelude {
    pub use crate::config::{TimeBasis, TimelineConfig};
    pub use crate::err::{
        EmptyPartitionError, InvalidRangeError, TimelineBuildError, WindowTooLongError,
    };
    pub use crate::events::DeltaEvents;
    pub use crate::partition::{Partition, PartitionIter, PartitionRow};
    pub use crate::record::{Presence, PresenceRecord};
    pub use crate::stats::TimelineSummary;
    pub use crate::timeline::{Timeline, TimelineBuilder};
    pub use occupancy_core::prelude::*;
}
