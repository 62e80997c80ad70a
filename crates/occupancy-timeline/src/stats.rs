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

//! Reductions of an interval partition to scalars.
//!
//! `average` integrates occupancy over the observed rows but divides by the
//! length of the whole window, so time inside the window that no row covers
//! contributes zero occupancy.

use crate::err::EmptyPartitionError;
use crate::partition::Partition;
use occupancy_core::{
    OccupancyCount,
    time::{TimeDelta, Window},
};
use serde::Serialize;
use std::fmt::Display;

#[inline]
pub fn widths<C: OccupancyCount>(partition: &Partition<C>) -> Vec<TimeDelta> {
    partition.widths().collect()
}

/// Width of the widest row.
///
/// # Errors
///
/// Returns [`EmptyPartitionError`] if the partition has no rows.
#[inline]
pub fn max_width<C: OccupancyCount>(
    partition: &Partition<C>,
) -> Result<TimeDelta, EmptyPartitionError> {
    partition.widths().max().ok_or(EmptyPartitionError)
}

#[inline]
pub fn row_count<C: OccupancyCount>(partition: &Partition<C>) -> usize {
    partition.len()
}

/// `Σ count · width` over all rows.
#[inline]
pub fn riemann_sum<C: OccupancyCount>(partition: &Partition<C>) -> i128 {
    partition.iter().map(|row| row.area()).sum()
}

/// Time-weighted mean occupancy of `partition` over `window`.
///
/// Returns `0.0` for an empty partition, and for a window of non-positive
/// length (which can only hold a single clamped instant).
pub fn average<C: OccupancyCount>(partition: &Partition<C>, window: &Window) -> f64 {
    let length = window.length();
    if partition.is_empty() || length <= 0 {
        return 0.0;
    }
    riemann_sum(partition) as f64 / length as f64
}

/// Snapshot of every statistic of a timeline at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSummary {
    window: Window,
    instants: usize,
    rows: usize,
    max_width: Option<TimeDelta>,
    riemann_sum: i128,
    average: f64,
}

impl TimelineSummary {
    /// Collects the row statistics of `partition`.
    ///
    /// `average` is taken as given so the caller's rule for degenerate
    /// timelines applies unchanged.
    pub fn new<C: OccupancyCount>(
        partition: &Partition<C>,
        window: &Window,
        instants: usize,
        average: f64,
    ) -> Self {
        Self {
            window: *window,
            instants,
            rows: row_count(partition),
            max_width: max_width(partition).ok(),
            riemann_sum: riemann_sum(partition),
            average,
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn instants(&self) -> usize {
        self.instants
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn max_width(&self) -> Option<TimeDelta> {
        self.max_width
    }

    #[inline]
    pub fn riemann_sum(&self) -> i128 {
        self.riemann_sum
    }

    #[inline]
    pub fn average(&self) -> f64 {
        self.average
    }
}

impl Display for TimelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Timeline statistics:")?;
        writeln!(f, "  Window: {}", self.window)?;
        writeln!(f, "  Distinct instants: {}", self.instants)?;
        writeln!(f, "  Sub-intervals: {}", self.rows)?;
        match self.max_width {
            Some(w) => writeln!(f, "  Widest sub-interval: {}", w)?,
            None => writeln!(f, "  Widest sub-interval: n/a")?,
        }
        writeln!(f, "  Riemann sum: {}", self.riemann_sum)?;
        writeln!(f, "  Average occupancy: {:.4}", self.average)?;
        Ok(())
    }
}
