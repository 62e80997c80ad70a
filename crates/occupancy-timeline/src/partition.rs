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

//! # Interval Partition
//!
//! Turns the sorted delta events of a timeline into a step function: one row per
//! pair of consecutive instants, carrying the occupancy that holds between them.
//!
//! For events `e_0 .. e_{n-1}` the partition has `n - 1` rows. Row `i` spans
//! `[instant_i, instant_{i+1})` and its count is the sum of the deltas at
//! `instant_0 ..= instant_i`. Fewer than two events yield an empty partition.

use crate::events::DeltaEvents;
use occupancy_core::{
    OccupancyCount,
    time::{TimeDelta, TimePoint},
};
use serde::Serialize;
use std::collections::btree_map;
use std::iter::{FusedIterator, Peekable};

/// One sub-interval of constant occupancy.
///
/// Serializes to the columns `start, end, delta, count, start_date, end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionRow<C> {
    start: TimePoint,
    end: TimePoint,
    #[serde(rename = "delta")]
    width: TimeDelta,
    count: C,
    #[serde(rename = "start_date")]
    start_label: String,
    #[serde(rename = "end_date")]
    end_label: String,
}

impl<C: OccupancyCount> PartitionRow<C> {
    fn new(start: TimePoint, end: TimePoint, count: C) -> Self {
        Self {
            start,
            end,
            width: end - start,
            count,
            start_label: start.label(),
            end_label: end.label(),
        }
    }

    #[inline]
    pub fn start(&self) -> TimePoint {
        self.start
    }

    #[inline]
    pub fn end(&self) -> TimePoint {
        self.end
    }

    #[inline]
    pub fn width(&self) -> TimeDelta {
        self.width
    }

    #[inline]
    pub fn count(&self) -> C {
        self.count
    }

    #[inline]
    pub fn start_label(&self) -> &str {
        &self.start_label
    }

    #[inline]
    pub fn end_label(&self) -> &str {
        &self.end_label
    }

    /// Height times width of this row, exact in `i128`.
    #[inline]
    pub fn area(&self) -> i128 {
        let count = self
            .count
            .to_i128()
            .expect("signed primitive count fits in i128");
        count * i128::from(self.width.value())
    }
}

/// Lazily walks a [`DeltaEvents`] and yields its partition rows in order.
///
/// # Panics
///
/// Panics if two consecutive instants lie more than `i64::MAX` seconds apart.
/// A [`Timeline`](crate::timeline::Timeline) never stores such a pair because it
/// rejects windows that long.
#[derive(Debug, Clone)]
pub struct PartitionIter<'a, C> {
    events: Peekable<btree_map::Iter<'a, TimePoint, C>>,
    count: C,
}

impl<'a, C: OccupancyCount> PartitionIter<'a, C> {
    #[inline]
    pub fn new(events: &'a DeltaEvents<C>) -> Self {
        Self {
            events: events.into_iter().peekable(),
            count: C::zero(),
        }
    }
}

impl<C: OccupancyCount> Iterator for PartitionIter<'_, C> {
    type Item = PartitionRow<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&start, &delta) = self.events.next()?;
        let (&end, _) = *self.events.peek()?;
        self.count = self
            .count
            .checked_add(&delta)
            .expect("overflow in cumulative occupancy");
        Some(PartitionRow::new(start, end, self.count))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.events.len().saturating_sub(1);
        (n, Some(n))
    }
}

impl<C: OccupancyCount> ExactSizeIterator for PartitionIter<'_, C> {}

impl<C: OccupancyCount> FusedIterator for PartitionIter<'_, C> {}

/// The full step function of a timeline, materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Partition<C> {
    rows: Vec<PartitionRow<C>>,
}

impl<C: OccupancyCount> Partition<C> {
    /// Column names of the tabular rendering, in order.
    pub const COLUMNS: [&'static str; 6] = ["start", "end", "delta", "count", "start_date", "end_date"];

    pub fn from_events(events: &DeltaEvents<C>) -> Self {
        Self {
            rows: PartitionIter::new(events).collect(),
        }
    }

    #[inline]
    pub fn rows(&self) -> &[PartitionRow<C>] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, PartitionRow<C>> {
        self.rows.iter()
    }

    /// Row widths in partition order.
    #[inline]
    pub fn widths(&self) -> impl ExactSizeIterator<Item = TimeDelta> + '_ {
        self.rows.iter().map(PartitionRow::width)
    }

    #[inline]
    pub fn into_rows(self) -> Vec<PartitionRow<C>> {
        self.rows
    }
}

impl<'a, C> IntoIterator for &'a Partition<C> {
    type Item = &'a PartitionRow<C>;
    type IntoIter = std::slice::Iter<'a, PartitionRow<C>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<C> IntoIterator for Partition<C> {
    type Item = PartitionRow<C>;
    type IntoIter = std::vec::IntoIter<PartitionRow<C>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
