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

use occupancy_core::{OccupancyCount, time::TimePoint};
use std::collections::BTreeMap;

/// A sparse, time-ordered record of occupancy changes.
///
/// Each key is a quantized instant and each value the net change in occupancy
/// at that instant. Adding to an instant that already carries a delta folds the
/// new delta into it, so there is never more than one entry per instant and the
/// entries are always sorted by instant. Entries whose deltas cancel out to zero
/// are kept: the instant still bounds a sub-interval of the partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEvents<C> {
    map: BTreeMap<TimePoint, C>,
}

impl<C: OccupancyCount> Default for DeltaEvents<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: OccupancyCount> DeltaEvents<C> {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Number of distinct instants carrying a delta.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Folds `delta` into the entry at `t`, creating it if needed.
    ///
    /// # Panics
    ///
    /// Panics if the accumulated delta at `t` overflows `C`.
    #[inline]
    pub fn add(&mut self, t: TimePoint, delta: C) {
        self.map
            .entry(t)
            .and_modify(|v| {
                *v = v
                    .checked_add(&delta)
                    .expect("overflow in accumulated occupancy delta");
            })
            .or_insert(delta);
    }

    /// The net delta stored at exactly `t`.
    #[inline]
    pub fn get(&self, t: TimePoint) -> Option<C> {
        self.map.get(&t).copied()
    }

    #[inline]
    pub fn first_instant(&self) -> Option<TimePoint> {
        self.map.keys().next().copied()
    }

    #[inline]
    pub fn last_instant(&self) -> Option<TimePoint> {
        self.map.keys().next_back().copied()
    }

    /// Occupancy in force at `t`: the sum of every delta at or before `t`.
    pub fn cumulative_at(&self, t: TimePoint) -> C {
        self.map
            .range(..=t)
            .fold(C::zero(), |acc, (_, d)| {
                acc.checked_add(d)
                    .expect("overflow in cumulative occupancy")
            })
    }

    /// Iterates `(instant, delta)` in ascending instant order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (TimePoint, C)> + ExactSizeIterator + '_ {
        self.map.iter().map(|(k, v)| (*k, *v))
    }
}

impl<'a, C: OccupancyCount> IntoIterator for &'a DeltaEvents<C> {
    type Item = (&'a TimePoint, &'a C);
    type IntoIter = std::collections::btree_map::Iter<'a, TimePoint, C>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
