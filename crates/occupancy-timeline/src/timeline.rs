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

//! The top-level occupancy timeline.
//!
//! A [`Timeline`] owns a closed [`Window`] and a [`DeltaEvents`] accumulator.
//! Presence is recorded as `+1` at a start instant and `-1` at an end instant,
//! each clamped into the window; the partition and every statistic are derived
//! from the accumulator on demand and never cached.

use crate::{
    config::{TimeBasis, TimelineConfig},
    err::{EmptyPartitionError, InvalidRangeError, TimelineBuildError, WindowTooLongError},
    events::DeltaEvents,
    partition::{Partition, PartitionIter},
    record::Presence,
    stats::{self, TimelineSummary},
};
use occupancy_core::{
    OccupancyCount,
    err::TimeConversionError,
    time::{TimeDelta, TimePoint, Window},
    value::TimeValue,
};
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<C = i64> {
    start_value: TimeValue,
    end_value: TimeValue,
    window: Window,
    config: TimelineConfig,
    events: DeltaEvents<C>,
}

impl<C: OccupancyCount> Timeline<C> {
    /// Creates an empty timeline over `[start, end]`.
    ///
    /// `start > end` is accepted; every event then clamps to `start` and the
    /// timeline stays degenerate.
    ///
    /// # Errors
    ///
    /// - [`TimelineBuildError::InvalidRange`] if either bound is missing.
    /// - [`TimelineBuildError::Conversion`] if either bound cannot be quantized.
    /// - [`TimelineBuildError::WindowTooLong`] if `end - start` does not fit in
    ///   an `i64`.
    pub fn new(
        start: impl Into<TimeValue>,
        end: impl Into<TimeValue>,
        config: TimelineConfig,
    ) -> Result<Self, TimelineBuildError> {
        let (start_value, end_value) = (start.into(), end.into());
        let missing = InvalidRangeError::new(start_value.is_missing(), end_value.is_missing());
        if missing.missing_start() || missing.missing_end() {
            return Err(missing.into());
        }
        let start = start_value.to_time_point()?.ok_or(missing)?;
        let end = end_value.to_time_point()?.ok_or(missing)?;

        let window = Window::new(start, end);
        if window.checked_length().is_none() {
            return Err(WindowTooLongError::new(window).into());
        }
        debug!(%window, local = config.local, "Created timeline");
        Ok(Self {
            start_value,
            end_value,
            window,
            config,
            events: DeltaEvents::new(),
        })
    }

    #[inline]
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    /// The start bound exactly as it was supplied.
    #[inline]
    pub fn start_value(&self) -> TimeValue {
        self.start_value
    }

    /// The end bound exactly as it was supplied.
    #[inline]
    pub fn end_value(&self) -> TimeValue {
        self.end_value
    }

    #[inline]
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    #[inline]
    pub fn basis(&self) -> TimeBasis {
        self.config.basis()
    }

    #[inline]
    pub fn events(&self) -> &DeltaEvents<C> {
        &self.events
    }

    /// Drops every recorded delta. The window is kept.
    pub fn reset(&mut self) {
        trace!(dropped = self.events.len(), "Reset timeline");
        self.events.clear();
    }

    /// Quantizes `time` and clamps it into the window. A missing time maps to
    /// the window end.
    fn resolve(&self, time: TimeValue) -> Result<TimePoint, TimeConversionError> {
        Ok(match time.to_time_point()? {
            Some(t) => self.window.clamp(t),
            None => self.window.end(),
        })
    }

    /// Records `delta` at `time`.
    ///
    /// A missing `time` is counted at the window end; any other time is clamped
    /// into the window. Deltas landing on the same second are summed.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeConversionError`] if `time` cannot be quantized; the
    /// timeline is left untouched in that case.
    pub fn add(&mut self, time: impl Into<TimeValue>, delta: C) -> Result<(), TimeConversionError> {
        let instant = self.resolve(time.into())?;
        if self.config.debug {
            debug!(%instant, %delta, "Add event");
        } else {
            trace!(%instant, %delta, "Add event");
        }
        self.events.add(instant, delta);
        Ok(())
    }

    /// Replaces the recorded deltas with those of `records`.
    ///
    /// Each record adds `+1` at its start and `-1` at its end, read from the
    /// pair of fields selected by [`TimelineConfig::local`]. Loading the same
    /// records twice gives the same timeline.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeConversionError`] on the first record whose time cannot be
    /// quantized. Records before it stay loaded.
    #[instrument(level = "debug", skip_all, fields(records))]
    pub fn ingest<I>(&mut self, records: I) -> Result<&mut Self, TimeConversionError>
    where
        I: IntoIterator,
        I::Item: Presence,
    {
        self.reset();
        let basis = self.basis();
        let mut loaded = 0usize;
        for record in records {
            let (start, end) = record.bounds(basis);
            self.add(start, C::one())?;
            self.add(end, -C::one())?;
            loaded += 1;
        }
        tracing::Span::current().record("records", loaded);
        debug!(?basis, instants = self.events.len(), "Ingested presence records");
        Ok(self)
    }

    /// Occupancy in force at `time`, clamped like [`add`](Timeline::add).
    ///
    /// # Errors
    ///
    /// Returns a [`TimeConversionError`] if `time` cannot be quantized.
    pub fn count_at(&self, time: impl Into<TimeValue>) -> Result<C, TimeConversionError> {
        let instant = self.resolve(time.into())?;
        Ok(self.events.cumulative_at(instant))
    }

    /// Builds the interval partition from scratch.
    #[inline]
    pub fn partition(&self) -> Partition<C> {
        Partition::from_events(&self.events)
    }

    /// Streams the interval partition without materializing it.
    #[inline]
    pub fn partition_iter(&self) -> PartitionIter<'_, C> {
        PartitionIter::new(&self.events)
    }

    #[inline]
    pub fn widths(&self) -> Vec<TimeDelta> {
        stats::widths(&self.partition())
    }

    /// Width of the widest sub-interval.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPartitionError`] when fewer than two instants are recorded.
    #[inline]
    pub fn max_width(&self) -> Result<TimeDelta, EmptyPartitionError> {
        stats::max_width(&self.partition())
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        stats::row_count(&self.partition())
    }

    #[inline]
    pub fn riemann_sum(&self) -> i128 {
        stats::riemann_sum(&self.partition())
    }

    /// Time-weighted average occupancy over the whole window.
    ///
    /// Returns `0.0` when at most one instant is recorded.
    #[inline]
    pub fn average(&self) -> f64 {
        self.average_over(&self.partition())
    }

    pub fn summary(&self) -> TimelineSummary {
        let partition = self.partition();
        let average = self.average_over(&partition);
        TimelineSummary::new(&partition, &self.window, self.events.len(), average)
    }

    fn average_over(&self, partition: &Partition<C>) -> f64 {
        if self.events.len() <= 1 {
            return 0.0;
        }
        stats::average(partition, &self.window)
    }
}

/// Fluent construction of a [`Timeline`].
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    start: TimeValue,
    end: TimeValue,
    config: TimelineConfig,
}

impl TimelineBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn start(mut self, start: impl Into<TimeValue>) -> Self {
        self.start = start.into();
        self
    }

    #[inline]
    pub fn end(mut self, end: impl Into<TimeValue>) -> Self {
        self.end = end.into();
        self
    }

    #[inline]
    pub fn local(mut self, local: bool) -> Self {
        self.config.local = local;
        self
    }

    #[inline]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    #[inline]
    pub fn config(mut self, config: TimelineConfig) -> Self {
        self.config = config;
        self
    }

    /// # Errors
    ///
    /// See [`Timeline::new`].
    #[inline]
    pub fn build<C: OccupancyCount>(self) -> Result<Timeline<C>, TimelineBuildError> {
        Timeline::new(self.start, self.end, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PresenceRecord;
    use chrono::{TimeZone, Utc};

    fn tp(t: i64) -> TimePoint {
        TimePoint::new(t)
    }

    fn timeline(start: i64, end: i64) -> Timeline {
        Timeline::new(start, end, TimelineConfig::default()).unwrap()
    }

    fn rows(t: &Timeline) -> Vec<(i64, i64, i64, i64)> {
        t.partition()
            .iter()
            .map(|r| (r.start().value(), r.end().value(), r.width().value(), r.count()))
            .collect()
    }

    #[test]
    fn test_missing_bounds_are_rejected() {
        let err = Timeline::<i64>::new(None::<i64>, 10, TimelineConfig::default()).unwrap_err();
        assert_eq!(err, TimelineBuildError::from(InvalidRangeError::new(true, false)));

        let err = Timeline::<i64>::new(0, TimeValue::Missing, TimelineConfig::default())
            .unwrap_err();
        assert_eq!(err, TimelineBuildError::from(InvalidRangeError::new(false, true)));

        let err = Timeline::<i64>::builder().build::<i64>().unwrap_err();
        assert_eq!(err, TimelineBuildError::from(InvalidRangeError::new(true, true)));
    }

    #[test]
    fn test_unconvertible_bound_is_rejected() {
        let err = Timeline::<i64>::new(f64::NAN, 10, TimelineConfig::default()).unwrap_err();
        assert!(matches!(err, TimelineBuildError::Conversion(_)));
    }

    #[test]
    fn test_bounds_accept_timestamps() {
        let start = Utc.timestamp_opt(1_000, 900_000_000).unwrap();
        let t: Timeline = Timeline::<i64>::builder().start(start).end(2_000.5).build().unwrap();
        assert_eq!(t.window(), Window::new(tp(1_000), tp(2_000)));
        assert_eq!(t.start_value(), TimeValue::Timestamp(start));
        assert_eq!(t.end_value(), TimeValue::FractionalSeconds(2_000.5));
    }

    #[test]
    fn test_add_clamps_into_window() {
        let mut t = timeline(0, 10);
        t.add(-5, 1).unwrap();
        t.add(50, 1).unwrap();
        t.add(TimeValue::Missing, 1).unwrap();
        t.add(4, 1).unwrap();
        assert_eq!(t.events().get(tp(0)), Some(1));
        assert_eq!(t.events().get(tp(10)), Some(2));
        assert_eq!(t.events().get(tp(4)), Some(1));
        assert_eq!(t.events().len(), 3);
    }

    #[test]
    fn test_add_coalesces_deltas() {
        let mut t = timeline(0, 10);
        t.add(3, 2).unwrap();
        t.add(3.7, -5).unwrap();
        assert_eq!(t.events().len(), 1);
        assert_eq!(t.events().get(tp(3)), Some(-3));
    }

    #[test]
    fn test_failed_add_leaves_timeline_untouched() {
        let mut t = timeline(0, 10);
        t.add(1, 1).unwrap();
        let before = t.clone();
        assert!(t.add(f64::INFINITY, 1).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn test_reference_partition_and_average() {
        let mut t = timeline(0, 10);
        t.ingest(&[PresenceRecord::new(0, 5), PresenceRecord::new(2, 7)])
            .unwrap();
        assert_eq!(rows(&t), vec![(0, 2, 2, 1), (2, 5, 3, 2), (5, 7, 2, 1)]);
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.max_width(), Ok(TimeDelta::new(3)));
        assert_eq!(
            t.widths(),
            vec![TimeDelta::new(2), TimeDelta::new(3), TimeDelta::new(2)]
        );
        assert_eq!(t.riemann_sum(), 14);
        assert!((t.average() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_ingest_chains_into_statistics() {
        let mut t = timeline(0, 10);
        let avg = t
            .ingest([PresenceRecord::new(0, 10)])
            .unwrap()
            .average();
        assert!((avg - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_open_ended_record_counts_to_window_end() {
        let mut t = timeline(0, 10);
        t.ingest([PresenceRecord::new(6, TimeValue::Missing)]).unwrap();
        assert_eq!(rows(&t), vec![(6, 10, 4, 1)]);
        assert!((t.average() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_ingest_is_idempotent() {
        let records = vec![
            PresenceRecord::new(1, 4),
            PresenceRecord::new(3, 9),
            PresenceRecord::new(3, TimeValue::Missing),
        ];
        let mut t = timeline(0, 10);
        t.ingest(&records).unwrap();
        let first = t.partition();
        t.ingest(&records).unwrap();
        assert_eq!(t.partition(), first);
    }

    #[test]
    fn test_ingest_reads_local_fields_when_configured() {
        let records = [PresenceRecord::new(0, 2).with_local(5, 9)];

        let mut absolute = timeline(0, 10);
        absolute.ingest(&records).unwrap();
        assert_eq!(rows(&absolute), vec![(0, 2, 2, 1)]);

        let mut local: Timeline = Timeline::<i64>::builder()
            .start(0)
            .end(10)
            .local(true)
            .build()
            .unwrap();
        local.ingest(&records).unwrap();
        assert_eq!(rows(&local), vec![(5, 9, 4, 1)]);
    }

    #[test]
    fn test_ingest_stops_on_unconvertible_record() {
        let records = [
            PresenceRecord::new(1, 2),
            PresenceRecord::new(f64::NAN, 3),
        ];
        let mut t = timeline(0, 10);
        assert!(t.ingest(&records).is_err());
        assert_eq!(t.events().len(), 2);
    }

    #[test]
    fn test_records_outside_window_collapse() {
        let mut t = timeline(100, 200);
        t.ingest([PresenceRecord::new(0, 50), PresenceRecord::new(10, 20)])
            .unwrap();
        assert_eq!(t.events().len(), 1);
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.average(), 0.0);
        assert_eq!(t.max_width(), Err(EmptyPartitionError));
    }

    #[test]
    fn test_degenerate_timelines() {
        let empty = timeline(0, 10);
        assert_eq!(empty.row_count(), 0);
        assert_eq!(empty.average(), 0.0);
        assert_eq!(empty.max_width(), Err(EmptyPartitionError));

        let mut single = timeline(0, 10);
        single.add(5, 1).unwrap();
        assert_eq!(single.row_count(), 0);
        assert_eq!(single.average(), 0.0);
        assert_eq!(single.max_width(), Err(EmptyPartitionError));
    }

    #[test]
    fn test_inverted_window_is_degenerate() {
        let mut t = timeline(10, 0);
        t.ingest([PresenceRecord::new(2, 8), PresenceRecord::new(-4, 40)])
            .unwrap();
        assert_eq!(t.events().len(), 1);
        assert_eq!(t.events().get(tp(10)), Some(0));
        assert_eq!(t.average(), 0.0);
    }

    #[test]
    fn test_window_wider_than_i64_is_rejected() {
        for (start, end) in [
            (i64::MIN, i64::MAX),
            (-5_000_000_000_000_000_000_i64, 5_000_000_000_000_000_000_i64),
            (i64::MAX, i64::MIN),
        ] {
            let err = Timeline::<i64>::new(start, end, TimelineConfig::default()).unwrap_err();
            assert_eq!(
                err,
                TimelineBuildError::from(WindowTooLongError::new(Window::new(tp(start), tp(end))))
            );
        }
    }

    #[test]
    fn test_widest_window_keeps_exact_statistics() {
        let mut t = timeline(i64::MIN, -1);
        assert_eq!(t.window().length(), i128::from(i64::MAX));
        t.ingest([PresenceRecord::new(i64::MIN, i64::MAX)]).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.max_width(), Ok(TimeDelta::new(i64::MAX)));
        assert_eq!(t.average(), 1.0);

        let mut t = timeline(-4_000_000_000_000_000_000, 4_000_000_000_000_000_000);
        t.add(0, 1).unwrap();
        t.add(10, -1).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.riemann_sum(), 10);
        assert_eq!(t.average(), 10.0 / 8e18);
        assert_eq!(t.summary().average(), t.average());
    }

    #[test]
    fn test_reset_matches_fresh_timeline() {
        let fresh = timeline(0, 10);
        let mut t = timeline(0, 10);
        t.ingest([PresenceRecord::new(1, 3)]).unwrap();
        t.reset();
        assert_eq!(t, fresh);
        t.reset();
        assert_eq!(t, fresh);
    }

    #[test]
    fn test_count_at() {
        let mut t = timeline(0, 10);
        t.ingest([PresenceRecord::new(0, 5), PresenceRecord::new(2, 7)])
            .unwrap();
        assert_eq!(t.count_at(1).unwrap(), 1);
        assert_eq!(t.count_at(2).unwrap(), 2);
        assert_eq!(t.count_at(6).unwrap(), 1);
        assert_eq!(t.count_at(-3).unwrap(), 1);
        assert_eq!(t.count_at(TimeValue::Missing).unwrap(), 0);
    }

    #[test]
    fn test_summary_matches_individual_statistics() {
        let mut t = timeline(0, 10);
        t.ingest([PresenceRecord::new(0, 5), PresenceRecord::new(2, 7)])
            .unwrap();
        let s = t.summary();
        assert_eq!(s.window(), t.window());
        assert_eq!(s.instants(), 4);
        assert_eq!(s.rows(), t.row_count());
        assert_eq!(s.max_width(), t.max_width().ok());
        assert_eq!(s.riemann_sum(), t.riemann_sum());
        assert_eq!(s.average(), t.average());
    }

    #[test]
    fn test_partition_iter_matches_partition() {
        let mut t = timeline(0, 100);
        t.ingest([
            PresenceRecord::new(5, 50),
            PresenceRecord::new(10, 20),
            PresenceRecord::new(20, 90),
        ])
        .unwrap();
        let streamed: Vec<_> = t.partition_iter().collect();
        assert_eq!(streamed, t.partition().into_rows());
    }

    #[test]
    fn test_narrow_count_type() {
        let mut t: Timeline<i8> = Timeline::new(0, 4, TimelineConfig::default()).unwrap();
        t.ingest([PresenceRecord::new(0, 4), PresenceRecord::new(0, 2)])
            .unwrap();
        assert_eq!(t.riemann_sum(), 6);
        assert!((t.average() - 1.5).abs() < 1e-12);
    }
}
