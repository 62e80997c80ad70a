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

use occupancy_timeline::prelude::*;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn window_strategy() -> impl Strategy<Value = (i64, i64)> {
    (-100i64..100, 1i64..300).prop_map(|(start, len)| (start, start + len))
}

fn records_strategy() -> impl Strategy<Value = Vec<(i64, Option<i64>)>> {
    prop::collection::vec(
        (-200i64..500, prop::option::weighted(0.9, 0i64..200)).prop_map(|(start, len)| {
            (start, len.map(|l| start + l))
        }),
        0..40,
    )
}

fn to_records(raw: &[(i64, Option<i64>)]) -> Vec<PresenceRecord> {
    raw.iter()
        .map(|&(start, end)| PresenceRecord::new(start, end))
        .collect()
}

fn load(window: (i64, i64), raw: &[(i64, Option<i64>)]) -> Timeline {
    let mut timeline = Timeline::new(window.0, window.1, TimelineConfig::default())
        .expect("window bounds are present");
    timeline
        .ingest(to_records(raw))
        .expect("integer seconds always convert");
    timeline
}

/// Occupancy at second `x`, computed directly from the records.
fn brute_force_count(window: (i64, i64), raw: &[(i64, Option<i64>)], x: i64) -> i64 {
    let clamp = |t: i64| t.min(window.1).max(window.0);
    raw.iter()
        .map(|&(start, end)| {
            let s = clamp(start);
            let e = end.map_or(window.1, clamp);
            i64::from(s <= x) - i64::from(e <= x)
        })
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/proptest_invariants.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn add_clamps_into_the_window(
        window in window_strategy(),
        t in -1_000i64..1_000,
        delta in -5i64..5,
    ) {
        let mut timeline: Timeline =
            Timeline::new(window.0, window.1, TimelineConfig::default()).unwrap();
        timeline.add(t, delta).unwrap();
        let expected = TimePoint::new(t.min(window.1).max(window.0));
        prop_assert_eq!(timeline.events().len(), 1);
        prop_assert_eq!(timeline.events().get(expected), Some(delta));
    }

    #[test]
    fn partition_rows_tile_the_observed_span(
        window in window_strategy(),
        raw in records_strategy(),
    ) {
        let timeline = load(window, &raw);
        let partition = timeline.partition();
        let distinct = timeline.events().len();

        prop_assert_eq!(partition.len(), distinct.saturating_sub(1));
        prop_assert_eq!(timeline.row_count(), partition.len());
        for pair in partition.rows().windows(2) {
            prop_assert_eq!(pair[0].end(), pair[1].start());
        }
        for row in &partition {
            prop_assert!(row.width().is_positive());
            prop_assert!(timeline.window().contains(row.start()));
            prop_assert!(timeline.window().contains(row.end()));
        }
        if let (Some(first), Some(last)) = (partition.rows().first(), partition.rows().last()) {
            prop_assert_eq!(Some(first.start()), timeline.events().first_instant());
            prop_assert_eq!(Some(last.end()), timeline.events().last_instant());
        }
    }

    #[test]
    fn riemann_sum_matches_per_second_occupancy(
        window in window_strategy(),
        raw in records_strategy(),
    ) {
        let timeline = load(window, &raw);
        let expected: i64 = (window.0..window.1)
            .map(|x| brute_force_count(window, &raw, x))
            .sum();
        prop_assert_eq!(timeline.riemann_sum(), i128::from(expected));

        for x in window.0..=window.1 {
            prop_assert_eq!(
                timeline.count_at(x).unwrap(),
                brute_force_count(window, &raw, x)
            );
        }
    }

    #[test]
    fn average_divides_by_full_window_length(
        window in window_strategy(),
        raw in records_strategy(),
    ) {
        let timeline = load(window, &raw);
        let avg = timeline.average();
        if timeline.events().len() <= 1 {
            prop_assert_eq!(avg, 0.0);
            prop_assert_eq!(timeline.max_width(), Err(EmptyPartitionError));
        } else {
            let expected = timeline.riemann_sum() as f64 / (window.1 - window.0) as f64;
            prop_assert!((avg - expected).abs() < 1e-9);
            let widest = timeline.widths().into_iter().max();
            prop_assert_eq!(timeline.max_width().ok(), widest);
        }
    }

    #[test]
    fn ingest_is_idempotent(
        window in window_strategy(),
        raw in records_strategy(),
    ) {
        let records = to_records(&raw);
        let mut timeline: Timeline =
            Timeline::new(window.0, window.1, TimelineConfig::default()).unwrap();
        timeline.ingest(&records).unwrap();
        let first = timeline.partition();
        let first_avg = timeline.average();
        timeline.ingest(&records).unwrap();
        prop_assert_eq!(timeline.partition(), first);
        prop_assert_eq!(timeline.average(), first_avg);
    }
}
