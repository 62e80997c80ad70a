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

use chrono::{DateTime, Duration, TimeZone, Utc};
use occupancy_timeline::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::{fs::File, io::BufWriter, time::Instant};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

#[derive(Debug, Clone, Serialize)]
struct ScenarioInfo {
    idx: usize,
    seed: u64,
    window_start: String,
    window_end: String,
    records: usize,
    open_ended: usize,
    local: bool,
}

#[derive(Debug, Clone, Serialize)]
struct RunResult {
    scenario: ScenarioInfo,
    summary: TimelineSummary,
    peak_count: i64,
    elapsed_us: u128,
    // Busiest rows only; the full partition would dwarf the report.
    busiest_rows: Vec<PartitionRow<i64>>,
}

#[derive(Debug, Clone, Serialize)]
struct OccupancyReport {
    description: String,
    columns: [&'static str; 6],
    scenarios: Vec<RunResult>,
}

fn interpolate_u(val0: usize, val1: usize, step: usize, steps: usize) -> usize {
    if steps <= 1 {
        return val1;
    }
    let num = (val1 as isize - val0 as isize) * step as isize;
    (val0 as isize + num / (steps as isize - 1)).max(0) as usize
}

// Sessions with an offset local pair, as if recorded in UTC+2.
fn generate_records(
    rng: &mut ChaCha8Rng,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    n: usize,
    open_ended_share: f64,
) -> Vec<PresenceRecord> {
    let local_offset = Duration::hours(2);
    let lead_in = Duration::hours(6).num_seconds();
    let span = (window_end - window_start).num_seconds();

    (0..n)
        .map(|_| {
            let offset = rng.random_range(-lead_in..span);
            let start = window_start + Duration::seconds(offset);
            let end = (!rng.random_bool(open_ended_share))
                .then(|| start + Duration::minutes(rng.random_range(5..=8 * 60)));

            PresenceRecord::new(start, end).with_local(
                (start + local_offset).naive_utc(),
                end.map(|e| (e + local_offset).naive_utc()),
            )
        })
        .collect()
}

fn main() {
    enable_tracing();

    let n_scenarios = 8usize;

    let min_records = 50usize;
    let max_records = 5_000usize;

    let open_ended_share = 0.03;
    let top_rows = 5usize;

    let window_start = Utc
        .with_ymd_and_hms(2021, 1, 4, 0, 0, 0)
        .single()
        .expect("valid window start");
    let window_end = window_start + Duration::days(1);

    let mut results: Vec<RunResult> = Vec::with_capacity(n_scenarios);

    for i in 0..n_scenarios {
        let n_records = interpolate_u(min_records, max_records, i, n_scenarios);
        let seed: u64 = 42 + (i as u64);
        let local = i % 2 == 1;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let records = generate_records(
            &mut rng,
            window_start,
            window_end,
            n_records,
            open_ended_share,
        );
        let open_ended = records.iter().filter(|r| r.end_time.is_missing()).count();

        let mut timeline: Timeline = Timeline::<i64>::builder()
            .start(window_start)
            .end(window_end)
            .local(local)
            .build()
            .expect("window bounds are present");

        let t0 = Instant::now();
        timeline.ingest(&records).expect("generated times convert");
        let summary = timeline.summary();
        let elapsed = t0.elapsed();

        let partition = timeline.partition();
        let peak_count = partition.iter().map(PartitionRow::count).max().unwrap_or(0);
        let mut busiest_rows = partition.into_rows();
        busiest_rows.sort_by(|a, b| b.count().cmp(&a.count()).then(a.start().cmp(&b.start())));
        busiest_rows.truncate(top_rows);

        info!(
            scenario = i,
            records = n_records,
            local,
            rows = summary.rows(),
            average = summary.average(),
            peak_count,
            "Scenario done"
        );

        results.push(RunResult {
            scenario: ScenarioInfo {
                idx: i,
                seed,
                window_start: window_start.to_rfc3339(),
                window_end: window_end.to_rfc3339(),
                records: n_records,
                open_ended,
                local,
            },
            summary,
            peak_count,
            elapsed_us: elapsed.as_micros(),
            busiest_rows,
        });
    }

    let report = OccupancyReport {
        description: "Occupancy timeline: 8 synthetic one-day scenarios from small to big; local-time fields on odd scenarios.".into(),
        columns: Partition::<i64>::COLUMNS,
        scenarios: results,
    };

    let file = File::create("occupancy_report.json").expect("create occupancy_report.json");
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).expect("write json report");

    println!();
    println!("=================================================================");
    println!("===================== Occupancy Report Done =====================");
    println!("=================================================================");
    println!();
    for run in &report.scenarios {
        println!("Scenario {} ({} records):", run.scenario.idx, run.scenario.records);
        print!("{}", run.summary);
    }
    println!();
    println!("Wrote: occupancy_report.json");
}
