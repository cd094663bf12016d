use std::hint::black_box;

use bikeshare_stats::calendar::{DaySelector, MonthSelector};
use bikeshare_stats::ingestion::{load_from_reader, CitySource, LoadOptions};
use bikeshare_stats::processing::{enrich, filter_trips};
use bikeshare_stats::stats::aggregate;
use chrono::Weekday;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const STATIONS: [&str; 8] = [
    "Canal St & Adams St",
    "Clinton St & Madison St",
    "Streeter Dr & Grand Ave",
    "Lake Shore Dr & Monroe St",
    "Michigan Ave & Oak St",
    "Millennium Park",
    "Theater on the Lake",
    "Wells St & Concord Ln",
];

fn synthetic_chicago_csv(rows: usize) -> String {
    let mut out = String::from(
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year\n",
    );
    for i in 0..rows {
        let month = 1 + i % 6;
        let day = 1 + i % 28;
        let hour = i % 24;
        let from = STATIONS[i % STATIONS.len()];
        let to = STATIONS[(i * 7 + 3) % STATIONS.len()];
        let (user, gender, year) = if i % 5 == 0 {
            ("Customer", "", String::new())
        } else {
            let gender = if i % 2 == 0 { "Male" } else { "Female" };
            ("Subscriber", gender, format!("{}.0", 1950 + i % 50))
        };
        let duration = 60 + i % 1800;
        let date = format!("2017-{month:02}-{day:02}");
        out.push_str(&format!(
            "{i},{date} {hour:02}:15:00,{date} {hour:02}:45:00,{duration},{from},{to},{user},{gender},{year}\n"
        ));
    }
    out
}

fn bench_pipeline(c: &mut Criterion) {
    let opts = LoadOptions::default();
    let mut group = c.benchmark_group("pipeline");

    for rows in [1_000usize, 10_000] {
        let csv = synthetic_chicago_csv(rows);

        group.bench_with_input(BenchmarkId::new("load", rows), &csv, |b, csv| {
            b.iter(|| {
                load_from_reader(CitySource::Chicago, black_box(csv.as_bytes()), &opts).unwrap()
            })
        });

        let raw = load_from_reader(CitySource::Chicago, csv.as_bytes(), &opts).unwrap();
        group.bench_with_input(BenchmarkId::new("enrich", rows), &raw, |b, raw| {
            b.iter(|| enrich(black_box(raw)).unwrap())
        });

        let enriched = enrich(&raw).unwrap();
        group.bench_with_input(BenchmarkId::new("filter", rows), &enriched, |b, t| {
            let friday = DaySelector::Day(Weekday::Fri);
            b.iter(|| filter_trips(black_box(t), MonthSelector::March, friday).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("aggregate", rows), &enriched, |b, t| {
            b.iter(|| aggregate(black_box(t)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
