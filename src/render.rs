//! Plain-text rendering of query results and raw-row previews.

use std::fmt::Write;
use std::time::Duration;

use bikeshare_stats::pipeline::QueryOutcome;
use bikeshare_stats::stats::{
    CategoryCount, Demographics, DurationAmount, DurationStats, StationStats, TimeStats, UserStats,
};
use bikeshare_stats::types::{DataSet, Value};

const RULE: &str = "----------------------------------------";

pub fn outcome(outcome: &QueryOutcome) -> String {
    let q = &outcome.query;
    let r = &outcome.report;
    let t = &outcome.timings;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{} (month: {}, day: {}): {} trips",
        q.source, q.month, q.day, r.trips
    );
    let _ = writeln!(out, "{RULE}");
    section(&mut out, "The Most Frequent Times of Travel", &time(&r.time), t.time);
    section(&mut out, "The Most Popular Stations and Trip", &stations(&r.stations), t.stations);
    section(&mut out, "Trip Duration", &durations(&r.durations), t.durations);
    section(&mut out, "User Stats", &users(&r.users), t.users);
    out
}

fn section(out: &mut String, title: &str, body: &str, took: Duration) {
    let _ = writeln!(out, "\nCalculating {title}...\n");
    out.push_str(body);
    let _ = writeln!(out, "\nThis took {:.6} seconds.", took.as_secs_f64());
    let _ = writeln!(out, "{RULE}");
}

pub fn time(s: &TimeStats) -> String {
    format!(
        "The most frequent month is: {} ({} trips)\n\
         The most frequent day of the week is: {} ({} trips)\n\
         The most frequent start hour is: {} ({} trips)\n",
        s.month.name, s.month.count, s.day.name, s.day.count, s.hour.hour, s.hour.count
    )
}

pub fn stations(s: &StationStats) -> String {
    format!(
        "The most commonly used start station is: {} ({} trips)\n\
         The most commonly used end station is: {} ({} trips)\n\
         The most frequent combination of start and end station is: {} -> {} ({} trips)\n",
        s.start.station,
        s.start.count,
        s.end.station,
        s.end.count,
        s.trip.start_station,
        s.trip.end_station,
        s.trip.count
    )
}

pub fn durations(s: &DurationStats) -> String {
    format!(
        "The total travel time is: {}\nThe mean travel time is: {}\n",
        amount(&s.total),
        amount(&s.mean)
    )
}

fn amount(a: &DurationAmount) -> String {
    format!("{} seconds = {} minutes = {} days", a.seconds, a.minutes, a.days)
}

pub fn users(s: &UserStats) -> String {
    let mut out = String::from("Trips per user type:\n");
    counts(&mut out, &s.user_types);
    match &s.demographics {
        Demographics::Unavailable => {
            out.push_str("\nThis dataset does not hold any data for Gender and Birth Year\n");
        }
        Demographics::Available {
            genders,
            birth_years,
        } => {
            out.push_str("Trips per gender:\n");
            counts(&mut out, genders);
            match birth_years {
                Some(b) => {
                    let _ = writeln!(out, "The earliest year of birth is: {}", b.earliest);
                    let _ = writeln!(out, "The most recent year of birth is: {}", b.most_recent);
                    let _ = writeln!(
                        out,
                        "The most common year of birth is: {} ({} trips)",
                        b.most_common, b.most_common_count
                    );
                }
                None => out.push_str("No birth years recorded for these trips\n"),
            }
        }
    }
    out
}

fn counts(out: &mut String, groups: &[CategoryCount]) {
    for g in groups {
        let _ = writeln!(out, "  {:<24} {}", g.value, g.count);
    }
}

/// Render a page of raw rows with a header line.
pub fn preview(page: &DataSet) -> String {
    let mut out = page.schema.field_names().collect::<Vec<_>>().join(" | ");
    out.push('\n');
    for row in &page.rows {
        let cells: Vec<String> = row.iter().map(cell).collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Int64(i) => i.to_string(),
        Value::Float64(f) => f.to_string(),
        Value::Utf8(s) => s.clone(),
        Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
