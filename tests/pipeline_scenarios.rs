use bikeshare_stats::calendar::{DaySelector, MonthSelector};
use bikeshare_stats::ingestion::{load, CitySource, LoadOptions};
use bikeshare_stats::pipeline::{all_cities, prepare, run_batch, run_query, Query};
use bikeshare_stats::processing::{enrich, filter_trips};
use bikeshare_stats::stats::{
    aggregate, duration_stats, station_stats, time_stats, user_stats, CategoryCount, Demographics,
    SECONDS_PER_DAY,
};
use bikeshare_stats::BikeshareError;
use chrono::Weekday;

fn fixtures() -> LoadOptions {
    LoadOptions::with_data_dir("tests/fixtures")
}

fn query(city: &str, month: &str, day: &str) -> Query {
    Query::parse(city, month, day).unwrap()
}

#[test]
fn january_filter_keeps_the_two_january_trips() {
    let outcome = run_query(&query("chicago", "january", "all"), &fixtures()).unwrap();
    let time = &outcome.report.time;
    assert_eq!(outcome.report.trips, 2);
    assert_eq!(time.month.month, 1);
    assert_eq!(time.month.name, "January");
    assert_eq!(time.month.count, 2);
    assert_eq!(time.day.name, "Monday");
    assert_eq!(time.day.day_of_week, 0);
    assert_eq!(time.hour.hour, 8);
}

#[test]
fn most_frequent_station_pair() {
    let outcome = run_query(&query("chicago", "all", "all"), &fixtures()).unwrap();
    let trip = &outcome.report.stations.trip;
    assert_eq!(trip.start_station, "Canal St & Adams St");
    assert_eq!(trip.end_station, "Clinton St & Madison St");
    assert_eq!(trip.count, 2);
    assert_eq!(outcome.report.stations.start.count, 3);
}

#[test]
fn durations_in_seconds_minutes_and_days() {
    let outcome = run_query(&query("chicago", "all", "all"), &fixtures()).unwrap();
    let d = outcome.report.durations;
    assert_eq!(d.total.seconds, 360.0);
    assert_eq!(d.total.minutes, 6.0);
    assert!((d.total.days - 360.0 / SECONDS_PER_DAY).abs() < 1e-15);
    assert_eq!(d.mean.seconds, 120.0);
    assert_eq!(d.mean.minutes, 2.0);
    assert!((d.mean.days - 1.0 / 720.0).abs() < 1e-15);
}

#[test]
fn month_ties_resolve_to_the_earliest_month() {
    // May and June both have two New York trips.
    let outcome = run_query(&query("new york city", "all", "all"), &fixtures()).unwrap();
    assert_eq!(outcome.report.time.month.name, "May");
    assert_eq!(outcome.report.time.month.count, 2);
    assert_eq!(outcome.report.time.day.name, "Wednesday");
    assert_eq!(outcome.report.time.hour.hour, 13);
}

#[test]
fn rider_demographics_follow_the_source() {
    let nyc = run_query(&query("new york city", "all", "all"), &fixtures()).unwrap();
    match nyc.report.users.demographics {
        Demographics::Available { genders, birth_years } => {
            assert_eq!(
                genders,
                vec![
                    CategoryCount { value: "Male".into(), count: 3 },
                    CategoryCount { value: "Female".into(), count: 2 },
                ]
            );
            let years = birth_years.unwrap();
            assert_eq!((years.earliest, years.most_recent), (1981, 1998));
            assert_eq!((years.most_common, years.most_common_count), (1981, 3));
        }
        Demographics::Unavailable => panic!("new york city has demographics"),
    }

    let dc = run_query(&query("washington", "all", "all"), &fixtures()).unwrap();
    assert_eq!(dc.report.users.demographics, Demographics::Unavailable);
    assert_eq!(dc.report.users.user_types[0].value, "Subscriber");
}

#[test]
fn day_filter_composes_with_month_filter() {
    let table = prepare(&query("washington", "all", "saturday"), &fixtures()).unwrap();
    assert_eq!(table.row_count(), 1);
    let table = prepare(&query("washington", "march", "saturday"), &fixtures()).unwrap();
    assert_eq!(table.row_count(), 1);
    let table = prepare(&query("washington", "april", "saturday"), &fixtures()).unwrap();
    assert!(table.is_empty());
}

#[test]
fn empty_selection_yields_insufficient_data_everywhere() {
    let raw = load(CitySource::Chicago, &fixtures()).unwrap();
    let enriched = enrich(&raw).unwrap();
    let empty = filter_trips(&enriched, MonthSelector::June, DaySelector::All).unwrap();
    assert!(empty.is_empty());
    let friday = DaySelector::Day(Weekday::Fri);
    let both = filter_trips(&enriched, MonthSelector::June, friday).unwrap();
    assert!(both.is_empty());

    for err in [
        time_stats(&empty).unwrap_err(),
        station_stats(&empty).unwrap_err(),
        duration_stats(&empty).unwrap_err(),
        user_stats(&empty).unwrap_err(),
        aggregate(&empty).unwrap_err(),
        aggregate(&both).unwrap_err(),
        run_query(&query("chicago", "june", "all"), &fixtures()).unwrap_err(),
        run_query(&query("chicago", "june", "friday"), &fixtures()).unwrap_err(),
    ] {
        assert!(matches!(err, BikeshareError::InsufficientData { .. }), "{err:?}");
    }
}

#[test]
fn batch_runs_every_city_in_input_order() {
    let queries = all_cities(MonthSelector::All, DaySelector::All);
    let results = run_batch(&queries, &fixtures());
    assert_eq!(results.len(), 3);
    let trips: Vec<usize> = results
        .into_iter()
        .map(|r| r.unwrap().report.trips)
        .collect();
    assert_eq!(trips, vec![3, 6, 4]);
}

#[test]
fn outcome_serializes_to_json() {
    let outcome = run_query(&query("washington", "all", "all"), &fixtures()).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["query"]["source"], "washington");
    assert_eq!(json["query"]["month"], "all");
    assert_eq!(json["report"]["trips"], 4);
    assert_eq!(json["report"]["users"]["demographics"]["status"], "unavailable");
    assert!(json["timings"]["prepare"].is_f64());
}
