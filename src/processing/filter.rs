//! Row filtering: a generic predicate filter for [`DataSet`] and the month/day filter engine
//! for enriched [`TripTable`]s.

use crate::calendar::{DaySelector, MonthSelector};
use crate::error::BikeshareResult;
use crate::table::{columns, TripTable};
use crate::types::{DataSet, Value};

/// Returns a new [`DataSet`] containing only rows for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`DataSet::filter_rows`].
pub fn filter<F>(dataset: &DataSet, predicate: F) -> DataSet
where
    F: FnMut(&[Value]) -> bool,
{
    dataset.filter_rows(predicate)
}

/// Keep the trips matching both selectors.
///
/// Each active selector is an equality test against a derived column (`month` against the
/// selector's 1-based month number, `day_of_week` against its Monday-first day number), and the
/// two are ANDed. [`MonthSelector::All`] / [`DaySelector::All`] impose no constraint.
///
/// Relative row order is preserved. No match yields an empty table, not an error. The table must
/// have been enriched if a selector is active.
pub fn filter_trips(
    table: &TripTable,
    month: MonthSelector,
    day: DaySelector,
) -> BikeshareResult<TripTable> {
    let month_test = match month.month_number() {
        Some(n) => Some((table.column_index(columns::MONTH, "month filter")?, i64::from(n))),
        None => None,
    };
    let day_test = match day.day_number() {
        Some(n) => Some((table.column_index(columns::DAY_OF_WEEK, "day filter")?, i64::from(n))),
        None => None,
    };

    if month_test.is_none() && day_test.is_none() {
        return Ok(table.clone());
    }

    let equals = |row: &[Value], test: Option<(usize, i64)>| match test {
        Some((idx, want)) => row[idx].as_i64() == Some(want),
        None => true,
    };
    let data = filter(table.data(), |row| equals(row, month_test) && equals(row, day_test));
    Ok(table.with_data(data))
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::{filter, filter_trips};
    use crate::calendar::{DaySelector, MonthSelector};
    use crate::error::BikeshareError;
    use crate::table::{columns, Capabilities, TripTable};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    /// (id, month, day_of_week)
    fn enriched(rows: &[(i64, i64, i64)]) -> TripTable {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new(columns::MONTH, DataType::Int64),
            Field::new(columns::DAY_OF_WEEK, DataType::Int64),
        ]);
        let rows = rows
            .iter()
            .map(|&(id, m, d)| vec![Value::Int64(id), Value::Int64(m), Value::Int64(d)])
            .collect();
        TripTable::new(DataSet::new(schema, rows), Capabilities::default()).unwrap()
    }

    fn ids(t: &TripTable) -> Vec<i64> {
        t.data().rows.iter().map(|r| r[0].as_i64().unwrap()).collect()
    }

    #[test]
    fn filter_rows_by_numeric_predicate() {
        let t = enriched(&[(1, 1, 0), (2, 2, 0), (3, 3, 0)]);
        let out = filter(t.data(), |row| matches!(row.first(), Some(Value::Int64(v)) if *v > 1));
        assert_eq!(out.schema, t.data().schema);
        assert_eq!(out.row_count(), 2);
        // Original unchanged
        assert_eq!(t.row_count(), 3);
    }

    #[test]
    fn all_selectors_keep_everything() {
        let t = enriched(&[(1, 1, 0), (2, 5, 6)]);
        let out = filter_trips(&t, MonthSelector::All, DaySelector::All).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn month_selector_matches_month_number() {
        let t = enriched(&[(1, 1, 0), (2, 1, 3), (3, 3, 0)]);
        let out = filter_trips(&t, MonthSelector::January, DaySelector::All).unwrap();
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn day_selector_uses_monday_first_numbering() {
        // day_of_week 0 is Monday, 6 is Sunday.
        let t = enriched(&[(1, 1, 0), (2, 1, 6), (3, 2, 6)]);
        let sunday = filter_trips(&t, MonthSelector::All, DaySelector::Day(Weekday::Sun)).unwrap();
        assert_eq!(ids(&sunday), vec![2, 3]);
        let monday = filter_trips(&t, MonthSelector::All, DaySelector::Day(Weekday::Mon)).unwrap();
        assert_eq!(ids(&monday), vec![1]);
    }

    #[test]
    fn both_selectors_are_anded() {
        let t = enriched(&[(1, 1, 6), (2, 2, 6), (3, 2, 0), (4, 2, 6)]);
        let out =
            filter_trips(&t, MonthSelector::February, DaySelector::Day(Weekday::Sun)).unwrap();
        assert_eq!(ids(&out), vec![2, 4]);
    }

    #[test]
    fn no_match_is_empty_table_with_same_schema() {
        let t = enriched(&[(1, 1, 0)]);
        let out = filter_trips(&t, MonthSelector::June, DaySelector::Day(Weekday::Fri)).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.data().schema, t.data().schema);
    }

    #[test]
    fn active_selector_on_unenriched_table_is_schema_mismatch() {
        let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
        let t = TripTable::new(DataSet::empty(schema), Capabilities::default()).unwrap();
        let err = filter_trips(&t, MonthSelector::May, DaySelector::All).unwrap_err();
        assert!(matches!(err, BikeshareError::SchemaMismatch { .. }));
        assert!(filter_trips(&t, MonthSelector::All, DaySelector::All).is_ok());
    }
}
