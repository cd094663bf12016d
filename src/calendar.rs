//! Calendar naming and the month/day filter selectors.
//!
//! Every day-of-week number in this crate uses one convention: Monday = 0 ... Sunday = 6
//! (`chrono::Weekday::num_days_from_monday`). The enricher produces it, the filter compares
//! against it and the aggregator names it.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::error::{BikeshareError, BikeshareResult};

/// Calendar month names, index 0 = January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Day names in day-of-week order, index 0 = Monday.
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Name of a 1-based calendar month.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

/// Name of a Monday-first day-of-week number.
pub fn day_name(day_of_week: u32) -> Option<&'static str> {
    DAY_NAMES.get(day_of_week as usize).copied()
}

/// Month filter selector.
///
/// Only January through June are selectable. This is a limitation of the bundled trip data
/// (each city file covers the first half of one year), not a calendar rule; the enricher itself
/// derives any month 1-12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthSelector {
    /// No month constraint.
    #[default]
    All,
    January,
    February,
    March,
    April,
    May,
    June,
}

impl MonthSelector {
    /// Every selector accepted by [`FromStr`], in prompt order.
    pub const ALL_CHOICES: [MonthSelector; 7] = [
        MonthSelector::All,
        MonthSelector::January,
        MonthSelector::February,
        MonthSelector::March,
        MonthSelector::April,
        MonthSelector::May,
        MonthSelector::June,
    ];

    /// The 1-based month number this selector keeps, or `None` for [`MonthSelector::All`].
    pub fn month_number(self) -> Option<u32> {
        match self {
            MonthSelector::All => None,
            MonthSelector::January => Some(1),
            MonthSelector::February => Some(2),
            MonthSelector::March => Some(3),
            MonthSelector::April => Some(4),
            MonthSelector::May => Some(5),
            MonthSelector::June => Some(6),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MonthSelector::All => "all",
            MonthSelector::January => "january",
            MonthSelector::February => "february",
            MonthSelector::March => "march",
            MonthSelector::April => "april",
            MonthSelector::May => "may",
            MonthSelector::June => "june",
        }
    }
}

impl FromStr for MonthSelector {
    type Err = BikeshareError;

    fn from_str(s: &str) -> BikeshareResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL_CHOICES
            .into_iter()
            .find(|choice| choice.as_str() == wanted)
            .ok_or_else(|| BikeshareError::InvalidSelector {
                kind: "month",
                value: s.to_string(),
                expected: choice_list(Self::ALL_CHOICES.iter().map(|c| c.as_str())),
            })
    }
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MonthSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Day-of-week filter selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DaySelector {
    /// No day constraint.
    #[default]
    All,
    Day(Weekday),
}

impl DaySelector {
    /// The Monday-first day-of-week number this selector keeps, or `None` for
    /// [`DaySelector::All`].
    pub fn day_number(self) -> Option<u32> {
        match self {
            DaySelector::All => None,
            DaySelector::Day(day) => Some(day.num_days_from_monday()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DaySelector::All => "all",
            DaySelector::Day(day) => match day {
                Weekday::Mon => "monday",
                Weekday::Tue => "tuesday",
                Weekday::Wed => "wednesday",
                Weekday::Thu => "thursday",
                Weekday::Fri => "friday",
                Weekday::Sat => "saturday",
                Weekday::Sun => "sunday",
            },
        }
    }

    fn choices() -> impl Iterator<Item = DaySelector> {
        std::iter::once(DaySelector::All).chain(WEEKDAYS.into_iter().map(DaySelector::Day))
    }
}

impl FromStr for DaySelector {
    type Err = BikeshareError;

    fn from_str(s: &str) -> BikeshareResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::choices()
            .find(|choice| choice.as_str() == wanted)
            .ok_or_else(|| BikeshareError::InvalidSelector {
                kind: "day",
                value: s.to_string(),
                expected: choice_list(Self::choices().map(|c| c.as_str())),
            })
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DaySelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn choice_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
