use serde::Serialize;

use crate::error::BikeshareResult;
use crate::processing::{reduce, GroupCount, GroupKey, ReduceOp};
use crate::table::{columns, TripTable};

use super::{counts_of, require_rows};

/// Number of trips for one category value (user type or gender).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i64,
    pub most_recent: i64,
    pub most_common: i64,
    pub most_common_count: usize,
}

/// Gender and birth-year statistics, when the source has them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Demographics {
    /// The source never supplied gender or birth year.
    Unavailable,
    Available {
        genders: Vec<CategoryCount>,
        /// `None` when no trip in the table has a birth year.
        birth_years: Option<BirthYearStats>,
    },
}

/// Statistics on bike-share users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    /// Trips per user type, most common first.
    pub user_types: Vec<CategoryCount>,
    pub demographics: Demographics,
}

/// User-type counts, plus gender counts and birth-year range/mode for sources that have them.
///
/// Demographic columns are only touched when the table's capabilities say they exist.
pub fn user_stats(table: &TripTable) -> BikeshareResult<UserStats> {
    const STAT: &str = "user statistics";

    require_rows(table, STAT)?;
    let user_types = category_counts(counts_of(table, &[columns::USER_TYPE], STAT)?);

    let demographics = if table.capabilities().demographics {
        Demographics::Available {
            genders: category_counts(counts_of(table, &[columns::GENDER], STAT)?),
            birth_years: birth_year_stats(table, STAT)?,
        }
    } else {
        Demographics::Unavailable
    };

    Ok(UserStats {
        user_types,
        demographics,
    })
}

fn category_counts(groups: Vec<GroupCount>) -> Vec<CategoryCount> {
    groups
        .into_iter()
        .map(|g| CategoryCount {
            value: g.key.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            count: g.count,
        })
        .collect()
}

fn birth_year_stats(
    table: &TripTable,
    stat: &'static str,
) -> BikeshareResult<Option<BirthYearStats>> {
    let years = counts_of(table, &[columns::BIRTH_YEAR], stat)?;
    let Some(top) = years.first() else {
        return Ok(None);
    };

    let year_of = |op| {
        reduce(table.data(), columns::BIRTH_YEAR, op)
            .and_then(|v| v.as_f64())
            .map(|y| y.trunc() as i64)
    };
    let most_common = top.key.first().and_then(GroupKey::as_f64).map(|y| y.trunc() as i64);

    Ok(match (year_of(ReduceOp::Min), year_of(ReduceOp::Max), most_common) {
        (Some(earliest), Some(most_recent), Some(most_common)) => Some(BirthYearStats {
            earliest,
            most_recent,
            most_common,
            most_common_count: top.count,
        }),
        _ => None,
    })
}
