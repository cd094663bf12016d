//! Interactive question-and-answer driver.
//!
//! Reads answers line by line from any `BufRead` and writes prompts and results to any `Write`,
//! so the loop can be exercised with in-memory buffers. End of input ends the session cleanly.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use bikeshare_stats::calendar::{DaySelector, MonthSelector};
use bikeshare_stats::ingestion::{CitySource, LoadOptions};
use bikeshare_stats::pipeline::{prepare, summarize, Query, QueryOutcome};
use bikeshare_stats::table::TripTable;
use bikeshare_stats::BikeshareError;

use crate::render;

const PAGE_ROWS: usize = 5;
const RULE: &str = "----------------------------------------";

pub fn run<R: BufRead, W: Write>(input: &mut R, out: &mut W, options: &LoadOptions) -> Result<()> {
    writeln!(out, "Hello! Let's explore some US bikeshare data!")?;
    loop {
        let Some(query) = ask_query(input, out)? else {
            return Ok(());
        };
        writeln!(out, "{RULE}")?;

        match prepare(&query, options) {
            Ok(table) => {
                if !offer_preview(input, out, &table)? {
                    return Ok(());
                }
                show_stats(out, query, &table)?;
            }
            Err(e) => {
                tracing::warn!(source = %query.source, error = %e, "could not prepare query");
                writeln!(out, "Could not load data for {}: {e}", query.source)?;
            }
        }

        match read_answer(input, out, "\nWould you like to restart? Enter yes or no.")? {
            Some(answer) if answer == "yes" => continue,
            _ => return Ok(()),
        }
    }
}

/// Ask for city, month and day in turn. `None` means input ran out.
fn ask_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<Query>> {
    let Some(source) = ask_until_valid::<CitySource, _, _>(
        input,
        out,
        "\nWhich city would you like statistics for? (chicago, new york city, washington)",
    )?
    else {
        return Ok(None);
    };
    let Some(month) = ask_until_valid::<MonthSelector, _, _>(
        input,
        out,
        "Which month? (all, january, february, ... , june)",
    )?
    else {
        return Ok(None);
    };
    let Some(day) = ask_until_valid::<DaySelector, _, _>(
        input,
        out,
        "Which day? (all, monday, tuesday, ... , sunday)",
    )?
    else {
        return Ok(None);
    };
    Ok(Some(Query::new(source, month, day)))
}

fn ask_until_valid<T, R, W>(input: &mut R, out: &mut W, question: &str) -> Result<Option<T>>
where
    T: FromStr<Err = BikeshareError>,
    R: BufRead,
    W: Write,
{
    loop {
        let Some(answer) = read_answer(input, out, question)? else {
            return Ok(None);
        };
        match answer.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(e) => writeln!(out, "{e}. Please try again.")?,
        }
    }
}

/// Page through the selected rows while the user keeps answering yes.
/// Returns `false` when input ran out.
fn offer_preview<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    table: &TripTable,
) -> Result<bool> {
    let mut question =
        "Would you like to preview the first 5 rows of the selection? Enter yes or no.";
    let mut offset = 0;
    loop {
        let Some(answer) = read_answer(input, out, question)? else {
            return Ok(false);
        };
        if answer != "yes" {
            return Ok(true);
        }
        let page = table.preview(offset, PAGE_ROWS);
        if page.is_empty() {
            writeln!(out, "No more rows to show.")?;
            return Ok(true);
        }
        write!(out, "{}", render::preview(&page))?;
        offset += PAGE_ROWS;
        question = "Would you like to preview the next 5 rows? Enter yes or no.";
    }
}

fn show_stats<W: Write>(out: &mut W, query: Query, table: &TripTable) -> Result<()> {
    match summarize(table) {
        Ok((report, timings)) => {
            let outcome = QueryOutcome {
                query,
                report,
                timings,
            };
            write!(out, "{}", render::outcome(&outcome))?;
        }
        Err(BikeshareError::InsufficientData { .. }) => {
            writeln!(
                out,
                "No trips match {} for month '{}' and day '{}'.",
                query.source, query.month, query.day
            )?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Print `question`, then read one trimmed, lowercased line. `None` on end of input.
fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<Option<String>> {
    writeln!(out, "{question}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    use bikeshare_stats::ingestion::LoadOptions;

    use super::run;

    const WASHINGTON: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 08:00:00,2017-01-02 08:10:00,600,A St,B St,Subscriber
2017-01-03 09:00:00,2017-01-03 09:05:00,300,A St,C St,Customer
2017-03-06 17:30:00,2017-03-06 17:40:00,600,B St,A St,Subscriber
";

    fn data_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("bikeshare_prompt_{tag}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("washington.csv"), WASHINGTON).unwrap();
        dir
    }

    fn session(tag: &str, answers: &str) -> String {
        let dir = data_dir(tag);
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        run(&mut input, &mut out, &LoadOptions::with_data_dir(&dir)).unwrap();
        let _ = fs::remove_dir_all(&dir);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn reprompts_until_input_is_valid() {
        let out = session("reprompt", "paris\nWashington\naugust\njanuary\nmon\nall\nno\nno\n");
        assert!(out.contains("unknown data source 'paris'"));
        assert!(out.contains("invalid month selector 'august'"));
        assert!(out.contains("invalid day selector 'mon'"));
        assert!(out.contains("The most frequent month is: January (2 trips)"));
        assert!(out.contains("does not hold any data for Gender and Birth Year"));
        assert!(out.contains("This took"));
    }

    #[test]
    fn preview_pages_until_rows_run_out() {
        let out = session("preview", "washington\nall\nall\nyes\nyes\nno\n");
        assert!(out.contains("Start Time | End Time"));
        assert!(out.contains("No more rows to show."));
        assert!(out.contains("The most frequent month is: January"));
    }

    #[test]
    fn empty_selection_is_reported_not_fatal() {
        let out = session("empty", "washington\njune\nall\nno\nno\n");
        assert!(out.contains("No trips match washington for month 'june' and day 'all'."));
    }

    #[test]
    fn end_of_input_ends_the_session() {
        let out = session("eof", "chicago\n");
        assert!(out.contains("Which month?"));
    }

    #[test]
    fn missing_file_reports_and_offers_restart() {
        let out = session("missing", "chicago\nall\nall\nno\n");
        assert!(out.contains("Could not load data for chicago"));
        assert!(out.contains("Would you like to restart?"));
    }
}
