// src/vcs/snapshot.rs

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::errors::{GradeError, Result};
use crate::types::Snapshot;

/// Time of day used as the submission cutoff for historical checkouts.
pub const CHECKOUT_CUTOFF: &str = "18:00";

/// Turn `--day` / `--date` into a [`Snapshot`].
///
/// `--day` accepts a weekday name ("fri", "Friday") and means the most
/// recent such day on or before `today`; `--date` must be `YYYY-MM-DD`.
pub fn resolve_snapshot(
    day: Option<&str>,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<Snapshot> {
    if let Some(day) = day {
        let weekday: Weekday = day.trim().parse().map_err(|_| {
            GradeError::ConfigError(format!("--day: '{day}' is not a day of the week"))
        })?;
        let back = (7 + today.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
        let resolved = today - Days::new(u64::from(back));
        return Ok(Snapshot::AsOf(resolved.format("%Y-%m-%d").to_string()));
    }

    if let Some(date) = date {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            GradeError::ConfigError(format!("--date: '{date}' is not YYYY-MM-DD ({e})"))
        })?;
        return Ok(Snapshot::AsOf(parsed.format("%Y-%m-%d").to_string()));
    }

    Ok(Snapshot::Latest)
}
