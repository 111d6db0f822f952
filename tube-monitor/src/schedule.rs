//! Report timetable.
//!
//! Schedule entries are cron expressions (seconds field first) evaluated
//! in local time. Deployments that want the original London behavior run
//! with `TZ=Europe/London`.

use std::str::FromStr;

use chrono::{DateTime, Local};
use cron::Schedule;

/// Default timetable: weekday afternoon checks at 15:45 and 16:00.
pub const DEFAULT_SCHEDULES: [&str; 2] = ["0 45 15 * * Mon-Fri", "0 0 16 * * Mon-Fri"];

/// Error returned for an unparseable schedule entry.
#[derive(Debug, thiserror::Error)]
#[error("invalid schedule expression {expression:?}: {message}")]
pub struct InvalidSchedule {
    expression: String,
    message: String,
}

/// A set of cron schedule entries.
#[derive(Debug, Clone)]
pub struct Timetable {
    entries: Vec<Schedule>,
}

impl Timetable {
    /// Parse a timetable from cron expressions.
    pub fn parse<S: AsRef<str>>(expressions: &[S]) -> Result<Self, InvalidSchedule> {
        let mut entries = Vec::with_capacity(expressions.len());

        for expression in expressions {
            let expression = expression.as_ref();
            let schedule = Schedule::from_str(expression).map_err(|e| InvalidSchedule {
                expression: expression.to_string(),
                message: e.to_string(),
            })?;
            entries.push(schedule);
        }

        Ok(Self { entries })
    }

    /// Earliest occurrence across all entries, strictly after `after`.
    ///
    /// Returns `None` only for a timetable whose entries have no future
    /// occurrences at all (e.g. a year-bounded expression in the past).
    pub fn next_after(&self, after: DateTime<Local>) -> Option<DateTime<Local>> {
        self.entries
            .iter()
            .filter_map(|entry| entry.after(&after).next())
            .min()
    }

    /// Number of schedule entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the timetable has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
