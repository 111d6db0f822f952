//! Per-line status records.
//!
//! One `LineStatus` is built for each monitored line on every report
//! cycle, held for the duration of formatting, then discarded. Nothing is
//! persisted between cycles.

use super::LineId;

/// A predicted arrival at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// Destination shown for the vehicle.
    pub destination: String,

    /// Whole minutes until arrival. Zero means the vehicle is due.
    pub minutes: i64,

    /// Platform name as reported by the API.
    pub platform: String,
}

/// Aggregated status for one monitored line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStatus {
    /// The line this record describes.
    pub line: LineId,

    /// Severity description, e.g. "Good Service" or "Minor Delays".
    /// Always present; "Unknown" when no data could be fetched.
    pub status: String,

    /// Explanation for the current status. Never empty; defaults to
    /// "No disruption" when the API gives no reason.
    pub reason: String,

    /// Active disruption descriptions, in feed order. Empty means the
    /// disruption feed was checked and reported nothing; a fetch failure
    /// is represented by a single sentinel entry instead.
    pub disruptions: Vec<String>,

    /// Upcoming arrivals, ascending by time to station. Empty for lines
    /// whose recipe does not fetch arrivals.
    pub arrivals: Vec<Arrival>,
}

