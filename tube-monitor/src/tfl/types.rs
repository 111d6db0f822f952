//! TfL API response DTOs.
//!
//! These types map directly to the TfL Unified API JSON responses. They
//! use `Option` liberally because the API omits fields rather than
//! sending null values.

use serde::Deserialize;

/// One element of a `/Line/{id}/Status` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    /// Canonical line id (e.g. "northern").
    pub id: Option<String>,

    /// Display name (e.g. "Northern").
    pub name: Option<String>,

    /// Current statuses, most significant first. Omitted entirely for
    /// some modes, so default to empty.
    #[serde(default)]
    pub line_statuses: Vec<LineStatusDto>,
}

/// A single status entry for a line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStatusDto {
    /// Numeric severity code (lower is worse; 10 = Good Service).
    pub status_severity: Option<i32>,

    /// Textual severity, e.g. "Good Service" or "Minor Delays".
    pub status_severity_description: Option<String>,

    /// Explanation, present only during disruption.
    pub reason: Option<String>,
}

/// One element of a `/Line/{id}/Disruption` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionDto {
    /// Disruption category, e.g. "RealTime" or "PlannedWork".
    pub category: Option<String>,

    /// Human-readable description of the disruption.
    pub description: Option<String>,
}

/// One element of a `/StopPoint/{id}/Arrivals` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDto {
    /// Line the vehicle is running on.
    pub line_id: Option<String>,

    /// Destination shown for the vehicle.
    pub destination_name: Option<String>,

    /// Seconds until the vehicle reaches the stop.
    pub time_to_station: Option<i64>,

    /// Platform the vehicle will arrive at.
    pub platform_name: Option<String>,
}
