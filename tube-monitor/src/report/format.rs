//! Report rendering.
//!
//! Turns a batch of line status records into the Telegram HTML message.
//! Rendering is pure: records in, string out, no I/O, and the output is
//! identical for identical input.

use crate::domain::{Arrival, LineStatus};

/// Fixed report header.
const HEADER: &str = "🚇 <b>TfL Line Status Update</b>";

/// Reason text that means "nothing to explain"; the reason line is
/// omitted when a record carries exactly this value.
const NO_DISRUPTION: &str = "No disruption";

/// Format the full status report.
///
/// Records are sorted by line id before rendering, so the message order
/// is stable no matter which fetches finished first.
pub fn format_status_message(statuses: &[LineStatus]) -> String {
    let mut sorted: Vec<&LineStatus> = statuses.iter().collect();
    sorted.sort_by(|a, b| a.line.cmp(&b.line));

    let mut parts: Vec<String> = vec![HEADER.to_string(), String::new()];

    for status in sorted {
        parts.push(format!(
            "{} <b>{}</b>",
            status_emoji(&status.status),
            escape_html(&status.line.display_name())
        ));
        parts.push(format!("Status: {}", escape_html(&status.status)));

        if status.reason != NO_DISRUPTION {
            parts.push(format!("Reason: {}", escape_html(&status.reason)));
        }

        if !status.disruptions.is_empty() {
            parts.push(String::new());
            parts.push("Disruptions:".to_string());
            for disruption in &status.disruptions {
                parts.push(format!("• {}", escape_html(disruption)));
            }
        }

        if !status.arrivals.is_empty() {
            parts.push(String::new());
            parts.push("Next Arrivals:".to_string());
            for arrival in &status.arrivals {
                parts.push(format!(
                    "• {} - {} (Platform {})",
                    escape_html(&arrival.destination),
                    arrival_time(arrival),
                    escape_html(&arrival.platform)
                ));
            }
        }

        // Blank separator after each line's block.
        parts.push(String::new());
    }

    parts.join("\n")
}

/// "Due" for a vehicle arriving now, otherwise "N min".
fn arrival_time(arrival: &Arrival) -> String {
    if arrival.minutes > 0 {
        format!("{} min", arrival.minutes)
    } else {
        "Due".to_string()
    }
}

/// Severity glyph for a status description.
///
/// Exact-match lookup; anything unrecognized gets the fallback ❓.
fn status_emoji(status: &str) -> &'static str {
    match status {
        "Good Service" => "✅",
        "Minor Delays" => "⚠️",
        "Severe Delays" => "🔴",
        "Part Suspended" => "⛔️",
        "Suspended" => "🚫",
        "Part Closure" => "⚠️",
        "Planned Closure" => "🔧",
        "Unknown" => "❓",
        _ => "❓",
    }
}

/// Escape text for Telegram HTML parse mode.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
