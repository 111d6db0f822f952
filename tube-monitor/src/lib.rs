//! TfL line status monitor.
//!
//! Polls the TfL Unified API for a fixed set of lines on a weekday
//! timetable, aggregates per-line status, disruption, and arrival data,
//! and sends the formatted report to a Telegram chat.

pub mod config;
pub mod domain;
pub mod monitor;
pub mod notify;
pub mod report;
pub mod retry;
pub mod schedule;
pub mod tfl;
