//! TfL Unified API client.
//!
//! This module provides an HTTP client for the three endpoints the
//! monitor needs: line status, line disruptions, and stop point arrivals.
//!
//! Key characteristics of the API:
//! - Responses are JSON arrays, even for a single line
//! - Fields are omitted rather than sent as null
//! - An `app_key` query parameter raises the rate limit but is optional
//!
//! Every public call retries with a fixed delay and degrades to `None`
//! when the retries are exhausted, so a flaky network can never abort a
//! report cycle.

mod client;
mod error;
mod types;

pub use client::{TflClient, TflConfig};
pub use error::TflError;
pub use types::{DisruptionDto, LineDto, LineStatusDto, PredictionDto};
