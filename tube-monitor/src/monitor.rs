//! The report cycle and its schedule loop.
//!
//! One cycle: aggregate every monitored line, render the report, hand it
//! to the sink. Cycles are independent and stateless; a failed delivery
//! is logged and the next scheduled run proceeds as normal.

use chrono::Local;
use tracing::{error, info};

use crate::domain::LineId;
use crate::notify::ReportSink;
use crate::report::{self, RecipeBook, StatusApi};
use crate::schedule::Timetable;

/// Runs report cycles against a status source and a delivery sink.
pub struct Monitor<A, S> {
    api: A,
    sink: S,
    book: RecipeBook,
    lines: Vec<LineId>,
}

impl<A: StatusApi, S: ReportSink> Monitor<A, S> {
    /// Create a monitor for the given lines.
    pub fn new(api: A, sink: S, book: RecipeBook, lines: Vec<LineId>) -> Self {
        Self {
            api,
            sink,
            book,
            lines,
        }
    }

    /// Run one report cycle: fetch, format, deliver.
    ///
    /// Never fails: fetch problems degrade to "Unknown" records inside
    /// the aggregator, and delivery problems are logged here.
    pub async fn run_cycle(&self) {
        info!("starting line status check");

        let statuses = report::get_all_line_statuses(&self.api, &self.book, &self.lines).await;
        let message = report::format_status_message(&statuses);

        match self.sink.publish(&message).await {
            Ok(()) => info!(lines = statuses.len(), "line status check completed"),
            Err(e) => error!(error = %e, "report delivery failed"),
        }
    }

    /// Run cycles forever according to the timetable.
    ///
    /// Sleeps until each next scheduled occurrence. Returns only if the
    /// timetable has no further occurrences.
    pub async fn run_scheduled(&self, timetable: &Timetable) {
        loop {
            let now = Local::now();
            let Some(next) = timetable.next_after(now) else {
                info!("timetable has no further runs, stopping");
                return;
            };

            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next.format("%Y-%m-%d %H:%M:%S"), "sleeping until next scheduled check");
            tokio::time::sleep(wait).await;

            self.run_cycle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopPointId;
    use crate::notify::DeliveryError;
    use crate::tfl::{DisruptionDto, LineDto, LineStatusDto, PredictionDto};
    use std::sync::Mutex;

    /// Status source that reports Good Service for every line.
    struct AllGoodApi;

    impl StatusApi for AllGoodApi {
        async fn line_status(&self, _line: &LineId) -> Option<Vec<LineDto>> {
            Some(vec![LineDto {
                id: None,
                name: None,
                line_statuses: vec![LineStatusDto {
                    status_severity: Some(10),
                    status_severity_description: Some("Good Service".to_string()),
                    reason: None,
                }],
            }])
        }

        async fn line_disruptions(&self, _line: &LineId) -> Option<Vec<DisruptionDto>> {
            Some(Vec::new())
        }

        async fn arrivals(&self, _stop: &StopPointId) -> Option<Vec<PredictionDto>> {
            Some(Vec::new())
        }
    }

    /// Sink that records every published message.
    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl ReportSink for RecordingSink {
        async fn publish(&self, message: &str) -> Result<(), DeliveryError> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    /// Sink whose delivery always fails.
    struct FailingSink;

    impl ReportSink for FailingSink {
        async fn publish(&self, _message: &str) -> Result<(), DeliveryError> {
            Err(DeliveryError { attempts: 3 })
        }
    }

    fn lines(ids: &[&str]) -> Vec<LineId> {
        ids.iter().map(|id| LineId::parse(id).unwrap()).collect()
    }

    #[tokio::test]
    async fn cycle_publishes_formatted_report() {
        let monitor = Monitor::new(
            AllGoodApi,
            RecordingSink::default(),
            RecipeBook::default_lines(),
            lines(&["northern", "victoria"]),
        );

        monitor.run_cycle().await;

        let messages = monitor.sink.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("🚇 <b>TfL Line Status Update</b>"));
        assert!(messages[0].contains("✅ <b>Northern</b>"));
        assert!(messages[0].contains("✅ <b>Victoria</b>"));
    }

    #[tokio::test]
    async fn failed_delivery_does_not_panic() {
        let monitor = Monitor::new(
            AllGoodApi,
            FailingSink,
            RecipeBook::default_lines(),
            lines(&["northern"]),
        );

        // The cycle swallows the delivery error; reaching here is the test.
        monitor.run_cycle().await;
    }
}
