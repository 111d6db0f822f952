//! Line status aggregation.
//!
//! Fans out over all monitored lines concurrently, runs each line's fetch
//! recipe, and normalizes the results into `LineStatus` records. Any
//! sub-fetch can come back empty-handed; the affected line degrades to
//! its documented fallback instead of aborting the batch.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{Arrival, LineId, LineStatus, StopPointId};
use crate::tfl::{DisruptionDto, LineDto, PredictionDto, TflClient};

use super::recipe::{LineRecipe, RecipeBook};

/// Reason used when the status call succeeded but carried no entries.
const NO_STATUS_REASON: &str = "No status data available";

/// Reason used when the status call itself failed.
const FETCH_FAILED_REASON: &str = "Failed to fetch line status";

/// Reason used when a status entry has no explanation. The formatter
/// recognizes this value and omits the reason line.
const NO_DISRUPTION_REASON: &str = "No disruption";

/// Sentinel disruption entry meaning the feed could not be checked.
/// Distinct from an empty list, which means "checked, nothing reported".
const DISRUPTIONS_UNAVAILABLE: &str = "No disruption information available";

/// Maximum number of arrivals kept per line.
const MAX_ARRIVALS: usize = 3;

/// Source of TfL data for the aggregator.
///
/// This abstraction allows the aggregator to be tested with mock data;
/// `TflClient` is the production implementation. `None` means the fetch
/// failed after exhausting its retries.
#[allow(async_fn_in_trait)]
pub trait StatusApi {
    /// Status entries for a line, or `None` if unavailable.
    async fn line_status(&self, line: &LineId) -> Option<Vec<LineDto>>;

    /// Active disruptions for a line, or `None` if unavailable.
    async fn line_disruptions(&self, line: &LineId) -> Option<Vec<DisruptionDto>>;

    /// Arrival predictions at a stop, or `None` if unavailable.
    async fn arrivals(&self, stop: &StopPointId) -> Option<Vec<PredictionDto>>;
}

impl StatusApi for TflClient {
    async fn line_status(&self, line: &LineId) -> Option<Vec<LineDto>> {
        TflClient::line_status(self, line).await
    }

    async fn line_disruptions(&self, line: &LineId) -> Option<Vec<DisruptionDto>> {
        TflClient::line_disruptions(self, line).await
    }

    async fn arrivals(&self, stop: &StopPointId) -> Option<Vec<PredictionDto>> {
        TflClient::arrivals(self, stop).await
    }
}

/// Fetch and aggregate status for every monitored line.
///
/// Lines are fetched concurrently; records come back in input order.
/// Lines without a recipe in `book` are skipped with a warning. This
/// function never fails: every record carries either real data or the
/// documented fallbacks.
pub async fn get_all_line_statuses<A: StatusApi>(
    api: &A,
    book: &RecipeBook,
    lines: &[LineId],
) -> Vec<LineStatus> {
    let fetches: Vec<_> = lines
        .iter()
        .filter_map(|line| match book.recipe_for(line) {
            Some(recipe) => Some(line_info(api, line, recipe)),
            None => {
                warn!(line = line.as_str(), "no recipe for line, skipping");
                None
            }
        })
        .collect();

    join_all(fetches).await
}

/// Run one line's recipe: status and disruptions, plus arrivals when the
/// recipe asks for them.
async fn line_info<A: StatusApi>(api: &A, line: &LineId, recipe: &LineRecipe) -> LineStatus {
    let (status, mut reason) = match api.line_status(line).await {
        Some(response) => process_status(&response),
        None => ("Unknown".to_string(), FETCH_FAILED_REASON.to_string()),
    };

    let disruptions = match api.line_disruptions(line).await {
        Some(response) => {
            let texts = disruption_texts(response);
            match &recipe.route_filter {
                Some(filter) => {
                    let kept = filter.filter(texts);
                    if kept.is_empty() {
                        // Nothing on this route, so the line-wide reason
                        // no longer applies either.
                        reason = filter.no_disruption_message().to_string();
                        vec![filter.no_disruption_message().to_string()]
                    } else {
                        kept
                    }
                }
                None => texts,
            }
        }
        // The feed itself could not be fetched. The sentinel keeps this
        // distinguishable from a checked-and-clear empty list, and the
        // route filter is not applied to it.
        None => vec![DISRUPTIONS_UNAVAILABLE.to_string()],
    };

    let arrivals = match &recipe.arrivals_stop {
        Some(stop) => match api.arrivals(stop).await {
            Some(predictions) => next_arrivals(predictions),
            None => Vec::new(),
        },
        None => Vec::new(),
    };

    debug!(
        line = line.as_str(),
        status = status.as_str(),
        disruptions = disruptions.len(),
        arrivals = arrivals.len(),
        "aggregated line info"
    );

    LineStatus {
        line: line.clone(),
        status,
        reason,
        disruptions,
        arrivals,
    }
}

/// Extract (status, reason) from a `/Line/{id}/Status` response.
fn process_status(response: &[LineDto]) -> (String, String) {
    let Some(entry) = response.first().and_then(|l| l.line_statuses.first()) else {
        return ("Unknown".to_string(), NO_STATUS_REASON.to_string());
    };

    let status = entry
        .status_severity_description
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let reason = entry
        .reason
        .clone()
        .unwrap_or_else(|| NO_DISRUPTION_REASON.to_string());

    (status, reason)
}

/// Map disruption DTOs to display text, defaulting when absent.
fn disruption_texts(response: Vec<DisruptionDto>) -> Vec<String> {
    response
        .into_iter()
        .map(|d| d.description.unwrap_or_else(|| "Unknown disruption".to_string()))
        .collect()
}

/// Sort predictions by seconds-to-station, keep the closest three, and
/// convert to whole minutes (truncating division).
fn next_arrivals(mut predictions: Vec<PredictionDto>) -> Vec<Arrival> {
    predictions.sort_by_key(|p| p.time_to_station.unwrap_or(i64::MAX));

    predictions
        .into_iter()
        .take(MAX_ARRIVALS)
        .map(|p| Arrival {
            destination: p
                .destination_name
                .unwrap_or_else(|| "Unknown".to_string()),
            minutes: p.time_to_station.unwrap_or(0).max(0) / 60,
            platform: p.platform_name.unwrap_or_else(|| "Unknown".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tfl::LineStatusDto;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn line(s: &str) -> LineId {
        LineId::parse(s).unwrap()
    }

    fn status_response(description: &str, reason: Option<&str>) -> Vec<LineDto> {
        vec![LineDto {
            id: None,
            name: None,
            line_statuses: vec![LineStatusDto {
                status_severity: None,
                status_severity_description: Some(description.to_string()),
                reason: reason.map(str::to_string),
            }],
        }]
    }

    fn disruption(description: &str) -> DisruptionDto {
        DisruptionDto {
            category: Some("RealTime".to_string()),
            description: Some(description.to_string()),
        }
    }

    fn prediction(destination: &str, seconds: i64, platform: &str) -> PredictionDto {
        PredictionDto {
            line_id: None,
            destination_name: Some(destination.to_string()),
            time_to_station: Some(seconds),
            platform_name: Some(platform.to_string()),
        }
    }

    /// Mock status source. A line or stop missing from a map behaves as
    /// a fetch that exhausted its retries.
    #[derive(Default)]
    struct MockApi {
        statuses: HashMap<String, Vec<LineDto>>,
        disruptions: HashMap<String, Vec<DisruptionDto>>,
        arrivals: HashMap<String, Vec<PredictionDto>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl StatusApi for MockApi {
        async fn line_status(&self, line: &LineId) -> Option<Vec<LineDto>> {
            self.record(format!("status:{line}"));
            self.statuses.get(line.as_str()).cloned()
        }

        async fn line_disruptions(&self, line: &LineId) -> Option<Vec<DisruptionDto>> {
            self.record(format!("disruption:{line}"));
            self.disruptions.get(line.as_str()).cloned()
        }

        async fn arrivals(&self, stop: &StopPointId) -> Option<Vec<PredictionDto>> {
            self.record(format!("arrivals:{stop}"));
            self.arrivals.get(stop.as_str()).cloned()
        }
    }

    fn plain_book(ids: &[&str]) -> RecipeBook {
        let mut book = RecipeBook::new();
        for id in ids {
            book.add(line(id), LineRecipe::default());
        }
        book
    }

    #[tokio::test]
    async fn one_record_per_line_in_input_order() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "victoria".to_string(),
            status_response("Good Service", None),
        );
        api.statuses.insert(
            "northern".to_string(),
            status_response("Minor Delays", Some("Earlier fault at Bank.")),
        );
        api.disruptions.insert("victoria".to_string(), Vec::new());
        api.disruptions.insert("northern".to_string(), Vec::new());

        let book = plain_book(&["victoria", "northern"]);
        let lines = [line("victoria"), line("northern")];
        let records = get_all_line_statuses(&api, &book, &lines).await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, line("victoria"));
        assert_eq!(records[1].line, line("northern"));
        assert_eq!(records[1].status, "Minor Delays");
        assert_eq!(records[1].reason, "Earlier fault at Bank.");
    }

    #[tokio::test]
    async fn unrecognized_line_is_skipped() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "victoria".to_string(),
            status_response("Good Service", None),
        );
        api.disruptions.insert("victoria".to_string(), Vec::new());

        let book = plain_book(&["victoria"]);
        let lines = [line("victoria"), line("waterloo-city")];
        let records = get_all_line_statuses(&api, &book, &lines).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, line("victoria"));
        // No fetches were issued for the skipped line.
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test]
    async fn all_fetches_failed_degrades_to_unknown() {
        let api = MockApi::default();
        let book = plain_book(&["northern"]);
        let lines = [line("northern")];

        let records = get_all_line_statuses(&api, &book, &lines).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, "Unknown");
        assert_eq!(records[0].reason, FETCH_FAILED_REASON);
        assert_eq!(
            records[0].disruptions,
            vec![DISRUPTIONS_UNAVAILABLE.to_string()]
        );
        assert!(records[0].arrivals.is_empty());
    }

    #[tokio::test]
    async fn empty_status_response_uses_no_data_reason() {
        let mut api = MockApi::default();
        api.statuses.insert("northern".to_string(), Vec::new());
        api.disruptions.insert("northern".to_string(), Vec::new());

        let book = plain_book(&["northern"]);
        let records = get_all_line_statuses(&api, &book, &[line("northern")]).await;

        assert_eq!(records[0].status, "Unknown");
        assert_eq!(records[0].reason, NO_STATUS_REASON);
    }

    #[tokio::test]
    async fn missing_line_statuses_uses_no_data_reason() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "northern".to_string(),
            vec![LineDto {
                id: Some("northern".to_string()),
                name: Some("Northern".to_string()),
                line_statuses: Vec::new(),
            }],
        );
        api.disruptions.insert("northern".to_string(), Vec::new());

        let book = plain_book(&["northern"]);
        let records = get_all_line_statuses(&api, &book, &[line("northern")]).await;

        assert_eq!(records[0].status, "Unknown");
        assert_eq!(records[0].reason, NO_STATUS_REASON);
    }

    #[tokio::test]
    async fn good_service_defaults_reason_to_no_disruption() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "victoria".to_string(),
            status_response("Good Service", None),
        );
        api.disruptions.insert("victoria".to_string(), Vec::new());

        let book = plain_book(&["victoria"]);
        let records = get_all_line_statuses(&api, &book, &[line("victoria")]).await;

        assert_eq!(records[0].status, "Good Service");
        assert_eq!(records[0].reason, NO_DISRUPTION_REASON);
    }

    #[tokio::test]
    async fn empty_disruption_feed_stays_empty() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "victoria".to_string(),
            status_response("Good Service", None),
        );
        api.disruptions.insert("victoria".to_string(), Vec::new());

        let book = plain_book(&["victoria"]);
        let records = get_all_line_statuses(&api, &book, &[line("victoria")]).await;

        // Checked and clear: an empty list, not the sentinel.
        assert!(records[0].disruptions.is_empty());
    }

    #[tokio::test]
    async fn failed_disruption_feed_yields_sentinel() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "victoria".to_string(),
            status_response("Good Service", None),
        );

        let book = plain_book(&["victoria"]);
        let records = get_all_line_statuses(&api, &book, &[line("victoria")]).await;

        assert_eq!(
            records[0].disruptions,
            vec![DISRUPTIONS_UNAVAILABLE.to_string()]
        );
    }

    #[tokio::test]
    async fn disruption_description_defaults_when_absent() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "northern".to_string(),
            status_response("Part Closure", Some("Planned works.")),
        );
        api.disruptions.insert(
            "northern".to_string(),
            vec![
                disruption("No service between Camden Town and Edgware."),
                DisruptionDto {
                    category: None,
                    description: None,
                },
            ],
        );

        let book = plain_book(&["northern"]);
        let records = get_all_line_statuses(&api, &book, &[line("northern")]).await;

        assert_eq!(
            records[0].disruptions,
            vec![
                "No service between Camden Town and Edgware.".to_string(),
                "Unknown disruption".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn arrivals_sorted_capped_and_truncated() {
        let stop = "910GWALTMCN";
        let mut api = MockApi::default();
        api.statuses.insert(
            "london-overground".to_string(),
            status_response("Good Service", None),
        );
        api.disruptions
            .insert("london-overground".to_string(), Vec::new());
        api.arrivals.insert(
            stop.to_string(),
            vec![
                prediction("Chingford", 480, "Platform 2"),
                prediction("Chingford", 125, "Platform 2"),
                prediction("Chingford", 30, "Platform 1"),
                prediction("Chingford", 900, "Platform 2"),
            ],
        );

        let book = RecipeBook::default_lines();
        let records =
            get_all_line_statuses(&api, &book, &[line("london-overground")]).await;

        let arrivals = &records[0].arrivals;
        assert_eq!(arrivals.len(), 3);
        // Ascending by the underlying seconds, minutes truncated.
        assert_eq!(arrivals[0].minutes, 0); // 30s -> due
        assert_eq!(arrivals[1].minutes, 2); // 125s -> 2 min, not 3
        assert_eq!(arrivals[2].minutes, 8); // 480s
        assert_eq!(arrivals[0].platform, "Platform 1");
    }

    #[tokio::test]
    async fn route_filter_keeps_matching_disruptions() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "london-overground".to_string(),
            status_response("Minor Delays", Some("Train fault at Hackney Downs.")),
        );
        api.disruptions.insert(
            "london-overground".to_string(),
            vec![
                disruption("Delay near Liverpool Street"),
                disruption("Strike at Euston"),
            ],
        );

        let book = RecipeBook::default_lines();
        let records =
            get_all_line_statuses(&api, &book, &[line("london-overground")]).await;

        assert_eq!(
            records[0].disruptions,
            vec!["Delay near Liverpool Street".to_string()]
        );
        // A matching disruption keeps the status-call reason.
        assert_eq!(records[0].reason, "Train fault at Hackney Downs.");
    }

    #[tokio::test]
    async fn route_filter_without_matches_overrides_reason() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "london-overground".to_string(),
            status_response("Minor Delays", Some("Strike action.")),
        );
        api.disruptions.insert(
            "london-overground".to_string(),
            vec![disruption("Strike at Euston")],
        );

        let book = RecipeBook::default_lines();
        let records =
            get_all_line_statuses(&api, &book, &[line("london-overground")]).await;

        let sentinel = "No disruptions on Liverpool St - Chingford route";
        assert_eq!(records[0].reason, sentinel);
        assert_eq!(records[0].disruptions, vec![sentinel.to_string()]);
        // The status itself is untouched by the filter.
        assert_eq!(records[0].status, "Minor Delays");
    }

    #[tokio::test]
    async fn route_filter_not_applied_to_unavailable_feed() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "london-overground".to_string(),
            status_response("Good Service", None),
        );

        let book = RecipeBook::default_lines();
        let records =
            get_all_line_statuses(&api, &book, &[line("london-overground")]).await;

        // "Couldn't check" survives instead of becoming "nothing on route".
        assert_eq!(
            records[0].disruptions,
            vec![DISRUPTIONS_UNAVAILABLE.to_string()]
        );
        assert_eq!(records[0].reason, NO_DISRUPTION_REASON);
    }

    #[tokio::test]
    async fn failed_arrivals_fetch_leaves_arrivals_empty() {
        let mut api = MockApi::default();
        api.statuses.insert(
            "london-overground".to_string(),
            status_response("Good Service", None),
        );
        api.disruptions.insert(
            "london-overground".to_string(),
            vec![disruption("Delay near Clapton")],
        );

        let book = RecipeBook::default_lines();
        let records =
            get_all_line_statuses(&api, &book, &[line("london-overground")]).await;

        assert!(records[0].arrivals.is_empty());
        // The rest of the record is unaffected.
        assert_eq!(records[0].status, "Good Service");
        assert_eq!(records[0].disruptions, vec!["Delay near Clapton".to_string()]);
    }
}
