//! Per-line fetch recipes.
//!
//! Every monitored line maps to a recipe describing what the aggregator
//! fetches beyond status and disruptions: an optional arrivals stop and
//! an optional disruption route filter. The default book reproduces the
//! lines this monitor has always watched.

use std::collections::HashMap;

use crate::domain::{LineId, StopPointId};

/// Walthamstow Central (London Overground), used for arrival predictions.
const WALTHAMSTOW_CENTRAL: &str = "910GWALTMCN";

/// Keyword filter narrowing a line-wide disruption feed to one route.
///
/// TfL reports disruptions for the whole London Overground network, but
/// riders on one branch only care about stations along it. A filter keeps
/// disruption texts mentioning any of its keywords; when nothing matches,
/// the line's disruption list and reason are replaced with a fixed
/// "nothing on this route" message.
#[derive(Debug, Clone)]
pub struct RouteFilter {
    /// Lowercase substrings matched against disruption text.
    keywords: Vec<String>,

    /// Message used for both the reason and the disruption list when no
    /// disruption mentions the route.
    no_disruption_message: String,
}

impl RouteFilter {
    /// Create a filter from keywords and a no-disruption message.
    ///
    /// Keywords are matched case-insensitively as substrings.
    pub fn new<I, S>(keywords: I, no_disruption_message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            no_disruption_message: no_disruption_message.into(),
        }
    }

    /// The Liverpool Street - Chingford route on the London Overground.
    pub fn chingford_route() -> Self {
        Self::new(
            [
                "liverpool street",
                "bethnal green",
                "cambridge heath",
                "london fields",
                "hackney downs",
                "clapton",
                "st james street",
                "walthamstow",
                "wood street",
                "highams park",
                "chingford",
            ],
            "No disruptions on Liverpool St - Chingford route",
        )
    }

    /// Message reported when nothing on the route is disrupted.
    pub fn no_disruption_message(&self) -> &str {
        &self.no_disruption_message
    }

    /// Whether a disruption text mentions this route.
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k))
    }

    /// Keep only disruption texts mentioning this route.
    pub fn filter(&self, disruptions: Vec<String>) -> Vec<String> {
        disruptions.into_iter().filter(|d| self.matches(d)).collect()
    }
}

/// What to fetch for one monitored line.
///
/// The default recipe is status + disruptions only.
#[derive(Debug, Clone, Default)]
pub struct LineRecipe {
    /// Stop point to fetch arrival predictions for, if any.
    pub arrivals_stop: Option<StopPointId>,

    /// Route filter applied to the disruption list, if any.
    pub route_filter: Option<RouteFilter>,
}

/// Mapping from line id to fetch recipe.
///
/// Lines without a recipe are not monitored: the aggregator skips them
/// rather than failing the batch.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<LineId, LineRecipe>,
}

impl RecipeBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipe for a line.
    pub fn add(&mut self, line: LineId, recipe: LineRecipe) {
        self.recipes.insert(line, recipe);
    }

    /// Look up the recipe for a line.
    pub fn recipe_for(&self, line: &LineId) -> Option<&LineRecipe> {
        self.recipes.get(line)
    }

    /// Number of lines with a recipe.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if no line has a recipe.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// The default monitored lines: Northern and Victoria with plain
    /// status + disruption checks, London Overground with Walthamstow
    /// Central arrivals and the Chingford route filter.
    pub fn default_lines() -> Self {
        let mut book = Self::new();

        for id in ["northern", "victoria"] {
            if let Ok(line) = LineId::parse(id) {
                book.add(line, LineRecipe::default());
            }
        }

        if let (Ok(line), Ok(stop)) = (
            LineId::parse("london-overground"),
            StopPointId::new(WALTHAMSTOW_CENTRAL.to_string()),
        ) {
            book.add(
                line,
                LineRecipe {
                    arrivals_stop: Some(stop),
                    route_filter: Some(RouteFilter::chingford_route()),
                },
            );
        }

        book
    }
}
