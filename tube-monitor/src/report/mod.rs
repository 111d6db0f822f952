//! Report production: aggregation and rendering.
//!
//! The aggregator fans out over all monitored lines, runs each line's
//! fetch recipe, and produces one `LineStatus` record per line. The
//! formatter renders the batch into the Telegram HTML message. Rendering
//! is pure, so the whole pipeline tests without a network.

mod aggregate;
mod format;
mod recipe;

pub use aggregate::{StatusApi, get_all_line_statuses};
pub use format::format_status_message;
pub use recipe::{LineRecipe, RecipeBook, RouteFilter};
