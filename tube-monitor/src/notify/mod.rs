//! Report delivery.
//!
//! The monitor hands each formatted report to a `ReportSink`; Telegram is
//! the production sink. Delivery is best-effort: bounded retries, then
//! the failure is returned to the caller and logged. A lost report is
//! acceptable; a crashed monitor is not.

mod error;
mod telegram;

pub use error::DeliveryError;
pub use telegram::{TelegramConfig, TelegramNotifier};

/// Destination for formatted status reports.
///
/// This abstraction allows the monitor to be tested without a live chat;
/// `TelegramNotifier` is the production implementation.
#[allow(async_fn_in_trait)]
pub trait ReportSink {
    /// Deliver one report. Markup follows Telegram's HTML parse mode.
    async fn publish(&self, message: &str) -> Result<(), DeliveryError>;
}
