//! Telegram report delivery.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::info;

use crate::retry::{self, RetryPolicy};

use super::error::DeliveryError;
use super::ReportSink;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token.
    pub token: String,
    /// Chat that receives the reports.
    pub chat_id: i64,
    /// Retry policy for sends.
    pub retry: RetryPolicy,
}

impl TelegramConfig {
    /// Create a config with the default retry policy.
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            token: token.into(),
            chat_id,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy for sends.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Sends status reports to a Telegram chat.
///
/// Sending uses the shared bounded-retry policy; a send that still fails
/// after the final attempt surfaces as a `DeliveryError`.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
    retry: RetryPolicy,
}

impl TelegramNotifier {
    /// Create a notifier from the given configuration.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            bot: Bot::new(config.token),
            chat_id: ChatId(config.chat_id),
            retry: config.retry,
        }
    }
}

impl ReportSink for TelegramNotifier {
    async fn publish(&self, message: &str) -> Result<(), DeliveryError> {
        let sent = retry::with_retries(&self.retry, "telegram send", || {
            let request = self
                .bot
                .send_message(self.chat_id, message)
                .parse_mode(ParseMode::Html);
            async move { request.await.map(|_| ()) }
        })
        .await;

        match sent {
            Some(()) => {
                info!(chat_id = self.chat_id.0, "status report delivered");
                Ok(())
            }
            None => Err(DeliveryError {
                attempts: self.retry.max_attempts,
            }),
        }
    }
}
