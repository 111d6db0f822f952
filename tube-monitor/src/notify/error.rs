//! Delivery error types.

/// Error returned when a report could not be delivered.
///
/// The notifier has already retried by the time this is produced, so the
/// only recovery is to log it and wait for the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("report delivery failed after {attempts} attempts")]
pub struct DeliveryError {
    /// How many sends were attempted.
    pub attempts: u32,
}
