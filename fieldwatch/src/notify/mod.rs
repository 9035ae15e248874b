//! Alert delivery seam.
//!
//! The tracking core decides *when* to alert; delivery belongs to a
//! [`Notifier`] implementation. The bundled [`LogNotifier`] writes alerts
//! to the tracing log. Production implementations are expected to push to
//! devices and persist a [`NotificationRecord`] as a side effect; the core
//! only supplies the fields.
//!
//! Alerts are submitted through an [`AlertDispatcher`] so that delivery
//! latency never stalls the position-update path.

mod dispatch;
mod record;

pub use dispatch::{AlertDispatcher, AlertDispatcherConfig, DispatchWorker, DEFAULT_QUEUE_DEPTH};
pub use record::NotificationRecord;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

/// A single alert to deliver.
#[derive(Debug, Clone)]
pub struct AlertRequest {
    /// Entity the alert is addressed to.
    pub recipient_id: String,
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub body: String,
    /// Supervisor name for context (may equal the recipient's name).
    pub supervisor_name: String,
    /// Subordinate name for context (may equal the recipient's name).
    pub subordinate_name: String,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
}

impl AlertRequest {
    /// Build an alert raised now.
    pub fn new(
        recipient_id: &str,
        title: &str,
        body: &str,
        supervisor_name: &str,
        subordinate_name: &str,
    ) -> Self {
        Self {
            recipient_id: recipient_id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            supervisor_name: supervisor_name.to_string(),
            subordinate_name: subordinate_name.to_string(),
            raised_at: Utc::now(),
        }
    }

    /// The durable record shape for this alert.
    pub fn to_record(&self) -> NotificationRecord {
        NotificationRecord::from_alert(self)
    }
}

/// Errors from alert delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No delivery address (push token, etc.) known for the recipient.
    #[error("no delivery address for recipient {0}")]
    NoRecipientAddress(String),
    /// The delivery backend rejected or failed the send.
    #[error("delivery backend error: {0}")]
    Backend(String),
    /// Persisting the notification record failed.
    #[error("failed to persist notification record: {0}")]
    RecordPersist(String),
}

/// Boxed future returned by [`Notifier::notify`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;

/// Delivery backend for alerts.
///
/// Implementations own both delivery and durable logging of the
/// notification. Delivery is best effort: a failure is logged by the
/// dispatcher and the next triggering event gets a fresh attempt.
pub trait Notifier: Send + Sync {
    /// Deliver one alert.
    fn notify<'a>(&'a self, alert: &'a AlertRequest) -> NotifyFuture<'a>;
}

/// Notifier that writes alerts to the tracing log.
///
/// Used by the CLI runner and as a stand-in where no push backend is
/// configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a log-backed notifier.
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn notify<'a>(&'a self, alert: &'a AlertRequest) -> NotifyFuture<'a> {
        Box::pin(async move {
            let record = alert.to_record();
            info!(
                recipient = %alert.recipient_id,
                title = %alert.title,
                body = %alert.body,
                supervisor = %alert.supervisor_name,
                subordinate = %alert.subordinate_name,
                date = %record.date,
                time = %record.time,
                "Alert delivered"
            );
            Ok(())
        })
    }
}
