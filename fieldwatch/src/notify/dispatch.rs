//! Bounded alert dispatch.
//!
//! Monitors submit alerts through an [`AlertDispatcher`]; a single
//! [`DispatchWorker`] drains the queue and calls the [`Notifier`]. The
//! queue is bounded and submission never blocks, so a slow or failing
//! delivery backend cannot stall the position-update path. A full queue
//! drops the alert with a warning; the next triggering event gets a
//! fresh attempt.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{AlertRequest, Notifier};

/// Default depth of the alert submission queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 128;

/// Configuration for the alert dispatcher.
#[derive(Debug, Clone)]
pub struct AlertDispatcherConfig {
    /// Maximum number of alerts waiting for delivery.
    pub queue_depth: usize,
}

impl Default for AlertDispatcherConfig {
    fn default() -> Self {
        Self {
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

/// Handle for submitting alerts to the dispatch worker.
#[derive(Clone)]
pub struct AlertDispatcher {
    tx: mpsc::Sender<AlertRequest>,
}

impl AlertDispatcher {
    /// Create a dispatcher and its worker with default settings.
    pub fn new(notifier: Arc<dyn Notifier>) -> (Self, DispatchWorker) {
        Self::with_config(notifier, AlertDispatcherConfig::default())
    }

    /// Create a dispatcher and its worker with custom settings.
    pub fn with_config(
        notifier: Arc<dyn Notifier>,
        config: AlertDispatcherConfig,
    ) -> (Self, DispatchWorker) {
        let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
        (Self { tx }, DispatchWorker { rx, notifier })
    }

    /// Submit an alert without blocking.
    ///
    /// Returns true if the alert was queued. A full or closed queue drops
    /// the alert; the caller treats that as best-effort delivery loss.
    pub fn try_submit(&self, alert: AlertRequest) -> bool {
        match self.tx.try_send(alert) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(alert)) => {
                warn!(
                    recipient = %alert.recipient_id,
                    title = %alert.title,
                    "Alert queue full, dropping alert"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(alert)) => {
                warn!(
                    recipient = %alert.recipient_id,
                    "Alert dispatch worker stopped, dropping alert"
                );
                false
            }
        }
    }
}

/// Worker that drains the alert queue and invokes the notifier.
pub struct DispatchWorker {
    rx: mpsc::Receiver<AlertRequest>,
    notifier: Arc<dyn Notifier>,
}

impl DispatchWorker {
    /// Run until shutdown is signalled or all dispatchers are dropped.
    ///
    /// In-flight deliveries complete; delivery errors are logged and the
    /// loop continues.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Alert dispatch worker starting");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Alert dispatch worker shutting down");
                    break;
                }

                maybe_alert = self.rx.recv() => {
                    match maybe_alert {
                        Some(alert) => self.deliver(alert).await,
                        None => {
                            debug!("All alert dispatchers dropped, worker exiting");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Drain and deliver everything currently queued, then return.
    ///
    /// Test seam: lets suites flush pending alerts deterministically
    /// without racing the run loop.
    pub async fn drain(&mut self) {
        while let Ok(alert) = self.rx.try_recv() {
            self.deliver(alert).await;
        }
    }

    async fn deliver(&self, alert: AlertRequest) {
        if let Err(err) = self.notifier.notify(&alert).await {
            warn!(
                recipient = %alert.recipient_id,
                title = %alert.title,
                error = %err,
                "Alert delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{DeliveryError, NotifyFuture};
    use std::sync::Mutex;

    /// Notifier that records delivered alerts.
    #[derive(Default)]
    struct RecordingNotifier {
        delivered: Mutex<Vec<AlertRequest>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify<'a>(&'a self, alert: &'a AlertRequest) -> NotifyFuture<'a> {
            Box::pin(async move {
                self.delivered.lock().unwrap().push(alert.clone());
                Ok(())
            })
        }
    }

    /// Notifier that always fails.
    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify<'a>(&'a self, _alert: &'a AlertRequest) -> NotifyFuture<'a> {
            Box::pin(async move { Err(DeliveryError::Backend("boom".into())) })
        }
    }

    fn alert(recipient: &str) -> AlertRequest {
        AlertRequest::new(recipient, "title", "body", "pp", "pso")
    }

    #[tokio::test]
    async fn test_submit_and_deliver() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (dispatcher, mut worker) = AlertDispatcher::new(notifier.clone());

        assert!(dispatcher.try_submit(alert("pso-1")));
        assert!(dispatcher.try_submit(alert("pso-2")));
        worker.drain().await;

        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].recipient_id, "pso-1");
        assert_eq!(delivered[1].recipient_id, "pso-2");
    }

    #[tokio::test]
    async fn test_full_queue_drops_alert() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = AlertDispatcherConfig { queue_depth: 1 };
        let (dispatcher, mut worker) = AlertDispatcher::with_config(notifier.clone(), config);

        assert!(dispatcher.try_submit(alert("pso-1")));
        // Queue depth 1, worker not draining: second submission is dropped
        assert!(!dispatcher.try_submit(alert("pso-2")));

        worker.drain().await;
        assert_eq!(notifier.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_worker() {
        let notifier = Arc::new(FailingNotifier);
        let (dispatcher, mut worker) = AlertDispatcher::new(notifier);

        assert!(dispatcher.try_submit(alert("pso-1")));
        assert!(dispatcher.try_submit(alert("pso-2")));
        // Both deliveries fail but drain completes without panicking
        worker.drain().await;

        // Worker still accepts new work afterwards
        assert!(dispatcher.try_submit(alert("pso-3")));
        worker.drain().await;
    }

    #[tokio::test]
    async fn test_run_loop_shutdown() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (dispatcher, worker) = AlertDispatcher::new(notifier.clone());

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(worker.run(shutdown.clone()));

        assert!(dispatcher.try_submit(alert("pso-1")));
        tokio::task::yield_now().await;

        shutdown.cancel();
        handle.await.unwrap();
    }
}
