//! Background worker that applies click increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Drains click events and increments the matching counters.
///
/// Up to `concurrency` increments run at once. Each one is retried with
/// jittered exponential backoff; a click that still fails is logged and
/// dropped. The worker returns once every sender is gone and in-flight
/// increments have finished.
///
/// Runs on its own task, so increments survive the HTTP request that
/// triggered them.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn UrlRepository>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            record_click(repository.as_ref(), &event).await;
        });

        // Reap finished tasks so the set does not grow unbounded.
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

/// Applies a single click increment with retry.
async fn record_click(repository: &dyn UrlRepository, event: &ClickEvent) {
    let code = event.code.as_str();
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(5)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::spawn(strategy, || repository.increment_clicks(code)).await {
        Ok(()) => debug!(code, "click recorded"),
        Err(e) => {
            metrics::counter!("snaplink_clicks_failed_total").increment(1);
            warn!(code, error = %e, "failed to record click, dropping it");
        }
    }
}
