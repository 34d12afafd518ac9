//! Long-poll bridge between runner requests and the queue.

use std::sync::Arc;
use std::time::Duration;

use carousel_core::DispatchResult;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::{QueueResult, RunnerQueue};

/// Polling cadence for [`JobPoller`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between empty dequeues.
    pub interval: Duration,
    /// Pause after a storage error before trying again.
    pub error_backoff: Duration,
    /// How long one `poll` call keeps trying before reporting no work.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            error_backoff: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Re-polls a runner queue until a build arrives or the deadline passes.
///
/// Transient storage errors inside the window are logged and retried; the
/// queue itself never retries. An error still standing at the deadline is
/// surfaced to the caller.
pub struct JobPoller {
    queue: Arc<RunnerQueue>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(queue: Arc<RunnerQueue>) -> Self {
        Self::with_config(queue, PollConfig::default())
    }

    pub fn with_config(queue: Arc<RunnerQueue>, config: PollConfig) -> Self {
        Self { queue, config }
    }

    /// Dequeue with retries until the configured timeout.
    ///
    /// Returns `Ok(None)` when the deadline passed with no work queued; the
    /// runner protocol layer turns that into an empty poll response. Always
    /// makes at least one dequeue attempt.
    pub async fn poll(&self) -> QueueResult<Option<DispatchResult>> {
        let deadline = Instant::now() + self.config.timeout;

        loop {
            match self.queue.dequeue().await {
                Ok(Some(dispatch)) => {
                    debug!(
                        runner_id = %self.queue.runner(),
                        build_id = %dispatch.build_id,
                        "Poll satisfied"
                    );
                    return Ok(Some(dispatch));
                }
                Ok(None) => {
                    if Instant::now() + self.config.interval >= deadline {
                        return Ok(None);
                    }
                    sleep(self.config.interval).await;
                }
                Err(e) => {
                    warn!(
                        runner_id = %self.queue.runner(),
                        error = %e,
                        "Dequeue failed, backing off"
                    );
                    if Instant::now() + self.config.error_backoff >= deadline {
                        return Err(e);
                    }
                    sleep(self.config.error_backoff).await;
                }
            }
        }
    }
}
