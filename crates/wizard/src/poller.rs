//! Cancellable fixed-interval status polling.
//!
//! Once generation starts, the server owns all scenario state; the poller
//! fetches the full snapshot on a fixed cadence and hands each one to the
//! caller. Transient fetch failures are logged and the loop continues; the
//! loop ends exactly once, on the first terminal status, on cancellation,
//! or on the optional deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use reelkit_client::ScenarioBackend;
use reelkit_core::scenario::{Scenario, ScenarioStatus};
use reelkit_core::types::DbId;

/// Cadence of status polls while a scenario is generating.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The server reported a terminal status (completed, partial, failed).
    Terminal(ScenarioStatus),
    /// The cancellation token was triggered.
    Cancelled,
    /// The configured deadline elapsed before a terminal status arrived.
    /// The scenario may still be generating server-side.
    TimedOut,
}

/// Status polling loop for one generating scenario.
pub struct StatusPoller {
    backend: Arc<dyn ScenarioBackend>,
    scenario_id: DbId,
    interval: Duration,
    max_duration: Option<Duration>,
}

impl StatusPoller {
    /// Create a poller with the default 3-second cadence and no deadline.
    pub fn new(backend: Arc<dyn ScenarioBackend>, scenario_id: DbId) -> Self {
        Self {
            backend,
            scenario_id,
            interval: DEFAULT_POLL_INTERVAL,
            max_duration: None,
        }
    }

    /// Override the polling cadence.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Give up after this much wall-clock time without a terminal status.
    /// Without a deadline the poller runs until terminal or cancelled.
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    /// Run the loop until a terminal status, cancellation, or the deadline.
    ///
    /// Every successfully fetched snapshot is passed to `on_snapshot`,
    /// including the terminal one. Fetch failures are logged and the loop
    /// continues: a transient network blip must not abort an
    /// otherwise-successful background generation.
    pub async fn run(
        &self,
        cancel: CancellationToken,
        mut on_snapshot: impl FnMut(Scenario),
    ) -> PollOutcome {
        // The first fetch happens one full interval after the start, not
        // immediately; generation never finishes that fast.
        let started = tokio::time::Instant::now();
        let mut ticker = tokio::time::interval_at(started + self.interval, self.interval);
        tracing::debug!(
            scenario_id = self.scenario_id,
            interval_ms = self.interval.as_millis() as u64,
            "Status poller started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(scenario_id = self.scenario_id, "Status poller cancelled");
                    return PollOutcome::Cancelled;
                }
                _ = ticker.tick() => {
                    if let Some(max) = self.max_duration {
                        if started.elapsed() >= max {
                            tracing::warn!(
                                scenario_id = self.scenario_id,
                                "Status poller deadline elapsed before a terminal status",
                            );
                            return PollOutcome::TimedOut;
                        }
                    }

                    match self.backend.fetch_status(self.scenario_id).await {
                        Ok(snapshot) => {
                            let status = snapshot.status;
                            on_snapshot(snapshot);
                            if status.is_terminal() {
                                tracing::info!(
                                    scenario_id = self.scenario_id,
                                    status = status.as_str(),
                                    "Scenario reached terminal status",
                                );
                                return PollOutcome::Terminal(status);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                scenario_id = self.scenario_id,
                                error = %e,
                                "Status poll failed; continuing",
                            );
                        }
                    }
                }
            }
        }
    }
}
