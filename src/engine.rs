use crate::config::GateConfig;
use crate::notify::{GateEvent, Notifier};
use crate::probe::{ProbeOutcome, Prober};
use crate::tracker::ReadinessTracker;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::sleep;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateFailure {
    #[error("deadline of {limit_minutes} minute(s) exceeded while endpoints were still not ready")]
    DeadlineExceeded { limit_minutes: u64 },
    #[error("malformed endpoint entry `{endpoint}`")]
    MalformedEndpoint { endpoint: String },
    #[error("probe for `{endpoint}` failed: {source}")]
    Probe {
        endpoint: String,
        #[source]
        source: crate::probe::ProbeError,
    },
}

/// Source of "now" in epoch seconds. Production uses the system clock; tests
/// drive time by hand.
pub trait GateClock: Send + Sync {
    fn now_epoch(&self) -> i64;
}

pub struct SystemClock;

impl GateClock for SystemClock {
    fn now_epoch(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Start timestamp of one run, captured once; only ever used to measure
/// elapsed wall-clock time against the configured deadline.
pub struct RunClock {
    started_at: i64,
}

impl RunClock {
    fn start(clock: &dyn GateClock) -> Self {
        Self {
            started_at: clock.now_epoch(),
        }
    }

    fn elapsed_seconds(&self, clock: &dyn GateClock) -> i64 {
        clock.now_epoch() - self.started_at
    }

    /// Strict comparison: a run whose elapsed time lands exactly on the
    /// limit still gets one more sweep.
    fn deadline_exceeded(&self, clock: &dyn GateClock, limit_minutes: u64) -> bool {
        self.elapsed_seconds(clock) > (limit_minutes as i64).saturating_mul(60)
    }
}

/// Drives sequential sweeps of concurrent probes until every endpoint has
/// reported 200, or the run fails. One engine value owns all per-run state,
/// so independent runs never share anything.
pub struct PollEngine {
    config: GateConfig,
    tracker: ReadinessTracker,
    prober: Arc<dyn Prober>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn GateClock>,
}

impl PollEngine {
    pub fn new(config: GateConfig, prober: Arc<dyn Prober>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            tracker: ReadinessTracker::new(),
            prober,
            notifier,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn GateClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Terminal per-endpoint states, for reporting after the run ends.
    pub fn tracker(&self) -> &ReadinessTracker {
        &self.tracker
    }

    pub async fn run(&mut self) -> Result<(), GateFailure> {
        self.tracker.reset(self.config.endpoints().iter().cloned());
        let run_clock = RunClock::start(self.clock.as_ref());

        tracing::info!(
            endpoints = self.config.endpoints().len(),
            deadline_minutes = ?self.config.deadline_minutes,
            "readiness gate started"
        );

        let outcome = self.drive(&run_clock).await;
        match &outcome {
            Ok(()) => self.notifier.notify(GateEvent::RunSucceeded),
            Err(reason) => self.notifier.notify(GateEvent::RunFailed {
                reason: reason.clone(),
            }),
        }

        outcome
    }

    async fn drive(&mut self, run_clock: &RunClock) -> Result<(), GateFailure> {
        while !self.tracker.all_ready() {
            // Checked at the top of every sweep, which also covers the
            // re-check after the previous sweep's probes resolved. Once the
            // deadline has passed no new sweep starts.
            if let Some(limit_minutes) = self.config.deadline_minutes {
                if run_clock.deadline_exceeded(self.clock.as_ref(), limit_minutes) {
                    return Err(GateFailure::DeadlineExceeded { limit_minutes });
                }
            }

            let pending = self.tracker.pending();

            // Per-entry re-check: config validation guarantees a non-empty
            // list, not non-empty entries.
            for endpoint in &pending {
                if endpoint.trim().is_empty() {
                    return Err(GateFailure::MalformedEndpoint {
                        endpoint: endpoint.clone(),
                    });
                }
            }

            self.notifier.notify(GateEvent::SweepStarted {
                pending: pending.len(),
            });

            let mut probes = JoinSet::new();
            for endpoint in pending {
                let prober = Arc::clone(&self.prober);
                let timeout = self.config.request_timeout;
                probes.spawn(async move {
                    let result = prober.probe(&endpoint, timeout).await;
                    (endpoint, result)
                });
            }

            while let Some(joined) = probes.join_next().await {
                let (endpoint, result) = match joined {
                    Ok(pair) => pair,
                    Err(err) => {
                        tracing::warn!(error = %err, "probe task aborted");
                        continue;
                    }
                };

                match result {
                    Ok(status) => {
                        if status == 200 {
                            self.tracker.mark_ready(&endpoint);
                        }
                        self.notifier.notify(GateEvent::ProbeResult {
                            endpoint,
                            outcome: ProbeOutcome::Status(status),
                        });
                    }
                    Err(error) => {
                        self.notifier.notify(GateEvent::ProbeResult {
                            endpoint: endpoint.clone(),
                            outcome: ProbeOutcome::Error(error.clone()),
                        });

                        if self.config.strict_errors && !error.is_transient() {
                            // Dropping the JoinSet abandons the rest of the
                            // sweep's probes.
                            return Err(GateFailure::Probe {
                                endpoint,
                                source: error,
                            });
                        }
                    }
                }
            }

            if !self.tracker.all_ready() {
                sleep(self.config.sweep_pause).await;
            }
        }

        Ok(())
    }
}
