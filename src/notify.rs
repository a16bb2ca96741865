use crate::engine::GateFailure;
use crate::probe::ProbeOutcome;

/// Structured progress events. Purely observational: a notifier must never
/// influence control flow.
#[derive(Debug, Clone, PartialEq)]
pub enum GateEvent {
    SettingApplied { name: &'static str, value: String },
    SweepStarted { pending: usize },
    ProbeResult { endpoint: String, outcome: ProbeOutcome },
    RunSucceeded,
    RunFailed { reason: GateFailure },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, event: GateEvent);
}

/// Renders gate events as structured tracing records.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: GateEvent) {
        match event {
            GateEvent::SettingApplied { name, value } => {
                tracing::info!(setting = name, value = %value, "setting applied");
            }
            GateEvent::SweepStarted { pending } => {
                tracing::info!(pending, "sweep started");
            }
            GateEvent::ProbeResult { endpoint, outcome } => match outcome {
                ProbeOutcome::Status(status) => {
                    crate::gate_event!(
                        info,
                        "readygate::probe",
                        "probe_result",
                        endpoint = endpoint,
                        status = status,
                    );
                }
                ProbeOutcome::Error(error) => {
                    crate::gate_event!(
                        warn,
                        "readygate::probe",
                        "probe_error",
                        endpoint = endpoint,
                        error = error,
                    );
                }
            },
            GateEvent::RunSucceeded => {
                tracing::info!("all endpoints ready");
            }
            GateEvent::RunFailed { reason } => {
                tracing::error!(reason = %reason, "readiness gate failed");
            }
        }
    }
}
