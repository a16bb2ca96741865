#![allow(dead_code)]

use async_trait::async_trait;
use readygate::engine::GateClock;
use readygate::notify::{GateEvent, Notifier};
use readygate::probe::{ProbeError, Prober};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ProbeScript = VecDeque<Result<u16, ProbeError>>;

/// Scripted prober: each endpoint pops its queued results in order; the last
/// result repeats for every later sweep.
#[derive(Default)]
pub struct MockProber {
    scripts: Mutex<HashMap<String, ProbeScript>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn always(self, endpoint: &str, result: Result<u16, ProbeError>) -> Self {
        self.sequence(endpoint, vec![result])
    }

    pub fn sequence(self, endpoint: &str, results: Vec<Result<u16, ProbeError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), results.into());
        self
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe(&self, endpoint: &str, _timeout: Duration) -> Result<u16, ProbeError> {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(endpoint) {
            Some(script) if script.len() > 1 => script.pop_front().expect("non-empty script"),
            Some(script) => script
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ProbeError::Transient(format!("empty script for {endpoint}")))),
            None => Err(ProbeError::Transient(format!("no script for {endpoint}"))),
        }
    }
}

/// Collects every event so tests can assert on the notification stream.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<GateEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GateEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: GateEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Hand-driven epoch clock.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_epoch: i64) -> Self {
        Self {
            now: AtomicI64::new(start_epoch),
        }
    }

    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl GateClock for ManualClock {
    fn now_epoch(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Wraps a prober so every probe advances the manual clock, letting deadline
/// scenarios play out without real waiting.
pub struct TickingProber {
    inner: Arc<dyn Prober>,
    clock: Arc<ManualClock>,
    tick_seconds: i64,
}

impl TickingProber {
    pub fn new(inner: Arc<dyn Prober>, clock: Arc<ManualClock>, tick_seconds: i64) -> Self {
        Self {
            inner,
            clock,
            tick_seconds,
        }
    }
}

#[async_trait]
impl Prober for TickingProber {
    async fn probe(&self, endpoint: &str, timeout: Duration) -> Result<u16, ProbeError> {
        self.clock.advance(self.tick_seconds);
        self.inner.probe(endpoint, timeout).await
    }
}
