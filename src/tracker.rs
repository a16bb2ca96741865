use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointState {
    NotReady,
    Ready,
}

impl EndpointState {
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointState::NotReady => "NOT_READY",
            EndpointState::Ready => "READY",
        }
    }
}

/// Per-run bookkeeping of which endpoints have reported success.
///
/// Entries only ever move NotReady -> Ready, and the key set stays equal to
/// the configured endpoint list for the lifetime of a run.
#[derive(Debug, Default)]
pub struct ReadinessTracker {
    states: BTreeMap<String, EndpointState>,
}

impl ReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run: every given endpoint begins NotReady.
    pub fn reset<I, S>(&mut self, endpoints: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.clear();
        for endpoint in endpoints {
            self.states.insert(endpoint.into(), EndpointState::NotReady);
        }
    }

    /// Idempotent; returns whether this call performed the transition. An
    /// untracked key is a safe no-op since this is purely bookkeeping.
    pub fn mark_ready(&mut self, endpoint: &str) -> bool {
        match self.states.get_mut(endpoint) {
            Some(state @ EndpointState::NotReady) => {
                *state = EndpointState::Ready;
                true
            }
            _ => false,
        }
    }

    pub fn all_ready(&self) -> bool {
        self.states
            .values()
            .all(|state| *state == EndpointState::Ready)
    }

    pub fn state(&self, endpoint: &str) -> Option<EndpointState> {
        self.states.get(endpoint).copied()
    }

    /// Endpoints still awaiting a 200, in configured order.
    pub fn pending(&self) -> Vec<String> {
        self.states
            .iter()
            .filter(|(_, state)| **state == EndpointState::NotReady)
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    pub fn snapshot(&self) -> Vec<(String, EndpointState)> {
        self.states
            .iter()
            .map(|(endpoint, state)| (endpoint.clone(), *state))
            .collect()
    }
}
