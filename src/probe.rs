use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// Retryable: network failure, timeout, malformed response. The endpoint
    /// may simply not be up yet.
    #[error("transient probe failure: {0}")]
    Transient(String),
    /// Not retryable: the request could not even be constructed.
    #[error("fatal probe failure: {0}")]
    Fatal(String),
}

impl ProbeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::Transient(_))
    }
}

/// What a single probe produced, for notification purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Status(u16),
    Error(ProbeError),
}

/// Issues one HTTP GET against an endpoint, bounded by the given timeout.
/// The engine only ever inspects "status 200" versus everything else.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, endpoint: &str, timeout: Duration) -> Result<u16, ProbeError>;
}

pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new() -> crate::error::Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &str, timeout: Duration) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        Ok(response.status().as_u16())
    }
}

fn classify(err: reqwest::Error) -> ProbeError {
    // A builder error means the request never left the process (e.g. an
    // unparseable URL); retrying it can never succeed.
    if err.is_builder() {
        ProbeError::Fatal(err.to_string())
    } else {
        ProbeError::Transient(err.to_string())
    }
}
