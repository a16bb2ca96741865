use crate::error::Context;
use crate::notify::{GateEvent, Notifier};
use config::{Config, ConfigError, Environment};
use humantime::parse_duration;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_WAIT_MINUTES: u64 = 15;
pub const DEFAULT_SWEEP_PAUSE: Duration = Duration::from_millis(500);

/// Raw environment-derived settings, before validation.
///
/// Populated from `READYGATE_*` variables: `READYGATE_ENDPOINTS` is a
/// space-delimited URL list, `READYGATE_HTTP_TIMEOUT` an integer of seconds,
/// `READYGATE_MAX_WAIT_MINUTES` an integer of minutes (or `none`/`off`),
/// `READYGATE_STRICT_ERRORS` a boolean and `READYGATE_SWEEP_PAUSE` a
/// humantime duration such as `250ms`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGateConfig {
    #[serde(default)]
    pub endpoints: Option<String>,
    #[serde(default)]
    pub http_timeout: Option<String>,
    #[serde(default)]
    pub max_wait_minutes: Option<String>,
    #[serde(default)]
    pub strict_errors: Option<String>,
    #[serde(default)]
    pub sweep_pause: Option<String>,
}

impl RawGateConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("READYGATE"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateConfigError {
    #[error("no endpoints configured: set READYGATE_ENDPOINTS to a space-delimited URL list")]
    EmptyEndpoints,
    #[error("invalid HTTP timeout `{raw}`: expected a positive integer of seconds")]
    InvalidTimeout { raw: String },
    #[error("invalid deadline `{raw}`: expected an integer of minutes, `none` or `off`")]
    InvalidDeadline { raw: String },
    #[error("invalid strict-errors flag `{raw}`: expected `true` or `false`")]
    InvalidStrictFlag { raw: String },
    #[error("invalid sweep pause `{raw}`: expected a duration such as `250ms`")]
    InvalidSweepPause { raw: String },
}

/// Validated gate settings. The endpoint list is immutable after
/// construction; everything else is an ordinary tuning knob.
#[derive(Debug, Clone)]
pub struct GateConfig {
    endpoints: Vec<String>,
    pub request_timeout: Duration,
    /// `None` means poll forever.
    pub deadline_minutes: Option<u64>,
    pub strict_errors: bool,
    pub sweep_pause: Duration,
}

impl GateConfig {
    /// Load and validate settings from `READYGATE_*` environment variables.
    pub fn from_env(notifier: &dyn Notifier) -> crate::error::Result<Self> {
        let raw = RawGateConfig::load()
            .context("failed to load configuration from the environment")?;
        Ok(Self::resolve(raw, notifier)?)
    }

    /// Validate raw environment input, emitting a `SettingApplied` event per
    /// successfully resolved setting.
    pub fn resolve(raw: RawGateConfig, notifier: &dyn Notifier) -> Result<Self, GateConfigError> {
        let endpoints = resolve_endpoints(raw.endpoints.as_deref())?;
        notifier.notify(GateEvent::SettingApplied {
            name: "endpoints",
            value: endpoints.join(" "),
        });

        let request_timeout = resolve_timeout(raw.http_timeout.as_deref())?;
        notifier.notify(GateEvent::SettingApplied {
            name: "http_timeout",
            value: humantime::format_duration(request_timeout).to_string(),
        });

        let deadline_minutes = resolve_deadline(raw.max_wait_minutes.as_deref())?;
        notifier.notify(GateEvent::SettingApplied {
            name: "max_wait_minutes",
            value: match deadline_minutes {
                Some(minutes) => minutes.to_string(),
                None => "none".to_string(),
            },
        });

        let strict_errors = resolve_strict_flag(raw.strict_errors.as_deref())?;
        notifier.notify(GateEvent::SettingApplied {
            name: "strict_errors",
            value: strict_errors.to_string(),
        });

        let sweep_pause = resolve_sweep_pause(raw.sweep_pause.as_deref())?;
        notifier.notify(GateEvent::SettingApplied {
            name: "sweep_pause",
            value: humantime::format_duration(sweep_pause).to_string(),
        });

        Ok(Self {
            endpoints,
            request_timeout,
            deadline_minutes,
            strict_errors,
            sweep_pause,
        })
    }

    /// Programmatic construction with defaults for everything but the
    /// endpoint list. Entries are taken as-is, without the whitespace
    /// splitting `resolve` applies to raw input.
    pub fn for_endpoints<I, S>(endpoints: I) -> Result<Self, GateConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoints: Vec<String> = endpoints.into_iter().map(Into::into).collect();
        if endpoints.is_empty() {
            return Err(GateConfigError::EmptyEndpoints);
        }

        Ok(Self {
            endpoints,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            deadline_minutes: Some(DEFAULT_MAX_WAIT_MINUTES),
            strict_errors: false,
            sweep_pause: DEFAULT_SWEEP_PAUSE,
        })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

fn resolve_endpoints(raw: Option<&str>) -> Result<Vec<String>, GateConfigError> {
    let endpoints: Vec<String> = raw
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    if endpoints.is_empty() {
        return Err(GateConfigError::EmptyEndpoints);
    }

    Ok(endpoints)
}

fn resolve_timeout(raw: Option<&str>) -> Result<Duration, GateConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_REQUEST_TIMEOUT);
    };

    let seconds: u64 = value.trim().parse().map_err(|_| GateConfigError::InvalidTimeout {
        raw: value.to_string(),
    })?;
    if seconds == 0 {
        return Err(GateConfigError::InvalidTimeout {
            raw: value.to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

fn resolve_deadline(raw: Option<&str>) -> Result<Option<u64>, GateConfigError> {
    let Some(value) = raw else {
        return Ok(Some(DEFAULT_MAX_WAIT_MINUTES));
    };

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("none") || trimmed.eq_ignore_ascii_case("off") || trimmed == "0"
    {
        return Ok(None);
    }

    let minutes: u64 = trimmed.parse().map_err(|_| GateConfigError::InvalidDeadline {
        raw: value.to_string(),
    })?;

    Ok(Some(minutes))
}

fn resolve_strict_flag(raw: Option<&str>) -> Result<bool, GateConfigError> {
    let Some(value) = raw else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(GateConfigError::InvalidStrictFlag {
            raw: value.to_string(),
        }),
    }
}

fn resolve_sweep_pause(raw: Option<&str>) -> Result<Duration, GateConfigError> {
    let Some(value) = raw else {
        return Ok(DEFAULT_SWEEP_PAUSE);
    };

    parse_duration(value.trim()).map_err(|_| GateConfigError::InvalidSweepPause {
        raw: value.to_string(),
    })
}
