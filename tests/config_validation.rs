mod common;

use common::RecordingNotifier;
use readygate::config::{
    GateConfig, GateConfigError, RawGateConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SWEEP_PAUSE,
};
use readygate::notify::GateEvent;
use std::time::Duration;

fn resolve(raw: RawGateConfig) -> Result<GateConfig, GateConfigError> {
    GateConfig::resolve(raw, &RecordingNotifier::new())
}

fn raw_with_endpoints(endpoints: &str) -> RawGateConfig {
    RawGateConfig {
        endpoints: Some(endpoints.to_string()),
        ..RawGateConfig::default()
    }
}

#[test]
fn missing_endpoints_fail() {
    assert_eq!(
        resolve(RawGateConfig::default()).unwrap_err(),
        GateConfigError::EmptyEndpoints
    );
}

#[test]
fn whitespace_only_endpoints_fail() {
    assert_eq!(
        resolve(raw_with_endpoints("   \t ")).unwrap_err(),
        GateConfigError::EmptyEndpoints
    );
}

#[test]
fn endpoints_split_on_whitespace_in_order() {
    let config = resolve(raw_with_endpoints("http://a  http://b\thttp://c")).unwrap();
    assert_eq!(config.endpoints(), ["http://a", "http://b", "http://c"]);
}

#[test]
fn timeout_defaults_and_parses_integer_seconds() {
    let config = resolve(raw_with_endpoints("http://a")).unwrap();
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);

    let mut raw = raw_with_endpoints("http://a");
    raw.http_timeout = Some("5".to_string());
    assert_eq!(resolve(raw).unwrap().request_timeout, Duration::from_secs(5));
}

#[test]
fn non_integer_or_zero_timeout_is_rejected() {
    let mut raw = raw_with_endpoints("http://a");
    raw.http_timeout = Some("soon".to_string());
    assert_eq!(
        resolve(raw).unwrap_err(),
        GateConfigError::InvalidTimeout {
            raw: "soon".to_string()
        }
    );

    let mut raw = raw_with_endpoints("http://a");
    raw.http_timeout = Some("0".to_string());
    assert!(matches!(
        resolve(raw).unwrap_err(),
        GateConfigError::InvalidTimeout { .. }
    ));
}

#[test]
fn deadline_defaults_to_fifteen_minutes() {
    let config = resolve(raw_with_endpoints("http://a")).unwrap();
    assert_eq!(config.deadline_minutes, Some(15));
}

#[test]
fn deadline_accepts_minutes_and_explicit_forever() {
    let mut raw = raw_with_endpoints("http://a");
    raw.max_wait_minutes = Some("3".to_string());
    assert_eq!(resolve(raw).unwrap().deadline_minutes, Some(3));

    for forever in ["none", "off", "NONE", "0"] {
        let mut raw = raw_with_endpoints("http://a");
        raw.max_wait_minutes = Some(forever.to_string());
        assert_eq!(
            resolve(raw).unwrap().deadline_minutes,
            None,
            "`{forever}` should disable the deadline"
        );
    }
}

#[test]
fn garbage_deadline_is_rejected() {
    let mut raw = raw_with_endpoints("http://a");
    raw.max_wait_minutes = Some("later".to_string());
    assert_eq!(
        resolve(raw).unwrap_err(),
        GateConfigError::InvalidDeadline {
            raw: "later".to_string()
        }
    );
}

#[test]
fn strict_flag_defaults_off_and_parses_booleans() {
    let config = resolve(raw_with_endpoints("http://a")).unwrap();
    assert!(!config.strict_errors);

    let mut raw = raw_with_endpoints("http://a");
    raw.strict_errors = Some("true".to_string());
    assert!(resolve(raw).unwrap().strict_errors);

    let mut raw = raw_with_endpoints("http://a");
    raw.strict_errors = Some("maybe".to_string());
    assert!(matches!(
        resolve(raw).unwrap_err(),
        GateConfigError::InvalidStrictFlag { .. }
    ));
}

#[test]
fn sweep_pause_defaults_and_parses_humantime() {
    let config = resolve(raw_with_endpoints("http://a")).unwrap();
    assert_eq!(config.sweep_pause, DEFAULT_SWEEP_PAUSE);

    let mut raw = raw_with_endpoints("http://a");
    raw.sweep_pause = Some("250ms".to_string());
    assert_eq!(
        resolve(raw).unwrap().sweep_pause,
        Duration::from_millis(250)
    );

    let mut raw = raw_with_endpoints("http://a");
    raw.sweep_pause = Some("soon".to_string());
    assert!(matches!(
        resolve(raw).unwrap_err(),
        GateConfigError::InvalidSweepPause { .. }
    ));
}

#[test]
fn each_resolved_setting_emits_one_applied_event() {
    let notifier = RecordingNotifier::new();
    GateConfig::resolve(raw_with_endpoints("http://a http://b"), &notifier).unwrap();

    let names: Vec<&'static str> = notifier
        .events()
        .into_iter()
        .map(|event| match event {
            GateEvent::SettingApplied { name, .. } => name,
            other => panic!("unexpected event during resolve: {other:?}"),
        })
        .collect();

    assert_eq!(
        names,
        [
            "endpoints",
            "http_timeout",
            "max_wait_minutes",
            "strict_errors",
            "sweep_pause"
        ]
    );
}

#[test]
fn validation_failure_stops_event_emission() {
    let notifier = RecordingNotifier::new();
    let mut raw = raw_with_endpoints("http://a");
    raw.http_timeout = Some("nope".to_string());

    GateConfig::resolve(raw, &notifier).unwrap_err();
    assert_eq!(notifier.events().len(), 1, "only the endpoints setting applied");
}
