//! Helper macro enforcing consistent readygate log fields.
//!
//! Keeps the `endpoint` field present on every probe-level log so downstream
//! parsing can rely on it.

/// Log an event for a probed endpoint plus any extra fields.
#[macro_export]
macro_rules! gate_event {
    ($level:ident, $target:expr, $event:expr, endpoint = $endpoint:expr $(, $field:ident = $value:expr )* $(,)?) => {
        tracing::$level!(
            target = $target,
            event = $event,
            endpoint = %$endpoint,
            $($field = %$value,)*
        )
    };
}
