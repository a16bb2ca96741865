pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notify;
pub mod probe;
pub mod telemetry;
pub mod tracker;
