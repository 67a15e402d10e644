//! Tracing initialization
//!
//! Console output in compact form by default; `LOG_FORMAT=json` switches to
//! one JSON object per line for log shippers.

mod init;

pub use init::{init_telemetry, shutdown_telemetry, LogFormat};
