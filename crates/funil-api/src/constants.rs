//! API path prefixes

/// Session-authenticated surface used by the web application
pub const API_BASE: &str = "/api";

/// Public REST surface authenticated with tenant API keys
pub const API_PREFIX: &str = "/api/v1";

/// Service name reported in logs
pub const SERVICE_NAME: &str = "funil-api";
