//! Environment-variable lookups used by service `Config::from_env` constructors.

use std::str::FromStr;

/// Read a required variable.
///
/// # Panics
///
/// Panics with the variable name if it is unset or not valid UTF-8.
pub fn required(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("missing required env var {key}"))
}

/// Read and parse an optional variable, falling back to `default` when it is
/// unset or does not parse.
pub fn or_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an optional boolean flag. Accepts `1/0`, `true/false`, `yes/no`.
pub fn flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
