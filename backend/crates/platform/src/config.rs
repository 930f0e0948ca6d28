//! Environment configuration helpers
//!
//! Small readers used by the `*Config::from_env` constructors. Invalid values
//! are logged and replaced by the default instead of aborting startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Trimmed, non-empty value of `key`.
pub fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First non-empty value among `keys`, in order.
pub fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env_string(key))
}

/// Parse `key` into `T`, falling back to `default` when unset or invalid.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match env_string(key) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, value = %raw, error = %e, "Invalid environment value, using default");
                default
            }
        },
        None => default,
    }
}

/// Boolean flag: `1`, `true`, `yes`, `on` (any case) are true.
pub fn env_flag(key: &str, default: bool) -> bool {
    match env_string(key) {
        Some(raw) => matches!(
            raw.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

/// Comma-separated list with blanks removed.
pub fn env_list(key: &str) -> Vec<String> {
    env_string(key)
        .map(|raw| split_list(&raw))
        .unwrap_or_default()
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
