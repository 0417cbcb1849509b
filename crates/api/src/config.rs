use std::fmt::Display;
use std::str::FromStr;

use timeline_core::notification::DEFAULT_DUE_WINDOW_DAYS;

use crate::auth::jwt::JwtConfig;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;

/// Server settings, read once at startup.
///
/// Only `JWT_SECRET` has no default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// From comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Grace period for background tasks after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub min_password_length: usize,
    /// Reminder window for the milestone-due sweep, in days.
    pub milestone_due_window_days: i64,
    pub milestone_sweep_interval_secs: u64,
    pub session_cleanup_interval_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `10`                    |
    /// | `MIN_PASSWORD_LENGTH`           | `8`                     |
    /// | `MILESTONE_DUE_WINDOW_DAYS`     | `3`                     |
    /// | `MILESTONE_SWEEP_INTERVAL_SECS` | `3600`                  |
    /// | `SESSION_CLEANUP_INTERVAL_SECS` | `3600`                  |
    ///
    /// plus the variables read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on an unparsable value or a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 10),
            min_password_length: env_or("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH),
            milestone_due_window_days: env_or("MILESTONE_DUE_WINDOW_DAYS", DEFAULT_DUE_WINDOW_DAYS),
            milestone_sweep_interval_secs: env_or("MILESTONE_SWEEP_INTERVAL_SECS", 3600),
            session_cleanup_interval_secs: env_or("SESSION_CLEANUP_INTERVAL_SECS", 3600),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Read and parse `name`, falling back to `default` when unset.
///
/// # Panics
///
/// Panics when the variable is set but does not parse as `T`.
pub fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" http://a.test ,,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn unset_variable_uses_default() {
        assert_eq!(env_or("TIMELINE_TEST_SURELY_UNSET_VAR", 42u64), 42);
    }
}
