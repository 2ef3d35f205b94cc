//! Logging initialisation for LineBot.
//!
//! Call [`init_tracing`] once at process startup.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `LINEBOT_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |
//!
//! # Example
//!
//! ```rust,no_run
//! linebot_control::telemetry::init_tracing();
//! tracing::info!("robot up");
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output encoding of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Parse the value of `LINEBOT_LOG_FORMAT`.  Anything other than `json`
    /// selects the compact console format.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var("LINEBOT_LOG_FORMAT").ok().as_deref())
    }
}

/// Build the log filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so the per-cycle status lines on stdout stay clean.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_tracing() {
    let filter = env_filter("info");
    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parse() {
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
    }

    #[test]
    fn env_filter_falls_back_to_default_level() {
        // SAFETY: single-threaded test; no other thread reads this env-var.
        unsafe { std::env::remove_var("RUST_LOG") };
        let filter = env_filter("debug");
        assert_eq!(filter.to_string(), "debug");
    }
}
