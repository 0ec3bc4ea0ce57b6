//! Logging setup and request correlation

use crate::config::ServerConfig;
use axum::http::HeaderMap;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Header carrying the caller's correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// How the server logs
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives
    pub filter: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Human
        }
    }
}

impl TelemetryConfig {
    /// Read `RUST_LOG`, `LOG_LEVEL` and `LOG_FORMAT`, falling back to
    /// `--log-level`.
    pub fn with_server_config(server_config: &ServerConfig) -> Self {
        Self {
            filter: resolve_filter(
                env::var("RUST_LOG").ok().as_deref(),
                env::var("LOG_LEVEL").ok().as_deref(),
                &server_config.log_level,
            ),
            log_format: LogFormat::parse(&env::var("LOG_FORMAT").unwrap_or_default()),
        }
    }
}

/// First non-empty of `RUST_LOG`, `LOG_LEVEL` and the configured level
fn resolve_filter(rust_log: Option<&str>, log_level: Option<&str>, configured: &str) -> String {
    [rust_log, log_level]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(configured)
        .to_string()
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &TelemetryConfig) {
    if tracing::dispatcher::has_been_set() {
        tracing::debug!("tracing subscriber already initialized, skipping");
        return;
    }

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Human => tracing_subscriber::fmt::layer().compact().boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(fmt_layer)
        .try_init();
}

/// Correlation id sent by the caller, if any
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Create the span an LDP request runs in
pub fn create_request_span(method: &str, path: &str, request_id: Option<&str>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = method,
        path = path,
        request_id = request_id,
        status = tracing::field::Empty,
        error_code = tracing::field::Empty,
    )
}

pub fn set_span_error_code(span: &tracing::Span, error_code: &str) {
    span.record("error_code", error_code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(resolve_filter(Some("ldp_core=trace"), Some("warn"), "info"), "ldp_core=trace");
        assert_eq!(resolve_filter(Some(""), Some("warn"), "info"), "warn");
        assert_eq!(resolve_filter(None, None, "debug"), "debug");
    }

    #[test]
    fn test_log_format() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(""), LogFormat::Human);
    }

    #[test]
    fn test_extract_request_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, "test-123".parse().unwrap());
        assert_eq!(extract_request_id(&headers), Some("test-123".to_string()));
        assert_eq!(extract_request_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let config = TelemetryConfig::with_server_config(&ServerConfig::default());
        init_logging(&config);
        init_logging(&config);
    }
}
