//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor a configured level is set.
const DEFAULT_FILTER: &str = "mcp_gateway=info,tower_http=info";

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering. If not set,
/// defaults to `mcp_gateway=info`.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Initialize the logging system with a fallback filter directive.
///
/// `RUST_LOG` still wins when it is set. A bare level such as `debug` is
/// scoped to this crate and the HTTP trace layer.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_with_filter(level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(build_filter(DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for(level)))
}

/// Expand a bare level into crate-scoped directives.
fn directive_for(level: &str) -> String {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let trimmed = level.trim();
    let lower = trimmed.to_ascii_lowercase();
    if LEVELS.contains(&lower.as_str()) {
        format!("mcp_gateway={lower},tower_http={lower}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_idempotent() {
        let _ = try_init();
        // Second call errors when already initialized; neither may panic
        let _ = try_init();
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init();

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
        tracing::error!("test error message");
    }

    #[test]
    fn test_bare_level_is_scoped() {
        assert_eq!(directive_for("debug"), "mcp_gateway=debug,tower_http=debug");
        assert_eq!(directive_for(" WARN "), "mcp_gateway=warn,tower_http=warn");
    }

    #[test]
    fn test_full_directive_passes_through() {
        assert_eq!(directive_for("mcp_gateway=trace"), "mcp_gateway=trace");
    }
}
