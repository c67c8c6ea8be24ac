use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a tracing filter directive.
///
/// Unrecognised names fall back to `"info"`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Log lines go to stderr; stdout carries only the usage message.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive_known_levels() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
    }

    #[test]
    fn test_level_directive_is_case_insensitive() {
        assert_eq!(level_directive("warning"), "warn");
        assert_eq!(level_directive("Debug"), "debug");
    }

    #[test]
    fn test_level_directive_unknown_falls_back_to_info() {
        assert_eq!(level_directive("CRITICAL"), "info");
        assert_eq!(level_directive(""), "info");
    }

    #[test]
    fn test_setup_logging_twice_reports_error() {
        // Only one global subscriber can be installed per process.
        let _ = setup_logging("ERROR");
        assert!(setup_logging("ERROR").is_err());
    }
}
