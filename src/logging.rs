use tracing_subscriber::EnvFilter;

/// Crates whose events reach the log: the CLI and both libraries.
const CRATE_TARGETS: &[&str] = &["proxima", "proxima_io", "proxima_match"];

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info, command progress and written files
/// - 2 (-vv)  -> debug, per-run search statistics
/// - 3+ (-vvv)-> trace, cache construction
///
/// `RUST_LOG` env var overrides the CLI flag if set. Logs go to stderr so
/// that `proxima match` without `--output` can pipe its JSON on stdout.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}

fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn default_directives(verbosity: u8) -> String {
    let level = level(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(level(0), "warn");
        assert_eq!(level(1), "info");
        assert_eq!(level(2), "debug");
        assert_eq!(level(3), "trace");
        assert_eq!(level(u8::MAX), "trace");
    }

    #[test]
    fn test_directives_cover_every_crate() {
        assert_eq!(
            default_directives(2),
            "proxima=debug,proxima_io=debug,proxima_match=debug"
        );
    }
}
