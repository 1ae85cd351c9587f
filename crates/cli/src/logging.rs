//! Tracing setup for the `nsplit` binary.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "NSPLIT_LOG";

/// Install the stderr subscriber.
///
/// `NSPLIT_LOG` takes a plain level (`debug`), applied to the binary and
/// the engine, or a full filter spec such as `nsplit_core=trace,reqwest=debug`.
pub fn init_tracing() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => default_filter(&level),
        Ok(spec) => spec,
        Err(_) => default_filter("info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn default_filter(level: &str) -> String {
    let crate_root = module_path!().split("::").next().unwrap_or("nsplit");
    format!("{crate_root}={level},nsplit_core={level}")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_levels() {
        assert!(is_plain_level("debug"));
        assert!(is_plain_level("WARN"));
        assert!(!is_plain_level("nsplit=debug"));
    }

    #[test]
    fn test_default_filter_covers_engine() {
        assert_eq!(default_filter("debug"), "nsplit=debug,nsplit_core=debug");
    }
}
