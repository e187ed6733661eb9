//! Log subscriber setup for the binary.
//!
//! Level precedence: `--debug` (or `[debug] enabled`), then `RUST_LOG`, then the config
//! `[logging] level`. Logs go to stderr so JSON output on stdout stays clean.

use crate::config::AppConfig;
use crate::LogFormat;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Directive string for the subscriber filter.
pub fn filter_directive(debug: bool, rust_log: Option<&str>, config: &AppConfig) -> String {
    if debug || config.debug.enabled {
        return "debug".to_string();
    }
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => config.logging.level.to_lowercase(),
    }
}

/// Output format: the flag if given, else the config.
pub fn resolve_format(flag: Option<LogFormat>, config: &AppConfig) -> LogFormat {
    flag.unwrap_or(match config.logging.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    })
}

/// Install the global subscriber. Call once, before any work is logged.
pub fn init(debug: bool, format: Option<LogFormat>, config: &AppConfig) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(debug, rust_log.as_deref(), config);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| eyre!("Invalid log filter '{}': {}", directive, e))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match resolve_format(format, config) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| eyre!("Failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_wins() {
        let config = AppConfig::default();
        assert_eq!(filter_directive(true, Some("error"), &config), "debug");
    }

    #[test]
    fn rust_log_beats_config() {
        let mut config = AppConfig::default();
        config.logging.level = "info".to_string();
        assert_eq!(filter_directive(false, Some("snaplens=trace"), &config), "snaplens=trace");
        assert_eq!(filter_directive(false, Some("  "), &config), "info");
        assert_eq!(filter_directive(false, None, &config), "info");
    }

    #[test]
    fn config_debug_section_enables_debug() {
        let mut config = AppConfig::default();
        config.debug.enabled = true;
        assert_eq!(filter_directive(false, None, &config), "debug");
    }

    #[test]
    fn format_flag_overrides_config() {
        let mut config = AppConfig::default();
        config.logging.format = "json".to_string();
        assert_eq!(resolve_format(None, &config), LogFormat::Json);
        assert_eq!(resolve_format(Some(LogFormat::Pretty), &config), LogFormat::Pretty);
    }
}
