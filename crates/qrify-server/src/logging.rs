//! Logging configuration and initialization.
//!
//! Every log line from this workspace uses a `qrify::*` target:
//! - `qrify::startup` - configuration and bind address
//! - `qrify::api` - request outcomes and 5xx causes
//! - `qrify::session` - session cookie issuance
//! - `qrify::store` - history writes
//! - `qrify::decode` - grid detection details
//!
//! `RUST_LOG` wins over everything below when set.

use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const TARGET_PREFIX: &str = "qrify";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Baseline verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Startup, request outcomes and errors
    #[default]
    Production,
    Verbose,
    Debug,
    Trace,
    /// Warnings and errors only
    Quiet,
}

impl LogPreset {
    /// Pick a preset from CLI flags. Quiet beats trace beats debug beats verbose.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> Self {
        match (quiet, trace, debug, verbose) {
            (true, ..) => LogPreset::Quiet,
            (_, true, ..) => LogPreset::Trace,
            (_, _, true, _) => LogPreset::Debug,
            (_, _, _, true) => LogPreset::Verbose,
            _ => LogPreset::Production,
        }
    }

    fn directives(self) -> Vec<String> {
        let list: &[&str] = match self {
            LogPreset::Production => &[
                "qrify::startup=info",
                "qrify::api=info",
                "qrify::session=warn",
                "qrify::store=warn",
                "qrify::decode=warn",
                "tower_http=warn",
            ],
            LogPreset::Verbose => &["qrify=info", "tower_http=info"],
            LogPreset::Debug => &["qrify=debug", "tower_http=debug"],
            LogPreset::Trace => &["qrify=trace", "tower_http=trace"],
            LogPreset::Quiet => &["qrify=warn", "tower_http=error"],
        };
        list.iter().map(|d| d.to_string()).collect()
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Fully qualified target -> level, applied after the preset.
    pub overrides: HashMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn new(preset: LogPreset, log_overrides: &[String], format: LogFormat) -> Self {
        Self {
            preset,
            overrides: parse_overrides(log_overrides),
            format,
        }
    }

    /// Build an EnvFilter from this configuration.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::try_new(self.filter_string()).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    fn filter_string(&self) -> String {
        let mut directives = self.preset.directives();
        let mut overrides: Vec<_> = self.overrides.iter().collect();
        overrides.sort();
        for (target, level) in overrides {
            directives.push(format!("{}={}", target, level.to_string().to_lowercase()));
        }
        directives.join(",")
    }
}

/// Parse `TARGET=LEVEL` pairs, comma separated or repeated.
///
/// Short targets are prefixed: `api=debug` becomes `qrify::api=debug`.
/// Entries with an unknown level are ignored.
fn parse_overrides(raw: &[String]) -> HashMap<String, Level> {
    raw.iter()
        .flat_map(|s| s.split(','))
        .filter_map(|part| {
            let (target, level) = part.split_once('=')?;
            let target = target.trim();
            let level = level.trim().parse::<Level>().ok()?;
            let full_target = if target == TARGET_PREFIX
                || target.starts_with("qrify::")
                || target == "tower_http"
            {
                target.to_string()
            } else {
                format!("{}::{}", TARGET_PREFIX, target)
            };
            Some((full_target, level))
        })
        .collect()
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_preset_priority() {
        assert_eq!(LogPreset::from_flags(true, true, true, true), LogPreset::Quiet);
        assert_eq!(LogPreset::from_flags(true, true, true, false), LogPreset::Trace);
        assert_eq!(LogPreset::from_flags(true, true, false, false), LogPreset::Debug);
        assert_eq!(LogPreset::from_flags(true, false, false, false), LogPreset::Verbose);
        assert_eq!(LogPreset::from_flags(false, false, false, false), LogPreset::Production);
    }

    #[test]
    fn test_overrides_are_prefixed() {
        let overrides = parse_overrides(&["api=debug".into(), "decode=trace,store=info".into()]);
        assert_eq!(overrides.get("qrify::api"), Some(&Level::DEBUG));
        assert_eq!(overrides.get("qrify::decode"), Some(&Level::TRACE));
        assert_eq!(overrides.get("qrify::store"), Some(&Level::INFO));
    }

    #[test]
    fn test_overrides_pass_through_full_targets() {
        let overrides = parse_overrides(&[
            "qrify::session=debug".into(),
            "tower_http=trace".into(),
            "api=loud".into(),
            "garbage".into(),
        ]);
        assert_eq!(overrides.get("qrify::session"), Some(&Level::DEBUG));
        assert_eq!(overrides.get("tower_http"), Some(&Level::TRACE));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_filter_string_appends_overrides() {
        let config = LogConfig::new(LogPreset::Quiet, &["api=debug".into()], LogFormat::Text);
        assert_eq!(config.filter_string(), "qrify=warn,tower_http=error,qrify::api=debug");
    }
}
