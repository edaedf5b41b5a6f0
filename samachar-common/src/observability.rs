//! Tracing setup shared by the binary and integration tests.
//!
//! Every entrypoint logs into one daily-rolling file. [`init_logging`] is
//! meant to run once near process start; later calls do nothing except hand
//! back the path chosen the first time.
//!
//! The terminal client draws on the same tty stderr points at, so
//! `emit_stderr` is off unless configured otherwise.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{anyhow, Context};
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

const LOG_DIR_ENV: &str = "SAMACHAR_LOG_DIR";

/// Line encoding of the log file (and of stderr when enabled).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Prefix of the log file and name of the default data directory.
    pub app_name: &'static str,
    /// Where to write. `None` means `SAMACHAR_LOG_DIR`, else
    /// `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "samachar",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Install the global subscriber and return today's log file.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let prefix = format!("{}.log", config.app_name);
    let path = dir.join(format!("{prefix}.{}", Local::now().format("%Y-%m-%d")));
    let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &prefix));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .with_context(|| format!("invalid log filter {:?}", config.default_filter))?;

    let stderr = config.emit_stderr;
    let (file_layer, stderr_layer) = match config.format {
        LogFormat::Text => (
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .boxed(),
            stderr.then(|| fmt::layer().with_writer(std::io::stderr).boxed()),
        ),
        LogFormat::Json => (
            fmt::layer().json().with_writer(file_writer).boxed(),
            stderr.then(|| fmt::layer().json().with_writer(std::io::stderr).boxed()),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_GUARD.set(guard);
    let _ = LOG_PATH.set(path.clone());
    Ok(path)
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match explicit {
        Some(dir) => expand_tilde(dir, home.as_deref()),
        None => match std::env::var_os(LOG_DIR_ENV) {
            Some(dir) => expand_tilde(Path::new(&dir), home.as_deref()),
            None => home
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local/share")
                .join(app_name),
        },
    }
}

fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let resolved = resolve_log_dir("samachar", Some(tmp.path()));
        assert_eq!(resolved, tmp.path());
    }

    #[test]
    fn tilde_expands_against_home() {
        let home = Path::new("/home/reporter");
        assert_eq!(
            expand_tilde(Path::new("~/logs/samachar"), Some(home)),
            PathBuf::from("/home/reporter/logs/samachar")
        );
        assert_eq!(
            expand_tilde(Path::new("/var/log/samachar"), Some(home)),
            PathBuf::from("/var/log/samachar")
        );
        assert_eq!(
            expand_tilde(Path::new("~/logs"), None),
            PathBuf::from("~/logs")
        );
    }

    #[test]
    fn log_format_parses_lowercase_names() {
        assert_eq!(parse_format("json"), LogFormat::Json);
        assert_eq!(parse_format("text"), LogFormat::Text);
    }

    fn parse_format(raw: &str) -> LogFormat {
        use serde::de::{value::StrDeserializer, IntoDeserializer};
        let de: StrDeserializer<'_, serde::de::value::Error> = raw.into_deserializer();
        LogFormat::deserialize(de).unwrap()
    }
}
