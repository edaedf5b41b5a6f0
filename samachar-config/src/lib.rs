//! Loader for client configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, with `SAMACHAR__`
//! environment variables applied last (`SAMACHAR__SERVICE__BASE_URL`
//! overrides `service.base_url`). String values may reference other
//! environment variables as `${VAR}`; expansion is repeated a bounded number
//! of times so that chained references resolve and cycles terminate.
//!
//! Every key has a default, so an empty configuration is valid:
//!
//! ```yaml
//! service:
//!   base_url: http://localhost:8000
//!   timeout_secs: 15
//!   connect_timeout_secs: 5
//! logging:
//!   dir: ~/.local/share/samachar
//!   format: text
//!   filter: info
//!   stderr: false
//! ui:
//!   tick_ms: 80
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use samachar_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const CONFIG_FILE_NAME: &str = "samachar.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SamacharConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the classification service lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::default(),
            filter: default_filter(),
            stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Translate into the initializer settings for `app_name`.
    ///
    /// ```
    /// use samachar_config::LoggingConfig;
    ///
    /// let log = LoggingConfig::default().to_log_config("samachar");
    /// assert_eq!(log.default_filter, "info");
    /// assert!(!log.emit_stderr);
    /// ```
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Redraw/spinner cadence of the terminal client.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl UiConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_filter() -> String {
    "info".into()
}
fn default_tick_ms() -> u64 {
    80
}

/// Candidate config files, most local first: `./samachar.yaml`, then
/// `<config_dir>/samachar/samachar.yaml`.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("samachar").join(CONFIG_FILE_NAME));
    }
    paths
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn validate(cfg: &SamacharConfig) -> Result<(), ConfigError> {
    if cfg.service.base_url.trim().is_empty() {
        return Err(ConfigError::Message("service.base_url must not be empty".into()));
    }
    if cfg.service.timeout_secs == 0 {
        return Err(ConfigError::Message(
            "service.timeout_secs must be greater than zero".into(),
        ));
    }
    if cfg.ui.tick_ms < 10 {
        return Err(ConfigError::Message("ui.tick_ms must be at least 10".into()));
    }
    Ok(())
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SamacharConfigLoader {
    files: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SamacharConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SamacharConfigLoader {
    pub fn new() -> Self {
        Self {
            files: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files = self
            .files
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files = self
            .files
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Attach every [`default_config_paths`] entry as an optional source.
    /// Later (more global) files are added first so the local file wins.
    pub fn with_default_files(mut self) -> Self {
        for path in default_config_paths().into_iter().rev() {
            self = self.with_optional_file(path);
        }
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use samachar_config::SamacharConfigLoader;
    ///
    /// let cfg = SamacharConfigLoader::new()
    ///     .with_yaml_str("service:\n  base_url: http://classifier.internal:9000\n")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.service.base_url, "http://classifier.internal:9000");
    /// assert_eq!(cfg.service.timeout_secs, 15);
    /// assert_eq!(cfg.ui.tick_ms, 80);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.files = self.files.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Files are merged first, then `SAMACHAR__`-prefixed environment
    /// variables, then `${VAR}` placeholders are expanded before the
    /// strongly typed structs are materialised and validated.
    pub fn load(self) -> Result<SamacharConfig, ConfigError> {
        let cfg = self
            .files
            .add_source(
                Environment::with_prefix("SAMACHAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: SamacharConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        validate(&typed)?;

        Ok(typed)
    }
}
