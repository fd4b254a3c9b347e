//! Configuration loading, validation, and management for the OpenLineage client.
//!
//! Loads configuration from `~/.openlineage/config.toml` with environment
//! variable overrides. The transport selector is kept as a plain string so an
//! unknown kind is reported when the client builds its transport.

use openlineage_core::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Transport kind writing events to standard output.
pub const TRANSPORT_CONSOLE: &str = "console";
/// Transport kind POSTing events to an HTTP endpoint.
pub const TRANSPORT_HTTP: &str = "http";

const ENV_NAMESPACE: &str = "OPENLINEAGE_NAMESPACE";
const ENV_DISABLED: &str = "OPENLINEAGE_DISABLED";
const ENV_TRANSPORT: &str = "OPENLINEAGE_TRANSPORT";
const ENV_URL: &str = "OPENLINEAGE_URL";
const ENV_API_KEY: &str = "OPENLINEAGE_API_KEY";

/// The root configuration structure.
///
/// Maps directly to `~/.openlineage/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Namespace stamped on every job. Defaults to "default".
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// When true, no transport is built and nothing is emitted.
    #[serde(default)]
    pub disabled: bool,

    /// Where events are delivered
    #[serde(default)]
    pub transport: TransportConfig,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.into()
}
fn default_transport_kind() -> String {
    TRANSPORT_CONSOLE.into()
}
fn default_true() -> bool {
    true
}

/// Transport selection plus the settings of every variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// "console" or "http"
    #[serde(rename = "type", default = "default_transport_kind")]
    pub kind: String,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: default_transport_kind(),
            console: ConsoleConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl TransportConfig {
    /// A console transport configuration.
    pub fn console(pretty_print: bool) -> Self {
        Self {
            kind: TRANSPORT_CONSOLE.into(),
            console: ConsoleConfig { pretty_print },
            ..Self::default()
        }
    }

    /// An HTTP transport configuration.
    pub fn http(uri: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            kind: TRANSPORT_HTTP.into(),
            http: HttpConfig {
                uri: uri.into(),
                api_key,
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Indent the JSON before printing
    #[serde(default = "default_true")]
    pub pretty_print: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Endpoint receiving the POSTed events
    #[serde(default)]
    pub uri: String,

    /// Sent as `Authorization: Bearer <api_key>` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("uri", &self.uri)
            .field(
                "api_key",
                &match self.api_key {
                    Some(_) => "[REDACTED]",
                    None => "None",
                },
            )
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            disabled: false,
            transport: TransportConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the default path with environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load configuration from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Apply `OPENLINEAGE_*` overrides read through `lookup`.
    ///
    /// Setting `OPENLINEAGE_URL` alone switches the transport to http.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(namespace) = lookup(ENV_NAMESPACE).filter(|s| !s.is_empty()) {
            self.namespace = namespace;
        }

        if let Some(disabled) = lookup(ENV_DISABLED) {
            self.disabled = matches!(disabled.trim().to_ascii_lowercase().as_str(), "true" | "1");
        }

        if let Some(url) = lookup(ENV_URL).filter(|s| !s.is_empty()) {
            self.transport.http.uri = url;
            self.transport.kind = TRANSPORT_HTTP.into();
        }

        if let Some(api_key) = lookup(ENV_API_KEY).filter(|s| !s.is_empty()) {
            self.transport.http.api_key = Some(api_key);
        }

        if let Some(kind) = lookup(ENV_TRANSPORT).filter(|s| !s.is_empty()) {
            self.transport.kind = kind.to_ascii_lowercase();
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".openlineage")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.disabled {
            return Ok(());
        }

        if self.transport.kind == TRANSPORT_HTTP && self.transport.http.uri.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "transport.http.uri must be set when transport.type = \"http\"".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_pretty_console() {
        let config = ClientConfig::default();
        assert_eq!(config.namespace, "default");
        assert!(!config.disabled);
        assert_eq!(config.transport.kind, TRANSPORT_CONSOLE);
        assert!(config.transport.console.pretty_print);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = ClientConfig {
            namespace: "warehouse".into(),
            transport: TransportConfig::http("http://localhost:5000/api/v1/lineage", None),
            ..ClientConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.namespace, "warehouse");
        assert_eq!(parsed.transport.kind, TRANSPORT_HTTP);
        assert_eq!(parsed.transport.http.uri, config.transport.http.uri);
    }

    #[test]
    fn http_config_parsing() {
        let toml_str = r#"
namespace = "etl"

[transport]
type = "http"

[transport.http]
uri = "https://lineage.example.com/api/v1/lineage"
api_key = "secret-token"
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.namespace, "etl");
        assert_eq!(config.transport.kind, "http");
        assert_eq!(config.transport.http.api_key.as_deref(), Some("secret-token"));
        // Unspecified sections fall back to defaults
        assert!(config.transport.console.pretty_print);
    }

    #[test]
    fn unknown_transport_kind_survives_parsing() {
        let config: ClientConfig = toml::from_str("[transport]\ntype = \"kafka\"\n").unwrap();
        assert_eq!(config.transport.kind, "kafka");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn http_without_uri_rejected() {
        let config = ClientConfig {
            transport: TransportConfig::http("", None),
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let disabled = ClientConfig {
            disabled: true,
            ..config
        };
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = ClientConfig::load_from(Path::new("/nonexistent/config.toml"));
        let config = result.unwrap();
        assert_eq!(config.namespace, "default");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "namespace = \"from-file\"\ndisabled = true").unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.namespace, "from-file");
        assert!(config.disabled);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "namespace = [").unwrap();

        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_url_switches_to_http() {
        let mut config = ClientConfig::default();
        config.apply_overrides(env(&[
            ("OPENLINEAGE_URL", "http://marquez:5000/api/v1/lineage"),
            ("OPENLINEAGE_API_KEY", "abc"),
            ("OPENLINEAGE_NAMESPACE", "prod"),
        ]));

        assert_eq!(config.transport.kind, TRANSPORT_HTTP);
        assert_eq!(config.transport.http.uri, "http://marquez:5000/api/v1/lineage");
        assert_eq!(config.transport.http.api_key.as_deref(), Some("abc"));
        assert_eq!(config.namespace, "prod");
    }

    #[test]
    fn env_transport_wins_over_url() {
        let mut config = ClientConfig::default();
        config.apply_overrides(env(&[
            ("OPENLINEAGE_URL", "http://marquez:5000"),
            ("OPENLINEAGE_TRANSPORT", "Console"),
        ]));
        assert_eq!(config.transport.kind, TRANSPORT_CONSOLE);
    }

    #[test]
    fn env_disabled_flag() {
        let mut config = ClientConfig::default();
        config.apply_overrides(env(&[("OPENLINEAGE_DISABLED", "TRUE")]));
        assert!(config.disabled);

        config.apply_overrides(env(&[("OPENLINEAGE_DISABLED", "no")]));
        assert!(!config.disabled);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = TransportConfig::http("http://x", Some("super-secret".into()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = ClientConfig::default_toml();
        assert!(toml_str.contains("console"));
        assert!(toml_str.contains("pretty_print = true"));
    }
}
