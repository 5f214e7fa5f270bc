//! Configuration loading and typed config structures for Civitas.
//!
//! Configuration is a small YAML document. Every field has a default, so
//! an empty document (or no file at all) yields a working setup with
//! `CONTRACT_OWNER` as the privileged principal and `creator` as the
//! advance role.
//!
//! ```yaml
//! access:
//!   privileged_principal: CONTRACT_OWNER
//!   advance_role: creator
//! registry:
//!   validate_civilization_refs: false
//! clock:
//!   source: block
//!   start_block: 0
//! logging:
//!   level: info
//!   format: pretty
//! ```

use std::path::Path;

use serde::Deserialize;

use civitas_registry::{AccessPolicy, DEFAULT_ADVANCE_ROLE, DEFAULT_PRIVILEGED_PRINCIPAL};
use civitas_types::Principal;

/// Environment variable overriding `access.privileged_principal`.
pub const PRIVILEGED_PRINCIPAL_ENV: &str = "CIVITAS_PRIVILEGED_PRINCIPAL";

/// Environment variable overriding `access.advance_role`.
pub const ADVANCE_ROLE_ENV: &str = "CIVITAS_ADVANCE_ROLE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CivitasConfig {
    /// Identities used by authorization.
    #[serde(default)]
    pub access: AccessConfig,

    /// Registry behavior switches.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Discovery clock selection.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Logging settings for the embedding binary.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CivitasConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the access
    /// identities:
    /// - `CIVITAS_PRIVILEGED_PRINCIPAL` overrides `access.privileged_principal`
    /// - `CIVITAS_ADVANCE_ROLE` overrides `access.advance_role`
    ///
    /// Unlike [`parse`](Self::parse), this consults the environment, so the
    /// same YAML can resolve to different identities when either variable
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_with_overrides(&contents, |key| std::env::var(key).ok())
    }

    /// Parse a YAML string, then apply access overrides from `lookup`.
    ///
    /// [`from_file`](Self::from_file) calls this with the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_with_overrides(
        yaml: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::parse(yaml)?;
        config.access.apply_overrides(lookup);
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// No environment overrides are applied, so the result depends on
    /// `yaml` alone. Use [`from_file`](Self::from_file) for a deployment
    /// config that honors `CIVITAS_*` variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Authorization identities.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessConfig {
    /// Principal allowed to update any civilization's status.
    #[serde(default = "default_privileged_principal")]
    pub privileged_principal: String,

    /// Fixed role allowed to advance any technology.
    #[serde(default = "default_advance_role")]
    pub advance_role: String,
}

impl AccessConfig {
    /// Build the [`AccessPolicy`] the registries authorize against.
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::new(
            Principal::new(self.privileged_principal.clone()),
            Principal::new(self.advance_role.clone()),
        )
    }

    /// Replace identities with values returned by `lookup`.
    ///
    /// `lookup` is queried with [`PRIVILEGED_PRINCIPAL_ENV`] and
    /// [`ADVANCE_ROLE_ENV`]; a `None` keeps the current value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(PRIVILEGED_PRINCIPAL_ENV) {
            self.privileged_principal = value;
        }
        if let Some(value) = lookup(ADVANCE_ROLE_ENV) {
            self.advance_role = value;
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            privileged_principal: default_privileged_principal(),
            advance_role: default_advance_role(),
        }
    }
}

/// Registry behavior switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Reject technology discoveries that reference an unknown civilization.
    ///
    /// Off by default: references are stored as given.
    #[serde(default)]
    pub validate_civilization_refs: bool,
}

/// Where discovery markers come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockSource {
    /// A block height advanced explicitly by the host.
    #[default]
    Block,
    /// Milliseconds since the Unix epoch.
    Wall,
}

/// Discovery clock configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Which clock supplies discovery markers.
    #[serde(default)]
    pub source: ClockSource,

    /// Initial height for the block clock. Ignored by the wall clock.
    #[serde(default)]
    pub start_block: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter (e.g. `info`, `civitas_registry=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_privileged_principal() -> String {
    String::from(DEFAULT_PRIVILEGED_PRINCIPAL)
}

fn default_advance_role() -> String {
    String::from(DEFAULT_ADVANCE_ROLE)
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = CivitasConfig::parse("").unwrap();
        assert_eq!(config, CivitasConfig::default());
        assert_eq!(config.access.privileged_principal, "CONTRACT_OWNER");
        assert_eq!(config.access.advance_role, "creator");
        assert!(!config.registry.validate_civilization_refs);
        assert_eq!(config.clock.source, ClockSource::Block);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_document_fills_missing_fields() {
        let yaml = "access:\n  privileged_principal: admin\nclock:\n  source: wall\n";
        let config = CivitasConfig::parse(yaml).unwrap();
        assert_eq!(config.access.privileged_principal, "admin");
        assert_eq!(config.access.advance_role, "creator");
        assert_eq!(config.clock.source, ClockSource::Wall);
        assert_eq!(config.clock.start_block, 0);
    }

    #[test]
    fn full_document_parses() {
        let yaml = r"
access:
  privileged_principal: council
  advance_role: research_board
registry:
  validate_civilization_refs: true
clock:
  source: block
  start_block: 120
logging:
  level: debug
  format: json
";
        let config = CivitasConfig::parse(yaml).unwrap();
        assert!(config.registry.validate_civilization_refs);
        assert_eq!(config.clock.start_block, 120);
        assert_eq!(config.logging.format, "json");

        let policy = config.access.policy();
        assert_eq!(*policy.privileged(), "council");
        assert_eq!(*policy.advance_role(), "research_board");
    }

    #[test]
    fn overrides_replace_yaml_identities() {
        let yaml = "access:\n  privileged_principal: council\n  advance_role: research_board\n";
        let mut config = CivitasConfig::parse(yaml).unwrap();
        config.access.apply_overrides(lookup_from(&[
            (PRIVILEGED_PRINCIPAL_ENV, "senate"),
            (ADVANCE_ROLE_ENV, "academy"),
        ]));
        assert_eq!(config.access.privileged_principal, "senate");
        assert_eq!(config.access.advance_role, "academy");

        let policy = config.access.policy();
        assert_eq!(*policy.privileged(), "senate");
        assert_eq!(*policy.advance_role(), "academy");
    }

    #[test]
    fn absent_override_keeps_yaml_value() {
        let yaml = "access:\n  privileged_principal: council\n  advance_role: research_board\n";
        let mut config = CivitasConfig::parse(yaml).unwrap();
        config
            .access
            .apply_overrides(lookup_from(&[(ADVANCE_ROLE_ENV, "academy")]));
        assert_eq!(config.access.privileged_principal, "council");
        assert_eq!(config.access.advance_role, "academy");

        config.access.apply_overrides(lookup_from(&[]));
        assert_eq!(config.access.privileged_principal, "council");
        assert_eq!(config.access.advance_role, "academy");
    }

    #[test]
    fn parse_ignores_overrides_that_loading_applies() {
        let yaml = "access:\n  privileged_principal: council\n";
        let lookup = lookup_from(&[(PRIVILEGED_PRINCIPAL_ENV, "senate")]);

        let plain = CivitasConfig::parse(yaml).unwrap();
        let loaded = CivitasConfig::parse_with_overrides(yaml, &lookup).unwrap();
        assert_eq!(plain.access.privileged_principal, "council");
        assert_eq!(loaded.access.privileged_principal, "senate");
        assert_eq!(loaded.access.advance_role, plain.access.advance_role);
        assert_eq!(loaded.clock, plain.clock);
    }

    #[test]
    fn unrelated_variables_are_ignored() {
        let mut access = AccessConfig::default();
        access.apply_overrides(lookup_from(&[("CIVITAS_OTHER", "x")]));
        assert_eq!(access, AccessConfig::default());
    }

    #[test]
    fn logging_level_builds_a_subscriber_filter() {
        let default = CivitasConfig::default();
        assert_eq!(default.logging.format, "pretty");
        assert!(tracing_subscriber::EnvFilter::try_new(&default.logging.level).is_ok());

        let config = CivitasConfig::parse("logging:\n  level: civitas_registry=debug\n").unwrap();
        assert!(tracing_subscriber::EnvFilter::try_new(&config.logging.level).is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = CivitasConfig::parse("access: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = CivitasConfig::from_file(Path::new("/nonexistent/civitas.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
