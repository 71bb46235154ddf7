//! Configuration for the Personagem library.
//!
//! Maps directly to `personagem.toml`. Every key is optional:
//!
//! ```toml
//! [general]
//! log_level = "debug"
//! json_logs = false
//!
//! [persistence]
//! wal_mode = true
//! busy_timeout_ms = 5000
//!
//! [inventory]
//! format = "delimited"   # or "json"
//!
//! [rules]
//! enforce_on_save = false
//! min_level = 1
//! max_attribute = 10
//! max_points = 10
//! ```

use serde::{Deserialize, Serialize};

use crate::codec::CodecKind;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonagemConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// `SQLite` settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Inventory column format.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Opt-in character rules.
    #[serde(default)]
    pub rules: RulesConfig,
}

impl PersonagemConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `PersonagemError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::PersonagemError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level or filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

/// `SQLite` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Use WAL journal mode for file databases.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// How long a write waits on a locked database.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

/// Inventory column settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Codec used to write and read the inventory column.
    #[serde(default)]
    pub format: CodecKind,
}

/// Opt-in rule settings; see [`crate::rules::CharacterRules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Reject saves of records that break a rule.
    #[serde(default)]
    pub enforce_on_save: bool,
    /// Lowest accepted level.
    #[serde(default = "default_min_level")]
    pub min_level: i32,
    /// Highest accepted value for strength and for defense.
    #[serde(default = "default_10")]
    pub max_attribute: i32,
    /// Highest accepted strength + defense.
    #[serde(default = "default_10")]
    pub max_points: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            enforce_on_save: false,
            min_level: default_min_level(),
            max_attribute: 10,
            max_points: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_busy_timeout() -> u32 {
    5000
}
fn default_min_level() -> i32 {
    1
}
fn default_10() -> i32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_permissive() {
        let config = PersonagemConfig::default();
        assert!(!config.rules.enforce_on_save);
        assert_eq!(config.inventory.format, CodecKind::Delimited);
        assert!(config.persistence.wal_mode);
    }

    #[test]
    fn empty_toml_equals_default() {
        let config = PersonagemConfig::from_toml("").expect("empty toml parses");
        assert_eq!(config, PersonagemConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
[general]
log_level = "debug"

[inventory]
format = "json"

[rules]
enforce_on_save = true
max_points = 12
"#;
        let config = PersonagemConfig::from_toml(toml).expect("parse");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.inventory.format, CodecKind::Json);
        assert!(config.rules.enforce_on_save);
        assert_eq!(config.rules.max_points, 12);
        assert_eq!(config.rules.max_attribute, 10);
        assert_eq!(config.persistence.busy_timeout_ms, 5000);
    }

    #[test]
    fn unknown_format_is_a_config_error() {
        let err = PersonagemConfig::from_toml("[inventory]\nformat = \"csv\"\n")
            .expect_err("csv is not a codec");
        assert!(matches!(err, crate::PersonagemError::Config(_)));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = PersonagemConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let parsed = PersonagemConfig::from_toml(&toml_str).expect("parse");
        assert_eq!(parsed, config);
    }
}
