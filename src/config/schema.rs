//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use crate::graph::Direction;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// CRD groups left out of the catalog entirely
    #[serde(default)]
    pub ignored_groups: Vec<String>,

    /// Resource names emitted verbatim ahead of the computed CRD names
    #[serde(default)]
    pub default_order: Vec<String>,

    /// Sort kinds lexically within a rank group
    #[serde(default = "default_true")]
    pub deterministic_tie_break: bool,

    /// Add catalogued kinds nothing owns, at rank 0
    #[serde(default = "default_false")]
    pub include_unowned_kinds: bool,

    #[serde(default)]
    pub direction: Direction,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,

    #[serde(default)]
    pub format: OutputFormat,

    /// Flag name used by the `flag` format, without leading dashes
    #[serde(default = "default_flag_name")]
    pub flag_name: String,
}

/// What the printed list contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// Default order followed by projected CRD names
    #[default]
    CrdNames,
    /// Ordered kinds only; `defaultOrder` is not printed in this mode
    Kinds,
}

/// How the printed list is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// `a, b, c`
    #[default]
    Plain,
    /// `--<flagName>=a,b,c`
    Flag,
    Json,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::CrdNames => "crdNames",
            OutputMode::Kinds => "kinds",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "crdnames" | "crds" => Ok(OutputMode::CrdNames),
            "kinds" => Ok(OutputMode::Kinds),
            _ => Err(format!(
                "unknown output mode '{}' (expected crdNames or kinds)",
                s
            )),
        }
    }
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Flag => "flag",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "flag" => Ok(OutputFormat::Flag),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "unknown output format '{}' (expected plain, flag or json)",
                s
            )),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

pub(crate) fn default_flag_name() -> String {
    "restore-resource-priorities".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_groups: Vec::new(),
            default_order: Vec::new(),
            deterministic_tie_break: default_true(),
            include_unowned_kinds: default_false(),
            direction: Direction::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            format: OutputFormat::default(),
            flag_name: default_flag_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.deterministic_tie_break);
        assert!(!config.include_unowned_kinds);
        assert_eq!(config.direction, Direction::DependentsFirst);
        assert_eq!(config.output.format, OutputFormat::Plain);
        assert_eq!(config.output.flag_name, "restore-resource-priorities");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("deterministicTieBreak"));
        assert!(yaml.contains("direction: dependentsFirst"));
        assert!(yaml.contains("flagName"));
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
ignoredGroups:
  - kafka.strimzi.io
defaultOrder: [namespaces, persistentvolumes]
direction: ownersFirst
output:
  mode: kinds
  format: json
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ignored_groups, vec!["kafka.strimzi.io"]);
        assert_eq!(config.default_order.len(), 2);
        assert_eq!(config.direction, Direction::OwnersFirst);
        assert_eq!(config.output.mode, OutputMode::Kinds);
        assert_eq!(config.output.format, OutputFormat::Json);
        // Unset keys keep their defaults
        assert!(config.deterministic_tie_break);
        assert_eq!(config.output.flag_name, "restore-resource-priorities");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("crd-names".parse::<OutputMode>().unwrap(), OutputMode::CrdNames);
        assert_eq!("Kinds".parse::<OutputMode>().unwrap(), OutputMode::Kinds);
        assert_eq!("FLAG".parse::<OutputFormat>().unwrap(), OutputFormat::Flag);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
