//! Configuration system for crd-order
//!
//! Layered YAML configuration: built-in defaults, a root file, an optional
//! per-context file and environment overrides. CLI flags are applied last by
//! the binary.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::{ConfigLoader, validate_values};
pub use schema::{Config, Direction, OutputConfig, OutputFormat, OutputMode};

/// Every key accepted by `config get` / `config set`, in dot notation
pub const KNOWN_KEYS: &[&str] = &[
    "ignoredGroups",
    "defaultOrder",
    "deterministicTieBreak",
    "includeUnownedKinds",
    "direction",
    "output.mode",
    "output.format",
    "output.flagName",
];

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a list given either as a YAML array or comma-separated
fn parse_list(key: &str, value: &str) -> anyhow::Result<Vec<String>> {
    use anyhow::Context;
    if value.trim_start().starts_with('[') {
        serde_yaml::from_str(value)
            .with_context(|| format!("{} must be a YAML array (e.g., ['a', 'b'])", key))
    } else {
        Ok(split_list(value))
    }
}

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "ignoredGroups" => serde_yaml::to_string(&config.ignored_groups)
            .map_err(|e| anyhow::anyhow!("Failed to serialize ignoredGroups: {}", e)),
        "defaultOrder" => serde_yaml::to_string(&config.default_order)
            .map_err(|e| anyhow::anyhow!("Failed to serialize defaultOrder: {}", e)),
        "deterministicTieBreak" => Ok(config.deterministic_tie_break.to_string()),
        "includeUnownedKinds" => Ok(config.include_unowned_kinds.to_string()),
        "direction" => Ok(config.direction.to_string()),
        "output.mode" => Ok(config.output.mode.to_string()),
        "output.format" => Ok(config.output.format.to_string()),
        "output.flagName" => Ok(config.output.flag_name.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
///
/// The updated configuration is validated before this returns.
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "ignoredGroups" => {
            config.ignored_groups = parse_list(key, value)?;
        }
        "defaultOrder" => {
            config.default_order = parse_list(key, value)?;
        }
        "deterministicTieBreak" => {
            config.deterministic_tie_break = value
                .parse()
                .context("deterministicTieBreak must be 'true' or 'false'")?;
        }
        "includeUnownedKinds" => {
            config.include_unowned_kinds = value
                .parse()
                .context("includeUnownedKinds must be 'true' or 'false'")?;
        }
        "direction" => {
            config.direction = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        "output.mode" => {
            config.output.mode = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        "output.format" => {
            config.output.format = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        "output.flagName" => {
            config.output.flag_name = value.trim_start_matches('-').to_string();
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    validate_values(config)
}
