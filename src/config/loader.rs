//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Context-specific config
    /// 3. Root config
    /// 4. Built-in defaults
    ///
    /// CLI flags are applied on top by the caller.
    pub fn load(context: Option<&str>) -> Result<Config> {
        let context_path = context.map(paths::context_config_path);
        let config = Self::load_layers(&paths::root_config_path(), context_path.as_deref())?;
        Ok(Self::apply_env_overrides(config))
    }

    /// Merge the defaults with the root file and an optional context file
    ///
    /// Missing files are skipped. Files are merged key by key, so a context
    /// file only needs the keys it changes.
    pub fn load_layers(root: &Path, context: Option<&Path>) -> Result<Config> {
        let mut merged = serde_yaml::to_value(Self::load_defaults())
            .context("Failed to serialize default configuration")?;

        for path in [Some(root), context].into_iter().flatten() {
            if let Some(layer) = Self::read_layer(path)? {
                tracing::debug!(path = %path.display(), "merging config layer");
                merge_values(&mut merged, layer);
            }
        }

        serde_yaml::from_value(merged).context("Failed to parse merged configuration")
    }

    /// Read a file as an untyped YAML layer; `None` if absent or empty
    fn read_layer(path: &Path) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        match value {
            Value::Null => Ok(None),
            Value::Mapping(_) => Ok(Some(value)),
            _ => Err(anyhow::anyhow!(
                "Config file {} must contain a YAML mapping",
                path.display()
            )),
        }
    }

    /// Validate configuration by loading and checking for errors
    ///
    /// This performs strict validation - it will fail on:
    /// - Invalid YAML syntax
    /// - Unknown configuration keys
    /// - Invalid value types
    /// - Empty `output.flagName` or blank list entries
    pub fn validate(context: Option<&str>) -> Result<()> {
        let root_path = paths::root_config_path();
        let context_path = context.map(paths::context_config_path);

        for path in [Some(root_path.as_path()), context_path.as_deref()]
            .into_iter()
            .flatten()
        {
            Self::validate_file(path)?;
        }

        let config = Self::load(context).context("Failed to load merged configuration")?;
        validate_values(&config)
    }

    /// Validate a single config file, if it exists
    pub fn validate_file(path: &Path) -> Result<()> {
        let Some(layer) = Self::read_layer(path)? else {
            return Ok(());
        };

        let mut unknown = Vec::new();
        collect_keys(&layer, "", &mut unknown);
        unknown.retain(|key| !super::KNOWN_KEYS.contains(&key.as_str()));
        if !unknown.is_empty() {
            return Err(anyhow::anyhow!(
                "Unknown configuration key(s) in {}: {}",
                path.display(),
                unknown.join(", ")
            ));
        }

        let config: Config = serde_yaml::from_value(layer)
            .with_context(|| format!("Invalid value in config file: {}", path.display()))?;
        validate_values(&config)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Built-in defaults, the lowest layer
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides_from(config, |name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`
    ///
    /// Unparsable values are logged and skipped.
    pub fn apply_overrides_from(
        mut config: Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Config {
        if let Some(groups) = lookup("CRD_ORDER_IGNORED_GROUPS") {
            config.ignored_groups = super::split_list(&groups);
        }

        if let Some(order) = lookup("CRD_ORDER_DEFAULT_ORDER") {
            config.default_order = super::split_list(&order);
        }

        if let Some(tie_break) = lookup("CRD_ORDER_TIE_BREAK") {
            match tie_break.parse::<bool>() {
                Ok(val) => config.deterministic_tie_break = val,
                Err(_) => tracing::warn!(value = %tie_break, "ignoring invalid CRD_ORDER_TIE_BREAK"),
            }
        }

        if let Some(format) = lookup("CRD_ORDER_OUTPUT_FORMAT") {
            match format.parse() {
                Ok(val) => config.output.format = val,
                Err(e) => tracing::warn!(error = %e, "ignoring invalid CRD_ORDER_OUTPUT_FORMAT"),
            }
        }

        config
    }

    /// Set one key in a single config file, leaving its other keys untouched
    ///
    /// The value is validated against the file merged over the defaults; only
    /// the changed key is written, so a context file stays a partial overlay.
    pub fn set_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
        let mut layer = Self::read_layer(path)?.unwrap_or_else(|| Value::Mapping(Mapping::new()));
        let mut config = Self::load_layers(path, None)?;
        super::set_config_value(&mut config, key, value)
            .with_context(|| format!("Failed to set {} = {}", key, value))?;

        let full = serde_yaml::to_value(&config).context("Failed to serialize configuration")?;
        let new_value = key
            .split('.')
            .try_fold(&full, |v, segment| v.get(segment))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
        insert_path(&mut layer, key, new_value);

        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        let yaml = serde_yaml::to_string(&layer).context("Failed to serialize configuration")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Overlay `overlay` onto `base`, recursing into mappings
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Insert `value` at a dot-notation key, creating intermediate mappings
fn insert_path(target: &mut Value, key: &str, value: Value) {
    let segments: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        if !current.is_mapping() {
            *current = Value::Mapping(Mapping::new());
        }
        let Some(map) = current.as_mapping_mut() else {
            return;
        };
        current = map
            .entry(Value::from(*segment))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    if !current.is_mapping() {
        *current = Value::Mapping(Mapping::new());
    }
    if let Some(map) = current.as_mapping_mut() {
        map.insert(Value::from(*last), value);
    }
}

/// Collect dot-notation leaf keys of a mapping
fn collect_keys(value: &Value, prefix: &str, out: &mut Vec<String>) {
    let Value::Mapping(map) = value else {
        return;
    };

    for (key, child) in map {
        let name = match key.as_str() {
            Some(name) => name.to_string(),
            None => format!("{:?}", key),
        };
        let full = if prefix.is_empty() {
            name
        } else {
            format!("{}.{}", prefix, name)
        };

        match child {
            Value::Mapping(_) => collect_keys(child, &full, out),
            _ => out.push(full),
        }
    }
}

/// Semantic checks serde cannot express
pub fn validate_values(config: &Config) -> Result<()> {
    if config.output.flag_name.trim().is_empty() {
        return Err(anyhow::anyhow!("output.flagName must not be empty"));
    }

    for (key, entries) in [
        ("ignoredGroups", &config.ignored_groups),
        ("defaultOrder", &config.default_order),
    ] {
        if let Some(index) = entries.iter().position(|e| e.trim().is_empty()) {
            return Err(anyhow::anyhow!("{} has a blank entry at index {}", key, index));
        }
    }

    Ok(())
}
