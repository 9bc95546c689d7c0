//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{ConfigLoader, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "direction", "output.format")
        key: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "direction", "output.format")
        key: String,
        /// Configuration value; lists are comma-separated or a YAML array
        value: String,
        /// Write to the config file of this kubeconfig context instead of the root file
        #[arg(long)]
        context: Option<String>,
    },
    /// List all configuration
    List,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
///
/// `context` selects the context-specific layer for reads and validation.
pub fn handle_config_command(cmd: ConfigSubcommand, context: Option<&str>) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load(context).context("Failed to load configuration")?;

            if let Some(key) = key {
                let value = crate::config::get_config_value(&config, &key)?;
                println!("{}", value.trim_end());
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set {
            key,
            value,
            context: target,
        } => {
            let path = match &target {
                Some(name) => paths::context_config_path(name),
                None => paths::root_config_path(),
            };

            ConfigLoader::set_in_file(&path, &key, &value)?;

            match target {
                Some(name) => println!("Configuration saved for context: {}", name),
                None => println!("Configuration saved"),
            }
        }
        ConfigSubcommand::List => {
            let config = ConfigLoader::load(context).context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("{}", paths::root_config_path().display());
            if let Some(name) = context {
                println!("{}", paths::context_config_path(name).display());
            }
        }
        ConfigSubcommand::Validate => {
            ConfigLoader::validate(context).context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
