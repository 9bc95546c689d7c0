//! Where configuration files live
//!
//! The root config sits in the config directory; per-context overlays sit
//! under `contexts/` in the data directory.

use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "crd-order";

/// Configuration directory
///
/// `CRD_ORDER_CONFIG_DIR` wins; otherwise `$XDG_CONFIG_HOME/crd-order` or
/// `~/.config/crd-order` on Unix, and the roaming app-data folder on Windows.
pub fn config_dir() -> PathBuf {
    resolve_dir(
        "CRD_ORDER_CONFIG_DIR",
        "XDG_CONFIG_HOME",
        &[".config"],
        ProjectDirs::config_dir,
    )
}

/// Data directory, holding per-context configuration
///
/// `CRD_ORDER_DATA_DIR` wins; otherwise `$XDG_DATA_HOME/crd-order` or
/// `~/.local/share/crd-order` on Unix, and the local app-data folder on Windows.
pub fn data_dir() -> PathBuf {
    resolve_dir(
        "CRD_ORDER_DATA_DIR",
        "XDG_DATA_HOME",
        &[".local", "share"],
        ProjectDirs::data_dir,
    )
}

fn resolve_dir(
    override_var: &str,
    xdg_var: &str,
    home_relative: &[&str],
    project_dir: fn(&ProjectDirs) -> &Path,
) -> PathBuf {
    if let Some(dir) = std::env::var_os(override_var) {
        return PathBuf::from(dir);
    }

    if cfg!(windows) {
        if let Some(dirs) = ProjectDirs::from("", "", APP_NAME) {
            return project_dir(&dirs).to_path_buf();
        }
    } else if let Some(base) = std::env::var_os(xdg_var) {
        return PathBuf::from(base).join(APP_NAME);
    }

    let home = BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    home_relative
        .iter()
        .fold(home, |path, segment| path.join(segment))
        .join(APP_NAME)
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Get the context-specific config directory path
///
/// EKS context names are ARNs containing `/` and `:`; both are replaced so
/// the context maps to a single directory.
pub fn context_config_dir(context: &str) -> PathBuf {
    let dir_name: String = context
        .chars()
        .map(|c| if c == '/' || c == ':' { '_' } else { c })
        .collect();
    data_dir().join("contexts").join(dir_name)
}

/// Get the context-specific config file path
pub fn context_config_path(context: &str) -> PathBuf {
    context_config_dir(context).join("config.yaml")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
