//! CLI command handling module
//!
//! Handles the CLI subcommands, logging setup and result rendering.

mod commands;
mod logging;
mod output;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
pub use output::render;
pub use version::display_version;
