//! crd-order - compute a restore order for custom resources
//!
//! Lists the cluster's CRDs, enumerates every custom resource, and prints the
//! CRD names ordered so that owned kinds come before the kinds owning them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crd_order::cli::{self, ConfigSubcommand};
use crd_order::config::{self, Config, ConfigLoader, Direction, OutputFormat, OutputMode};
use crd_order::kube::{ConnectionOptions, KubeSource};
use crd_order::services::{RestoreOrderOptions, RestoreOrderService};

/// Compute a restore order for custom resources from live ownerReferences
#[derive(Parser, Debug)]
#[command(name = "crd-order")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the kubeconfig file (default: standard kubeconfig inference)
    #[arg(long)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Username to impersonate
    #[arg(long = "as", value_name = "USER")]
    impersonate_user: Option<String>,

    /// Group to impersonate (repeatable)
    #[arg(long = "as-group", value_name = "GROUP")]
    impersonate_groups: Vec<String>,

    /// CRD group to leave out (repeatable, added to configured groups)
    #[arg(long = "ignore-group", value_name = "GROUP")]
    ignore_groups: Vec<String>,

    /// Resource names printed ahead of the CRD names, comma-separated
    #[arg(long, value_name = "a,b,...")]
    default_order: Option<String>,

    /// Print CRD names (crdNames) or kinds (kinds); kinds omits the default order
    #[arg(long)]
    mode: Option<OutputMode>,

    /// Output format: plain, flag or json
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Flag name for the flag format
    #[arg(long)]
    flag_name: Option<String>,

    /// dependentsFirst or ownersFirst
    #[arg(long)]
    direction: Option<Direction>,

    /// Keep map order within a rank group instead of sorting
    #[arg(long)]
    no_tie_break: bool,

    /// Also order CRD kinds nothing owns
    #[arg(long)]
    include_unowned: bool,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

impl Args {
    fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            impersonate_user: self.impersonate_user.clone(),
            impersonate_groups: self.impersonate_groups.clone(),
        }
    }

    /// Apply command-line overrides, the highest configuration layer
    fn apply_overrides(&self, config: &mut Config) {
        for group in &self.ignore_groups {
            if !config.ignored_groups.contains(group) {
                config.ignored_groups.push(group.clone());
            }
        }
        if let Some(order) = &self.default_order {
            config.default_order = config::split_list(order);
        }
        if let Some(mode) = self.mode {
            config.output.mode = mode;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(flag_name) = &self.flag_name {
            config.output.flag_name = flag_name.trim_start_matches('-').to_string();
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        if self.no_tie_break {
            config.deterministic_tie_break = false;
        }
        if self.include_unowned {
            config.include_unowned_kinds = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = Args::parse();
    let connection = args.connection_options();

    if let Some(command) = args.command.take() {
        return match command {
            Command::Config { subcommand } => {
                let context = crd_order::kube::resolve_context_name(&connection);
                cli::handle_config_command(subcommand, context.as_deref())
            }
            Command::Version => {
                cli::display_version();
                Ok(())
            }
        };
    }

    cli::init_logging(args.debug, args.log_file.as_deref())?;

    let context = crd_order::kube::resolve_context_name(&connection);
    tracing::debug!(context = ?context, "resolved kubeconfig context");

    let mut config =
        ConfigLoader::load(context.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config::validate_values(&config).context("Invalid configuration")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let client = crd_order::kube::create_client(&connection).await?;
    let service = RestoreOrderService::new(
        Arc::new(KubeSource::new(client)),
        RestoreOrderOptions::from(&config),
    );

    let order = service.compute(cancel).await?;

    for failure in &order.failures {
        eprintln!(
            "warning: cannot list {}: {}",
            failure.resource, failure.message
        );
    }

    let rendered = cli::render(&order, &config.output).context("Failed to render output")?;
    println!("{}", rendered);

    Ok(())
}
