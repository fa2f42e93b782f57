//! Quotebook CLI
//!
//! Command-line interface for Quotebook - a quote collection kept in sync
//! with a remote server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use quotebook_core::transfer::EXPORT_FILE_NAME;
use quotebook_core::{Config, MemoryStore, QuoteError, QuoteWidget, StorageError};

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Quotebook - random quotes by category, synced with a server")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote from the selected category
    Show,
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Quote category
        #[arg(short, long)]
        category: String,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Only this category (defaults to the selected one)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Select a category ("all" for every quote)
    Filter {
        category: String,
    },
    /// Export quotes to a JSON file
    Export {
        #[arg(default_value = EXPORT_FILE_NAME)]
        path: PathBuf,
    },
    /// Import quotes from a JSON file
    Import {
        path: PathBuf,
    },
    /// Fetch quotes from the server now
    Sync,
    /// Start an interactive session (default)
    Run,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, remote_url, sync_enabled, sync_interval_secs,
        /// fetch_limit, request_timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli).await {
        eprintln!("Error: {:#}", e);
        if let Some(suggestion) = storage_error(&e).and_then(StorageError::recovery_suggestion) {
            eprintln!("Hint: {}", suggestion);
        }
        std::process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the widget
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init_logging(&config);

    // Session storage lives as long as this process
    let widget = QuoteWidget::from_config(&config, Arc::new(MemoryStore::new()))
        .context("Failed to open quote storage")?;

    let command = cli.command.unwrap_or(Commands::Run);

    // Read commands start from the latest remote state
    if matches!(
        command,
        Commands::Show | Commands::List { .. } | Commands::Categories
    ) {
        commands::sync::sync_quiet(&widget, &config, &output).await;
    }

    match command {
        Commands::Show => commands::quote::show(&widget, &output).await,
        Commands::Add { text, category } => {
            commands::quote::add(&widget, &text, &category, &output).await
        }
        Commands::List { category } => commands::quote::list(&widget, category, &output).await,
        Commands::Categories => commands::quote::categories(&widget, &output).await,
        Commands::Filter { category } => {
            let mut widget = widget;
            commands::quote::filter(&mut widget, &category, &output).await
        }
        Commands::Export { path } => commands::transfer::export(&widget, &path, &output).await,
        Commands::Import { path } => commands::transfer::import(&widget, &path, &output).await,
        Commands::Sync => commands::sync::sync(&widget, &config, &output).await,
        Commands::Run => commands::run::run(widget, &config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Find a storage failure anywhere in the error chain
fn storage_error(error: &anyhow::Error) -> Option<&StorageError> {
    error.chain().find_map(|cause| {
        cause
            .downcast_ref::<StorageError>()
            .or_else(|| match cause.downcast_ref::<QuoteError>() {
                Some(QuoteError::Storage(storage)) => Some(storage),
                _ => None,
            })
    })
}
