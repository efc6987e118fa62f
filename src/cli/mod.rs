//! Command-line interface - argument parsing, command dispatch and the interactive shell.
//!
//! This layer plays the part of the presentation layer: it owns the catalog snapshot
//! and selection state (through [`OrderSession`](crate::core::selection::OrderSession)),
//! turns validation errors into warnings, and prints results to stdout.

/// One-shot command handlers
pub mod commands;
/// Interactive selection shell
pub mod shell;

use crate::{config::settings::AppConfig, core::export::ReceiptFormat, errors::Result};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::{io::Write, path::PathBuf};
use tokio::io::BufReader;
use tracing::warn;

/// Browse the dish catalog, record orders and export order history.
#[derive(Debug, Parser)]
#[command(name = "order-desk", version)]
pub struct Cli {
    /// Path of the TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the dish catalog
    Menu,
    /// Add a dish to the catalog
    Add {
        /// Dish name
        #[arg(long)]
        name: String,
        /// Unit price
        #[arg(long)]
        price: f64,
        /// Image file to copy into the images directory
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a dish from the catalog
    Delete {
        /// Dish id
        id: i64,
    },
    /// Select dishes by id and record the order
    Order {
        /// Dish ids to select
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Also write a receipt for the saved order
        #[arg(long)]
        receipt: Option<PathBuf>,
        /// Receipt format (text or html)
        #[arg(long, default_value = "text")]
        format: ReceiptFormat,
    },
    /// Write a receipt for a selection without recording it
    Receipt {
        /// Dish ids to select
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Output file
        #[arg(long)]
        output: PathBuf,
        /// Receipt format (text or html)
        #[arg(long, default_value = "text")]
        format: ReceiptFormat,
    },
    /// Show order history, newest first
    History,
    /// Export order history as CSV
    ExportCsv {
        /// Output file
        path: PathBuf,
    },
    /// Start an interactive selection session
    Shell,
}

/// Shared state available to all commands.
pub struct AppData {
    /// Database connection for all storage operations
    pub database: DatabaseConnection,
    /// Loaded application configuration
    pub config: AppConfig,
}

impl AppData {
    /// Creates a new `AppData` from an open connection and the loaded configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: AppConfig) -> Self {
        Self { database, config }
    }
}

/// Runs a parsed command, writing user-facing output to `out`.
///
/// Validation failures are reported as warnings and do not fail the command; storage
/// and I/O failures are returned to the caller.
///
/// # Errors
/// Returns any non-validation error raised by the command.
pub async fn run<W: Write>(command: Commands, data: &AppData, out: &mut W) -> Result<()> {
    let result = match command {
        Commands::Menu => commands::menu(data, out).await,
        Commands::Add { name, price, image } => {
            commands::add(data, &name, price, image.as_deref(), out).await
        }
        Commands::Delete { id } => commands::delete(data, id, out).await,
        Commands::Order {
            ids,
            receipt,
            format,
        } => commands::order(data, &ids, receipt.as_deref(), format, out).await,
        Commands::Receipt {
            ids,
            output,
            format,
        } => commands::receipt(data, &ids, &output, format, out).await,
        Commands::History => commands::show_history(data, out).await,
        Commands::ExportCsv { path } => commands::export_csv(data, &path, out).await,
        Commands::Shell => {
            shell::run_shell(data, BufReader::new(tokio::io::stdin()), out).await
        }
    };

    match result {
        Err(e) if e.is_validation() => {
            warn!("Command rejected: {}", e);
            writeln!(out, "❌ {}", commands::describe_rejection(&e))?;
            Ok(())
        }
        other => other,
    }
}
