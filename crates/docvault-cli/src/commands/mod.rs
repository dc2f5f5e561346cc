//! CLI command definitions and dispatch.

pub mod item;
pub mod serve;
pub mod transfer;
pub mod tree;

use clap::{Parser, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_service::{RequestContext, Services};

use crate::output::OutputFormat;

/// Identity recorded in the activity feed for CLI mutations.
const CLI_USER: &str = "cli";

/// DocVault: folder and document storage administration
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (defaults apply when omitted)
    #[arg(short, long, env = "DOCVAULT_CONFIG")]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the folder tree
    Tree,
    /// List files, optionally filtered by name
    Ls(tree::LsArgs),
    /// Create a folder
    Mkdir(item::MkdirArgs),
    /// Rename a folder or file
    Rename(item::RenameArgs),
    /// Delete a folder (recursively) or file
    Rm(item::RmArgs),
    /// Upload a local file into a folder
    Upload(transfer::UploadArgs),
    /// Download a file
    Get(transfer::GetArgs),
    /// Start the HTTP server
    Serve(serve::ServeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;
        if let Commands::Serve(args) = &self.command {
            return serve::execute(args, config).await;
        }

        let services = Services::open(&config).await?;
        let ctx = RequestContext::new(Some(CLI_USER.to_string()));
        match &self.command {
            Commands::Tree => tree::execute_tree(&services, self.format).await,
            Commands::Ls(args) => tree::execute_ls(args, &services, self.format).await,
            Commands::Mkdir(args) => item::execute_mkdir(args, &services, &ctx, self.format).await,
            Commands::Rename(args) => {
                item::execute_rename(args, &services, &ctx, self.format).await
            }
            Commands::Rm(args) => item::execute_rm(args, &services, &ctx).await,
            Commands::Upload(args) => {
                transfer::execute_upload(args, &services, &ctx, self.format).await
            }
            Commands::Get(args) => transfer::execute_get(args, &services).await,
            // Dispatched before the storage is opened.
            Commands::Serve(_) => Ok(()),
        }
    }
}

/// Helper: load configuration from an optional file plus the environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}
