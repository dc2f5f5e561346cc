//! Mutating commands: mkdir, rename, rm.

use clap::Args;
use dialoguer::Confirm;

use docvault_core::error::AppError;
use docvault_service::{RequestContext, Services};

use crate::output::{self, OutputFormat};

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,
    /// Parent folder path (omit for a top-level folder)
    #[arg(short, long)]
    pub parent: Option<String>,
}

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Path of the folder or file
    pub path: String,
    /// New name
    pub new_name: String,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RmArgs {
    /// Path of the folder or file
    pub path: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Create a folder
pub async fn execute_mkdir(
    args: &MkdirArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let is_root = args.parent.is_none();
    let node = services
        .folders
        .create_folder(ctx, &args.name, args.parent.as_deref(), is_root)
        .await?;
    match format {
        OutputFormat::Json => output::print_json(&node),
        OutputFormat::Table => output::print_success(&format!("Created folder '{}'", node.path)),
    }
    Ok(())
}

/// Rename a folder or file
pub async fn execute_rename(
    args: &RenameArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let node = services
        .folders
        .rename_item(ctx, &args.path, &args.new_name)
        .await?;
    match format {
        OutputFormat::Json => output::print_json(&node),
        OutputFormat::Table => {
            output::print_success(&format!("Renamed '{}' to '{}'", args.path, node.path))
        }
    }
    Ok(())
}

/// Delete a folder or file, asking first unless `--yes` is given
pub async fn execute_rm(
    args: &RmArgs,
    services: &Services,
    ctx: &RequestContext,
) -> Result<(), AppError> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete '{}' and everything inside it? This cannot be undone",
                args.path
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;
        if !confirmed {
            output::print_warning("Aborted");
            return Ok(());
        }
    }

    services.folders.delete_item(ctx, &args.path).await?;
    output::print_success(&format!("Deleted '{}'", args.path));
    Ok(())
}
