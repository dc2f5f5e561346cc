//! Read-only commands: tree and file listing.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use docvault_core::error::AppError;
use docvault_core::types::FileRef;
use docvault_service::Services;

use crate::output::{self, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Case-insensitive substring of the file name
    #[arg(short, long)]
    pub search: Option<String>,
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// Name
    name: String,
    /// Folder
    folder: String,
    /// Item ID
    id: String,
}

impl From<&FileRef> for FileRow {
    fn from(file: &FileRef) -> Self {
        Self {
            name: file.name.clone(),
            folder: if file.folder_path.is_empty() {
                "/".to_string()
            } else {
                file.folder_path.clone()
            },
            id: file.id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

/// Print the folder tree
pub async fn execute_tree(services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let tree = services.folders.tree().await?;
    output::print_tree(&tree, format);
    Ok(())
}

/// List files
pub async fn execute_ls(
    args: &LsArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    let files = services.files.list_all_files(args.search.as_deref()).await?;
    match format {
        OutputFormat::Json => output::print_json(&files),
        OutputFormat::Table => {
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
