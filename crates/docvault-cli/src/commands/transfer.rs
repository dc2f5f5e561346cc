//! File transfer commands: upload and get.

use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_service::{RequestContext, Services};

use crate::output::{self, OutputFormat};

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local file to upload
    pub local: PathBuf,
    /// Destination folder path (created when missing)
    pub folder: String,
}

/// Arguments for `get`
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Folder path (empty string for the storage root)
    pub folder: String,
    /// File name
    pub name: String,
    /// Where to write the file (defaults to the file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Upload a local file
pub async fn execute_upload(
    args: &UploadArgs,
    services: &Services,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let file_name = args
        .local
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation("Local path has no valid UTF-8 file name"))?
        .to_string();
    let local = args.local.display().to_string();
    let data = tokio::fs::read(&args.local)
        .await
        .map_err(|e| AppError::from_io(e, "read", &local))?;
    debug!(path = %local, bytes = data.len(), "Read local file");

    let node = services
        .files
        .upload_file(ctx, &file_name, Bytes::from(data), &args.folder)
        .await?;
    match format {
        OutputFormat::Json => output::print_json(&node),
        OutputFormat::Table => output::print_success(&format!("Uploaded '{}'", node.path)),
    }
    Ok(())
}

/// Download a file to the local filesystem
pub async fn execute_get(args: &GetArgs, services: &Services) -> Result<(), AppError> {
    let mut download = services.files.retrieve_file(&args.folder, &args.name).await?;
    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&download.file_name));
    let target_display = target.display().to_string();

    let mut file = tokio::fs::File::create(&target)
        .await
        .map_err(|e| AppError::from_io(e, "create", &target_display))?;
    let mut written = 0u64;
    while let Some(chunk) = download.stream.next().await {
        let chunk = chunk.map_err(|e| AppError::from_io(e, "read", &args.name))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::from_io(e, "write", &target_display))?;
        written += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| AppError::from_io(e, "write", &target_display))?;
    debug!(path = %target_display, bytes = written, "Download written");

    output::print_success(&format!(
        "Saved '{}' ({} bytes, {})",
        target_display, written, download.content_type
    ));
    Ok(())
}
