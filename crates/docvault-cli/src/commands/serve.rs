//! Start the DocVault server.

use clap::Args;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the storage root
    #[arg(long)]
    pub root: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref root) = args.root {
        config.storage.root_path = root.clone();
    }

    println!("Starting DocVault server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Root: {}", config.storage.root_path);

    docvault_api::run_server(config, docvault_api::shutdown_signal()).await
}
