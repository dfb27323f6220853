use anyhow::Result;
use clap::Parser;
use solana_blinks::application::app::App;
use solana_blinks::config::Config;
use solana_blinks::service::api::{self, CorsConfig, ServerConfig};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    tracing::info!(
        "Building transactions against {} ({:?})",
        config.rpc_endpoint,
        config.cluster
    );

    // Create a shutdown channel
    let (shutdown_sender, _) = broadcast::channel(1);

    let app = Arc::new(App::new(&config));
    let server_config = ServerConfig {
        listen_port: config.listen_port,
        blockchain_id: config.cluster.blockchain_id().to_string(),
        cors: CorsConfig::default(),
    };

    // Start the API server
    let mut server_handle = tokio::spawn(api::start_server(
        shutdown_sender.clone(),
        app,
        server_config,
    ));

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, shutting down...");
            let _ = shutdown_sender.send(());
        }
        result = &mut server_handle => {
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    tracing::error!("API server error: {:?}", e);
                    Err(e)
                }
                Err(e) => Err(e.into()),
            };
        }
    }

    // Wait for the server to drain
    if let Ok(Err(e)) = server_handle.await {
        tracing::error!("API server error: {:?}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
