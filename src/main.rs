use cleenscore::{AppState, init_tracing, load_config, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Load configuration using lib.rs method
    let config = load_config()?;
    tracing::info!("Loaded configuration:\n{}", config);

    let state = AppState::from_config(&config)?;

    let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
    tracing::info!(address = %listener.local_addr()?, "CleenScore waitlist listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
