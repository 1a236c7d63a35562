#[cfg(not(any(all(target_os = "macos", target_arch = "aarch64"), target_os = "ios")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clf_serve_server::{ServiceState, router};
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting clf-serve runtime");

    let config = config::Config::from_env()?;
    tracing::info!(
        "Loaded configuration: addr={}, model_path={}",
        config.addr(),
        config.model_path.display()
    );

    // Requests are only accepted once this has finished, successful or not
    let state = ServiceState::load(&config.model_path);
    if !state.is_loaded() {
        tracing::warn!("Serving without a model, /predict will fail until redeployed");
    }
    let app = router(state);

    let addr = config.addr();
    tracing::info!("Runtime listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Runtime stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // never resolves, the server keeps running
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal, stopping runtime...");
}
