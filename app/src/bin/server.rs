//! Headless form server.
//!
//! Serves the generator form and API, then waits for Ctrl+C.

use qr_magic_lib::app::SharedState;
use qr_magic_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    qr_magic_lib::init_tracing();

    tracing::info!("Starting QR Magic server");

    let (sm, config, dir) = qr_magic_lib::init_foundation()?;
    let state = SharedState::new(sm, config, dir);

    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Shutting down...");
        }
        _ = state.shutdown_token().cancelled() => {}
    }

    state.shutdown();
    if let Err(e) = server_handle.await {
        tracing::warn!("Server task ended abnormally: {e}");
    }
    Ok(())
}
