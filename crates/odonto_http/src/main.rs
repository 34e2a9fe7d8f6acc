//! Server entry point.
//!
//! Reads configuration from the environment, starts logging, opens the store
//! and serves until Ctrl-C.

use log::{error, info};
use odonto_core::init_logging;
use odonto_http::{router, AppState, ServerConfig};
use std::error::Error;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir.to_string_lossy())?;

    let pool = config.open_store()?;
    let app = router(AppState::new(pool));

    let listener = TcpListener::bind(config.socket_addr()).await?;
    info!(
        "event=server_start module=http status=ok addr={} store={} pool_size={}",
        listener.local_addr()?,
        config.db_target,
        config.pool_size
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=http status=error error={err}");
        std::future::pending::<()>().await;
    }
}
