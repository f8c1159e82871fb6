//! Paper desk server: relay + command interface + refresh loop in one process.
//!
//! Configure with `PAPER_DESK_*` variables (a `.env` file is honored) and
//! `RUST_LOG` for log filtering.

use paper_desk::prelude::*;
use paper_desk::relay;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DeskError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paper_desk=info")),
        )
        .init();

    let config = DeskConfig::from_env()?;
    tracing::info!(
        assets = ?config.assets,
        upstream = %config.upstream_url,
        "Starting paper desk"
    );

    let desk = PaperDesk::from_config(&config).into_shared();
    let state = RelayState::new(UpstreamClient::new(&config)?, desk.clone());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(relay::serve(listener, state, async {
        let _ = shutdown_rx.await;
    }));

    let source = RelayClient::new(&config.relay_url, config.fetch_timeout)?;
    let mut refresh = RefreshLoop::new(config.refresh_config(), source, desk);
    refresh.start();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    refresh.stop().await;
    let _ = shutdown_tx.send(());
    server.await??;

    Ok(())
}
