//! Relay server — `GET /crypto-data` and the JSON command interface.
//!
//! The relay proxies the upstream price API for the refresh loop and serves
//! transaction commands plus wallet, history and chart reads against the
//! shared desk.

mod routes;
pub mod upstream;

use crate::desk::SharedDesk;
use crate::network::CRYPTO_DATA_PATH;

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;

pub use upstream::UpstreamClient;

/// Handler state.
#[derive(Clone)]
pub struct RelayState {
    pub upstream: UpstreamClient,
    pub desk: SharedDesk,
}

impl RelayState {
    pub fn new(upstream: UpstreamClient, desk: SharedDesk) -> Self {
        Self { upstream, desk }
    }
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route(CRYPTO_DATA_PATH, get(routes::get_crypto_data))
        .route(
            "/transactions",
            post(routes::post_transaction).get(routes::get_transactions),
        )
        .route("/wallet", get(routes::get_wallet))
        .route("/prices", get(routes::get_prices))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: RelayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Relay listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
