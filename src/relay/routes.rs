//! Route handlers.

use super::RelayState;
use crate::domain::price::PriceSeries;
use crate::domain::transaction::wire::{TransactionErrorResponse, TransactionRequest};
use crate::domain::transaction::{Transaction, TransactionReceipt};
use crate::domain::wallet::WalletSummary;
use crate::error::TransactionError;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Rejected transactions answer 422 with an `{ error, message }` body.
impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(TransactionErrorResponse::from(&self)),
        )
            .into_response()
    }
}

/// GET /crypto-data - upstream prices, passed through.
pub(super) async fn get_crypto_data(State(st): State<RelayState>) -> Response {
    match st.upstream.fetch().await {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            tracing::error!("Error fetching crypto data from upstream: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching data").into_response()
        }
    }
}

/// POST /transactions - execute a buy or sell.
pub(super) async fn post_transaction(
    State(st): State<RelayState>,
    Json(req): Json<TransactionRequest>,
) -> Result<Json<TransactionReceipt>, TransactionError> {
    let mut desk = st.desk.write().await;
    desk.submit_transaction(req.action, &req.asset, &req.amount)
        .map(Json)
}

/// GET /transactions - the log, oldest first.
pub(super) async fn get_transactions(State(st): State<RelayState>) -> Json<Vec<Transaction>> {
    Json(st.desk.read().await.transactions().entries().to_vec())
}

/// GET /wallet
pub(super) async fn get_wallet(State(st): State<RelayState>) -> Json<WalletSummary> {
    Json(st.desk.read().await.summary())
}

/// GET /prices - 24 hourly slots per asset.
pub(super) async fn get_prices(State(st): State<RelayState>) -> Json<PriceSeries> {
    Json(st.desk.read().await.price_series())
}

pub(super) async fn health() -> &'static str {
    "ok"
}
