//! Desk error types.

use crate::shared::Asset;
use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level desk error, returned by the server process.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Refresh error: {0}")]
    Refresh(#[from] RefreshError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,
}

/// Refresh failures. Neither variant changes any price slot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefreshError {
    /// The snapshot lacks a price for at least one tracked asset.
    #[error("Malformed snapshot: missing prices for {}", join_assets(.missing))]
    MalformedSnapshot { missing: Vec<Asset> },

    /// Network/HTTP failure, undecodable body, or fetch timeout.
    #[error("Relay unavailable: {0}")]
    RelayUnavailable(String),

    /// The refresh loop task is not running.
    #[error("Refresh loop is not running")]
    LoopStopped,
}

impl From<HttpError> for RefreshError {
    fn from(e: HttpError) -> Self {
        RefreshError::RelayUnavailable(e.to_string())
    }
}

/// User transaction failures. None of them mutate the wallet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransactionError {
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("No price available for {0} this hour")]
    PriceUnavailable(String),

    #[error("Insufficient funds: need ${required}, have ${available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient holdings: want to sell {requested} {asset}, hold {available}")]
    InsufficientHoldings {
        asset: Asset,
        requested: Decimal,
        available: Decimal,
    },
}

impl TransactionError {
    /// Stable machine-readable name, used by the command interface.
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionError::InvalidAmount(_) => "invalid_amount",
            TransactionError::PriceUnavailable(_) => "price_unavailable",
            TransactionError::InsufficientFunds { .. } => "insufficient_funds",
            TransactionError::InsufficientHoldings { .. } => "insufficient_holdings",
        }
    }
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key} ({value:?}): {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

fn join_assets(assets: &[Asset]) -> String {
    assets
        .iter()
        .map(Asset::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
