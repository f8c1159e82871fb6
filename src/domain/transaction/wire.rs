//! Wire types for the transaction command interface.

use crate::error::TransactionError;
use crate::shared::Action;
use serde::{Deserialize, Serialize};

/// `POST /transactions` body. `amount` is the raw user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub action: Action,
    pub asset: String,
    pub amount: String,
}

/// Failure body returned by the command interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&TransactionError> for TransactionErrorResponse {
    fn from(e: &TransactionError) -> Self {
        Self {
            error: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}
