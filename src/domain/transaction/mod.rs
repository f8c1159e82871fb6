//! Transaction domain — executed trade records and the append-only log.

pub mod state;
pub mod wire;

use crate::shared::{format_usd, Action, Asset};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::TransactionLog;

/// An executed simulated trade. Never mutated once logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 1-based position in the log.
    pub id: u64,
    pub action: Action,
    pub asset: Asset,
    pub amount: Decimal,
    /// Price of the current hour at execution time.
    pub price: Decimal,
    /// `price * amount`.
    pub total_cost: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// User-facing confirmation, e.g. `You bought 10 bitcoin for a total of $500000.00.`
    pub fn message(&self) -> String {
        format!(
            "You {} {} {} for a total of {}.",
            self.action.past_tense(),
            self.amount.normalize(),
            self.asset,
            format_usd(self.total_cost)
        )
    }
}

/// Result of a successful `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction: Transaction,
    pub message: String,
}

impl From<Transaction> for TransactionReceipt {
    fn from(transaction: Transaction) -> Self {
        let message = transaction.message();
        Self {
            transaction,
            message,
        }
    }
}
