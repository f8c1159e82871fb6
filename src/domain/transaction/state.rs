//! Transaction log — append-only, insertion order is chronological order.

use super::Transaction;
use crate::shared::{Action, Asset};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Ordered history of executed transactions.
///
/// Entries are only ever appended; there is no way to edit or remove one.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an executed trade and return the logged record.
    pub(crate) fn append(
        &mut self,
        action: Action,
        asset: Asset,
        amount: Decimal,
        price: Decimal,
        total_cost: Decimal,
        timestamp: DateTime<Utc>,
    ) -> &Transaction {
        let id = self.entries.len() as u64 + 1;
        self.entries.push(Transaction {
            id,
            action,
            asset,
            amount,
            price,
            total_cost,
            timestamp,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
