//! Wallet domain — simulated cash balance and per-asset holdings.

pub mod state;

use crate::shared::Asset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use state::Wallet;

/// Default starting cash balance.
pub const DEFAULT_INITIAL_CASH: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Wallet view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub cash: Decimal,
    pub holdings: BTreeMap<Asset, Decimal>,
    /// Cash plus holdings valued at the current hour's prices; unobserved
    /// prices count as zero.
    pub portfolio_value: Decimal,
}
