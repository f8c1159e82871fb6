//! Wallet state — app-owned, mutated only through validated trades.

use crate::error::TransactionError;
use crate::shared::Asset;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Cash balance plus held quantity per asset.
///
/// `cash >= 0` and every holding `>= 0` hold after every call: each trade is
/// validated in full before any field changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    cash: Decimal,
    holdings: BTreeMap<Asset, Decimal>,
}

impl Wallet {
    /// Negative starting cash is clamped to zero.
    pub fn new(initial_cash: Decimal, assets: impl IntoIterator<Item = Asset>) -> Self {
        Self {
            cash: initial_cash.max(Decimal::ZERO),
            holdings: assets
                .into_iter()
                .map(|asset| (asset, Decimal::ZERO))
                .collect(),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn holding(&self, asset: Asset) -> Decimal {
        self.holdings.get(&asset).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn holdings(&self) -> &BTreeMap<Asset, Decimal> {
        &self.holdings
    }

    /// Spend `price * amount` cash for `amount` of `asset`. Returns the cost.
    pub(crate) fn buy(
        &mut self,
        asset: Asset,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Decimal, TransactionError> {
        let required = price.checked_mul(amount).ok_or_else(|| out_of_range(amount))?;
        if self.cash < required {
            return Err(TransactionError::InsufficientFunds {
                required,
                available: self.cash,
            });
        }
        let held = self
            .holding(asset)
            .checked_add(amount)
            .ok_or_else(|| out_of_range(amount))?;

        self.cash -= required;
        self.holdings.insert(asset, held);
        Ok(required)
    }

    /// Sell `amount` of `asset` for `price * amount` cash. Returns the proceeds.
    pub(crate) fn sell(
        &mut self,
        asset: Asset,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Decimal, TransactionError> {
        let available = self.holding(asset);
        if available < amount {
            return Err(TransactionError::InsufficientHoldings {
                asset,
                requested: amount,
                available,
            });
        }

        let proceeds = price.checked_mul(amount).ok_or_else(|| out_of_range(amount))?;
        let cash = self
            .cash
            .checked_add(proceeds)
            .ok_or_else(|| out_of_range(amount))?;

        self.holdings.insert(asset, available - amount);
        self.cash = cash;
        Ok(proceeds)
    }
}

/// The trade total or resulting balance does not fit in a `Decimal`.
fn out_of_range(amount: Decimal) -> TransactionError {
    TransactionError::InvalidAmount(amount.to_string())
}
