//! `PaperDesk` — the single owned state object of a paper-trading session.
//!
//! Bundles the hourly price ledger, the wallet and the transaction log, and
//! exposes the command interface (`execute`, `submit_transaction`). One desk
//! is built at startup and shared explicitly as a `SharedDesk`.

use crate::config::DeskConfig;
use crate::domain::price::{PriceLedger, PriceSeries, PriceSnapshot};
use crate::domain::transaction::{TransactionLog, TransactionReceipt};
use crate::domain::wallet::{Wallet, WalletSummary, DEFAULT_INITIAL_CASH};
use crate::error::{RefreshError, TransactionError};
use crate::shared::{parse_amount, Action, Asset, Clock, HourOfDay, SystemClock};

use async_lock::RwLock;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

/// A desk shared between the refresh loop and the command interface.
pub type SharedDesk = Arc<RwLock<PaperDesk>>;

/// Price ledger + wallet + transaction log.
#[derive(Debug, Clone)]
pub struct PaperDesk {
    ledger: PriceLedger,
    wallet: Wallet,
    log: TransactionLog,
}

impl PaperDesk {
    pub fn builder() -> PaperDeskBuilder {
        PaperDeskBuilder::default()
    }

    pub fn from_config(config: &DeskConfig) -> Self {
        Self::builder()
            .assets(config.assets.iter().copied())
            .initial_cash(config.initial_cash)
            .build()
    }

    pub fn into_shared(self) -> SharedDesk {
        Arc::new(RwLock::new(self))
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn ledger(&self) -> &PriceLedger {
        &self.ledger
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.log
    }

    pub fn tracked(&self) -> &[Asset] {
        self.ledger.tracked()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        self.ledger.clock()
    }

    // ── Prices ───────────────────────────────────────────────────────────

    /// Apply a snapshot to the current hour. Returns the hour written.
    pub fn refresh(&mut self, snapshot: &PriceSnapshot) -> Result<HourOfDay, RefreshError> {
        let hour = self.ledger.current_hour();
        self.ledger.refresh_at(hour, snapshot)?;
        tracing::debug!(hour = hour.value(), assets = snapshot.len(), "Price slots updated");
        Ok(hour)
    }

    pub fn current_price(&self, asset: Asset) -> Option<Decimal> {
        self.ledger.current_price(asset)
    }

    pub fn price_series(&self) -> PriceSeries {
        self.ledger.series()
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Execute a buy or sell at the current hour's price.
    ///
    /// Checks run in order and the first failure wins: amount, price,
    /// then funds (buy) or holdings (sell). A failure leaves the wallet and
    /// the log untouched; a success appends exactly one transaction.
    pub fn execute(
        &mut self,
        action: Action,
        asset: Asset,
        amount: Decimal,
    ) -> Result<TransactionReceipt, TransactionError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidAmount(amount.to_string()));
        }

        let price = self
            .ledger
            .current_price(asset)
            .ok_or_else(|| TransactionError::PriceUnavailable(asset.to_string()))?;

        let total_cost = match action {
            Action::Buy => self.wallet.buy(asset, amount, price)?,
            Action::Sell => self.wallet.sell(asset, amount, price)?,
        };

        let transaction = self
            .log
            .append(action, asset, amount, price, total_cost, Utc::now())
            .clone();

        tracing::info!(
            id = transaction.id,
            action = %action,
            asset = %asset,
            amount = %amount,
            total = %total_cost,
            "Transaction executed"
        );

        Ok(transaction.into())
    }

    /// Command-interface entry point: raw asset id and amount text.
    ///
    /// Unparseable, non-finite or non-positive amounts fail with
    /// `InvalidAmount`; unknown asset ids fail with `PriceUnavailable`.
    pub fn submit_transaction(
        &mut self,
        action: Action,
        asset: &str,
        amount: &str,
    ) -> Result<TransactionReceipt, TransactionError> {
        let parsed = parse_amount(amount)
            .filter(|a| *a > Decimal::ZERO)
            .ok_or_else(|| TransactionError::InvalidAmount(amount.to_string()))?;

        let asset = asset
            .parse::<Asset>()
            .map_err(|e| TransactionError::PriceUnavailable(e.0))?;

        let result = self.execute(action, asset, parsed);
        if let Err(e) = &result {
            tracing::debug!(action = %action, asset = %asset, amount, "Transaction rejected: {}", e);
        }
        result
    }

    // ── Wallet view ──────────────────────────────────────────────────────

    /// Cash, holdings, and their value at the current hour's prices.
    ///
    /// The portfolio value saturates at `Decimal::MAX`.
    pub fn summary(&self) -> WalletSummary {
        let holdings = self.wallet.holdings().clone();
        let portfolio_value = holdings
            .iter()
            .filter_map(|(asset, amount)| {
                self.ledger
                    .current_price(*asset)
                    .map(|price| price.checked_mul(*amount).unwrap_or(Decimal::MAX))
            })
            .fold(self.wallet.cash(), |total, value| {
                total.checked_add(value).unwrap_or(Decimal::MAX)
            });

        WalletSummary {
            cash: self.wallet.cash(),
            portfolio_value,
            holdings,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct PaperDeskBuilder {
    assets: Vec<Asset>,
    initial_cash: Decimal,
    clock: Arc<dyn Clock>,
}

impl Default for PaperDeskBuilder {
    fn default() -> Self {
        Self {
            assets: Asset::ALL.to_vec(),
            initial_cash: DEFAULT_INITIAL_CASH,
            clock: Arc::new(SystemClock),
        }
    }
}

impl PaperDeskBuilder {
    /// Assets to track. Replaces the default set.
    pub fn assets(mut self, assets: impl IntoIterator<Item = Asset>) -> Self {
        self.assets = assets.into_iter().collect();
        self
    }

    pub fn initial_cash(mut self, cash: Decimal) -> Self {
        self.initial_cash = cash;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> PaperDesk {
        let ledger = PriceLedger::with_clock(self.assets, self.clock);
        let wallet = Wallet::new(self.initial_cash, ledger.tracked().iter().copied());
        PaperDesk {
            ledger,
            wallet,
            log: TransactionLog::new(),
        }
    }
}
