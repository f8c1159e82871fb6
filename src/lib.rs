//! # Paper Desk
//!
//! A paper-trading desk for cryptocurrency prices: a relay that proxies a public
//! price API, an hour-indexed price ledger fed by a periodic refresh loop, and a
//! simulated cash-and-holdings wallet that executes buy/sell requests against
//! the current hour's price.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Assets, hour-of-day, domain slices (price ledger, wallet, transactions)
//! 2. **Desk** — `PaperDesk`, the single owned state object with the command interface
//! 3. **HTTP client** — `PriceHttp` used by the relay client and the upstream fetch
//! 4. **Refresh loop** — background task polling a `PriceSource` on a fixed interval
//! 5. **Relay server** — `GET /crypto-data` plus the JSON command endpoints
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paper_desk::prelude::*;
//!
//! let desk = PaperDesk::builder().build().into_shared();
//! let relay = RelayClient::new("http://127.0.0.1:3000", Duration::from_secs(10))?;
//!
//! let mut refresh = RefreshLoop::new(RefreshConfig::default(), relay, desk.clone());
//! refresh.start();
//!
//! let receipt = desk.write().await.submit_transaction(Action::Buy, "bitcoin", "0.5")?;
//! println!("{}", receipt.message);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes: assets, actions, hour-of-day, clocks, formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Error types.
pub mod error;

/// Runtime configuration.
pub mod config;

/// Network URL and address defaults.
pub mod network;

// ── Layer 2: Desk ────────────────────────────────────────────────────────────

/// `PaperDesk` — ledger + wallet + transaction log.
pub mod desk;

// ── Layer 3: HTTP client ─────────────────────────────────────────────────────

/// HTTP client for price snapshots.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: Refresh loop ────────────────────────────────────────────────────

/// Periodic snapshot polling.
pub mod refresh;

// ── Layer 5: Relay server ────────────────────────────────────────────────────

/// Price relay endpoint and JSON command interface.
#[cfg(feature = "server")]
pub mod relay;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Action, Asset, Clock, FixedClock, HourOfDay, SystemClock};

    // Domain types — prices
    pub use crate::domain::price::{PriceLedger, PriceSeries, PriceSlot, PriceSnapshot};

    // Domain types — wallet, transactions
    pub use crate::domain::transaction::{Transaction, TransactionLog, TransactionReceipt};
    pub use crate::domain::wallet::{Wallet, WalletSummary};

    // Desk
    pub use crate::desk::{PaperDesk, PaperDeskBuilder, SharedDesk};

    // Errors
    pub use crate::error::{ConfigError, DeskError, RefreshError, TransactionError};

    // Config
    pub use crate::config::DeskConfig;

    // Refresh loop
    pub use crate::refresh::{PriceSource, RefreshConfig, RefreshEvent, RefreshLoop, RefreshState};

    // HTTP client + relay client
    #[cfg(feature = "http")]
    pub use crate::domain::price::client::RelayClient;
    #[cfg(feature = "http")]
    pub use crate::http::PriceHttp;

    // Relay server
    #[cfg(feature = "server")]
    pub use crate::relay::{RelayState, UpstreamClient};
}
