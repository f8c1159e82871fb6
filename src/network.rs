//! Network URL and address defaults.

/// Default upstream price API base URL (CoinGecko-compatible).
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.coingecko.com/api/v3";

/// Default address the relay server binds to.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default relay base URL polled by the refresh loop.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Relay endpoint path serving price snapshots.
pub const CRYPTO_DATA_PATH: &str = "/crypto-data";
