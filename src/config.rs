//! Runtime configuration, read from `PAPER_DESK_*` environment variables.

use crate::domain::wallet::DEFAULT_INITIAL_CASH;
use crate::error::ConfigError;
use crate::network::{DEFAULT_BIND_ADDR, DEFAULT_RELAY_URL, DEFAULT_UPSTREAM_URL};
use crate::refresh::RefreshConfig;
use crate::shared::{parse_amount, Asset};

use rust_decimal::Decimal;
use std::time::Duration;

pub const ENV_BIND: &str = "PAPER_DESK_BIND";
pub const ENV_UPSTREAM_URL: &str = "PAPER_DESK_UPSTREAM_URL";
pub const ENV_RELAY_URL: &str = "PAPER_DESK_RELAY_URL";
pub const ENV_ASSETS: &str = "PAPER_DESK_ASSETS";
pub const ENV_INITIAL_CASH: &str = "PAPER_DESK_INITIAL_CASH";
pub const ENV_REFRESH_SECS: &str = "PAPER_DESK_REFRESH_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "PAPER_DESK_FETCH_TIMEOUT_SECS";

/// Desk, relay and refresh loop settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    /// Address the relay server listens on.
    pub bind_addr: String,
    /// Upstream price API base URL.
    pub upstream_url: String,
    /// Relay base URL polled by the refresh loop.
    pub relay_url: String,
    pub assets: Vec<Asset>,
    pub initial_cash: Decimal,
    pub refresh_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            assets: Asset::ALL.to_vec(),
            initial_cash: DEFAULT_INITIAL_CASH,
            refresh_interval: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl DeskConfig {
    /// Read the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, map, test fixture).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_BIND) {
            config.bind_addr = v;
        }
        if let Some(v) = lookup(ENV_UPSTREAM_URL) {
            config.upstream_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup(ENV_RELAY_URL) {
            config.relay_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup(ENV_ASSETS) {
            config.assets = parse_assets(&v)?;
        }
        if let Some(v) = lookup(ENV_INITIAL_CASH) {
            config.initial_cash = parse_amount(&v)
                .filter(|cash| !cash.is_sign_negative())
                .ok_or_else(|| invalid(ENV_INITIAL_CASH, &v, "expected a non-negative number"))?;
        }
        if let Some(v) = lookup(ENV_REFRESH_SECS) {
            config.refresh_interval = parse_secs(ENV_REFRESH_SECS, &v)?;
        }
        if let Some(v) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            config.fetch_timeout = parse_secs(ENV_FETCH_TIMEOUT_SECS, &v)?;
        }

        Ok(config)
    }

    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            interval: self.refresh_interval,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

fn parse_assets(value: &str) -> Result<Vec<Asset>, ConfigError> {
    let mut assets = Vec::new();
    for id in value.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        let asset = id
            .parse::<Asset>()
            .map_err(|e| invalid(ENV_ASSETS, value, &e.to_string()))?;
        if !assets.contains(&asset) {
            assets.push(asset);
        }
    }
    if assets.is_empty() {
        return Err(invalid(ENV_ASSETS, value, "at least one asset is required"));
    }
    Ok(assets)
}

fn parse_secs(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(invalid(key, value, "expected a positive whole number of seconds")),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
