//! Relay client — fetches price snapshots from `GET /crypto-data`.

use super::wire::PriceResponse;
use super::PriceSnapshot;
use crate::error::{HttpError, RefreshError};
use crate::http::PriceHttp;
use crate::network::CRYPTO_DATA_PATH;
use crate::refresh::PriceSource;

use std::time::Duration;

/// HTTP price source backed by a running relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: PriceHttp,
    url: String,
}

impl RelayClient {
    /// `base_url` is the relay origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            http: PriceHttp::new(timeout)?,
            url: format!("{}{}", base_url.trim_end_matches('/'), CRYPTO_DATA_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw relay body.
    pub async fn fetch(&self) -> Result<PriceResponse, HttpError> {
        self.http.get(&self.url).await
    }

    /// Relay body converted to a snapshot. Entries without a usable price are
    /// left out, so the ledger reports them as missing.
    pub async fn snapshot(&self) -> Result<PriceSnapshot, HttpError> {
        Ok(self.fetch().await?.into())
    }
}

impl PriceSource for RelayClient {
    async fn fetch_snapshot(&self) -> Result<PriceSnapshot, RefreshError> {
        Ok(self.snapshot().await?)
    }
}
