//! Upstream price API client (CoinGecko `simple/price` shape).

use crate::config::DeskConfig;
use crate::error::HttpError;
use crate::http::PriceHttp;
use crate::shared::Asset;

/// Fetches current USD prices for the configured assets from the upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: PriceHttp,
    url: String,
}

impl UpstreamClient {
    pub fn new(config: &DeskConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http: PriceHttp::new(config.fetch_timeout)?,
            url: simple_price_url(&config.upstream_url, &config.assets),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Upstream body, undecoded beyond JSON. The relay passes it through as is.
    pub async fn fetch(&self) -> Result<serde_json::Value, HttpError> {
        self.http.get(&self.url).await
    }
}

fn simple_price_url(base: &str, assets: &[Asset]) -> String {
    let ids = assets
        .iter()
        .map(|asset| asset.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{}/simple/price?ids={}&vs_currencies=usd",
        base.trim_end_matches('/'),
        urlencoding::encode(&ids)
    )
}
