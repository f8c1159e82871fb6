//! Low-level HTTP client — `PriceHttp`.
//!
//! One GET primitive shared by the relay client (refresh loop side) and the
//! upstream fetch (relay server side). Returns decoded bodies or an
//! `HttpError` classified from the status code.

use crate::error::HttpError;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// JSON-over-HTTP client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct PriceHttp {
    client: Client,
    timeout: Duration,
}

impl PriceHttp {
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        tracing::debug!(url, "GET");

        let resp = self.client.get(url).send().await.map_err(classify)?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await.map_err(classify)?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            404 => Err(HttpError::NotFound(body_text)),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}
