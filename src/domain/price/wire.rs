//! Wire types for price snapshots (relay + upstream share this shape).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single asset entry: `{ "usd": 50000.12 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsdQuote {
    #[serde(default)]
    pub usd: Option<f64>,
}

/// Relay response body: `{ "<assetId>": { "usd": <number> }, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceResponse(pub BTreeMap<String, UsdQuote>);

impl PriceResponse {
    pub fn get(&self, id: &str) -> Option<&UsdQuote> {
        self.0.get(id)
    }
}
