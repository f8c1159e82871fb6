//! Conversions between relay wire types and price snapshots.

use super::wire::{PriceResponse, UsdQuote};
use super::PriceSnapshot;
use crate::shared::fmt::price_from_f64;
use crate::shared::Asset;
use rust_decimal::prelude::*;

impl From<PriceResponse> for PriceSnapshot {
    /// Unknown ids are skipped. Entries without a finite, non-negative `usd`
    /// value are dropped, so the ledger reports them as missing.
    fn from(response: PriceResponse) -> Self {
        let mut snapshot = PriceSnapshot::new();
        for (id, quote) in response.0 {
            let Ok(asset) = id.parse::<Asset>() else {
                tracing::debug!(id = %id, "Ignoring untracked asset in snapshot");
                continue;
            };
            match quote.usd.and_then(price_from_f64) {
                Some(usd) if !usd.is_sign_negative() => snapshot.insert(asset, usd),
                _ => tracing::warn!(asset = %asset, usd = ?quote.usd, "Dropping invalid price"),
            }
        }
        snapshot
    }
}

impl From<&PriceSnapshot> for PriceResponse {
    fn from(snapshot: &PriceSnapshot) -> Self {
        PriceResponse(
            snapshot
                .iter()
                .map(|(asset, usd)| {
                    (
                        asset.as_str().to_string(),
                        UsdQuote {
                            usd: usd.to_f64(),
                        },
                    )
                })
                .collect(),
        )
    }
}
