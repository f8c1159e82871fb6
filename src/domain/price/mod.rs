//! Price domain — relay snapshots, hour-indexed price slots, chart series.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{Asset, HourOfDay};
use rust_decimal::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

pub use state::PriceLedger;

/// The recorded price for one asset at one hour-of-day.
///
/// `None` means no price has been observed for that hour since the ledger was
/// created.
pub type PriceSlot = Option<Decimal>;

/// One relay response: current USD price per asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSnapshot {
    prices: BTreeMap<Asset, Decimal>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, asset: Asset, usd: Decimal) -> Self {
        self.prices.insert(asset, usd);
        self
    }

    pub fn insert(&mut self, asset: Asset, usd: Decimal) {
        self.prices.insert(asset, usd);
    }

    pub fn get(&self, asset: Asset) -> Option<Decimal> {
        self.prices.get(&asset).copied()
    }

    pub fn contains(&self, asset: Asset) -> bool {
        self.prices.contains_key(&asset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Asset, Decimal)> + '_ {
        self.prices.iter().map(|(asset, usd)| (*asset, *usd))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(Asset, Decimal)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (Asset, Decimal)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Line-chart data for the presentation layer: 24 hour labels and one
/// series per tracked asset, `null` where the hour is unobserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub labels: Vec<String>,
    pub series: BTreeMap<Asset, Vec<Option<f64>>>,
}

impl PriceSeries {
    pub(crate) fn hour_labels() -> Vec<String> {
        HourOfDay::all().map(|h| h.label()).collect()
    }
}
