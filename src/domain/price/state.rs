//! Price ledger — app-owned, hour-indexed price slots per tracked asset.

use super::{PriceSeries, PriceSlot, PriceSnapshot};
use crate::error::RefreshError;
use crate::shared::{Asset, Clock, HourOfDay, SystemClock, HOURS_PER_DAY};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 24 slots, indexed by hour-of-day.
pub type DaySlots = [PriceSlot; HOURS_PER_DAY];

/// Hourly price ledger for a fixed set of tracked assets.
///
/// Each refresh writes the snapshot price of every tracked asset into the slot
/// of the current hour; all other hours keep whatever was last written there.
/// A refresh either writes every tracked asset or nothing.
#[derive(Debug, Clone)]
pub struct PriceLedger {
    tracked: Vec<Asset>,
    slots: BTreeMap<Asset, DaySlots>,
    last_refreshed_at: Option<DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl PriceLedger {
    /// Ledger on local system time.
    pub fn new(tracked: impl IntoIterator<Item = Asset>) -> Self {
        Self::with_clock(tracked, Arc::new(SystemClock))
    }

    pub fn with_clock(tracked: impl IntoIterator<Item = Asset>, clock: Arc<dyn Clock>) -> Self {
        let mut tracked: Vec<Asset> = tracked.into_iter().collect();
        tracked.sort();
        tracked.dedup();
        let slots = tracked
            .iter()
            .map(|asset| (*asset, [None; HOURS_PER_DAY]))
            .collect();
        Self {
            tracked,
            slots,
            last_refreshed_at: None,
            clock,
        }
    }

    pub fn tracked(&self) -> &[Asset] {
        &self.tracked
    }

    pub fn is_tracked(&self, asset: Asset) -> bool {
        self.slots.contains_key(&asset)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Hour the next refresh or price lookup targets.
    pub fn current_hour(&self) -> HourOfDay {
        self.clock.hour()
    }

    /// Record a snapshot in the current hour's slots.
    ///
    /// The hour is read once, at call start.
    pub fn refresh(
        &mut self,
        snapshot: &PriceSnapshot,
    ) -> Result<&BTreeMap<Asset, DaySlots>, RefreshError> {
        let hour = self.clock.hour();
        self.refresh_at(hour, snapshot)
    }

    /// Record a snapshot in the slots of `hour`.
    pub fn refresh_at(
        &mut self,
        hour: HourOfDay,
        snapshot: &PriceSnapshot,
    ) -> Result<&BTreeMap<Asset, DaySlots>, RefreshError> {
        let missing: Vec<Asset> = self
            .tracked
            .iter()
            .copied()
            .filter(|asset| !snapshot.contains(*asset))
            .collect();
        if !missing.is_empty() {
            return Err(RefreshError::MalformedSnapshot { missing });
        }

        for (asset, day) in self.slots.iter_mut() {
            day[hour.index()] = snapshot.get(*asset);
        }
        self.last_refreshed_at = Some(Utc::now());

        Ok(&self.slots)
    }

    /// Price of `asset` for the current hour, `None` if unobserved or untracked.
    pub fn current_price(&self, asset: Asset) -> Option<Decimal> {
        self.price_at(asset, self.clock.hour())
    }

    pub fn price_at(&self, asset: Asset, hour: HourOfDay) -> Option<Decimal> {
        self.slots.get(&asset).and_then(|day| day[hour.index()])
    }

    pub fn day(&self, asset: Asset) -> Option<&DaySlots> {
        self.slots.get(&asset)
    }

    pub fn slots(&self) -> &BTreeMap<Asset, DaySlots> {
        &self.slots
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed_at
    }

    /// Chart export of every tracked asset.
    pub fn series(&self) -> PriceSeries {
        PriceSeries {
            labels: PriceSeries::hour_labels(),
            series: self
                .slots
                .iter()
                .map(|(asset, day)| {
                    (
                        *asset,
                        day.iter()
                            .map(|slot| slot.and_then(|usd| usd.to_f64()))
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}
