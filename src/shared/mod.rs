//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: `Asset` and `Action` serialize as
//! the lowercase ids the relay and the command interface use on the wire.

pub mod clock;
pub mod fmt;

pub use clock::{Clock, FixedClock, SystemClock};
pub use fmt::{format_usd, parse_amount};

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// ─── Asset ───────────────────────────────────────────────────────────────────

/// A tracked cryptocurrency, identified by its upstream price API id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Bitcoin,
    Ethereum,
    Uniswap,
}

impl Asset {
    /// Every asset the desk knows how to track, in display order.
    pub const ALL: [Asset; 3] = [Asset::Bitcoin, Asset::Ethereum, Asset::Uniswap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Bitcoin => "bitcoin",
            Asset::Ethereum => "ethereum",
            Asset::Uniswap => "uniswap",
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An asset id outside the known set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown asset: {0}")]
pub struct UnknownAsset(pub String);

impl FromStr for Asset {
    type Err = UnknownAsset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitcoin" => Ok(Asset::Bitcoin),
            "ethereum" => Ok(Asset::Ethereum),
            "uniswap" => Ok(Asset::Uniswap),
            _ => Err(UnknownAsset(s.to_string())),
        }
    }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// Trade direction of a simulated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
        }
    }

    /// Verb used in receipt messages.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Buy => "bought",
            Action::Sell => "sold",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Action::Buy),
            "sell" => Ok(Action::Sell),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

// ─── HourOfDay ───────────────────────────────────────────────────────────────

/// Number of hourly slots per asset.
pub const HOURS_PER_DAY: usize = 24;

/// Hour of the local wall-clock day, always in `0..24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HourOfDay(u8);

impl HourOfDay {
    pub fn new(hour: u8) -> Option<Self> {
        (usize::from(hour) < HOURS_PER_DAY).then_some(Self(hour))
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        // chrono guarantees hour() < 24
        Self(dt.hour() as u8)
    }

    /// Current local hour.
    pub fn now() -> Self {
        Self::from_datetime(&chrono::Local::now())
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    /// Chart axis label, e.g. `"7:00"`.
    pub fn label(&self) -> String {
        format!("{}:00", self.0)
    }

    /// All 24 hours in order.
    pub fn all() -> impl Iterator<Item = HourOfDay> {
        (0..HOURS_PER_DAY as u8).map(HourOfDay)
    }
}

impl std::fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl TryFrom<u8> for HourOfDay {
    type Error = String;

    fn try_from(hour: u8) -> Result<Self, Self::Error> {
        HourOfDay::new(hour).ok_or_else(|| format!("Hour out of range: {}", hour))
    }
}

impl From<HourOfDay> for u8 {
    fn from(hour: HourOfDay) -> Self {
        hour.0
    }
}
