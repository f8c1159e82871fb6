//! Refresh loop — periodic price snapshot polling.
//!
//! A background task ticks once immediately and then every `interval`,
//! fetches a snapshot from a `PriceSource` and applies it to the shared desk.
//! Ticks that come due while a fetch is in flight are skipped, never
//! overlapped, and every fetch is bounded by `fetch_timeout`.

pub mod task;

use crate::domain::price::PriceSnapshot;
use crate::error::RefreshError;
use crate::shared::HourOfDay;
use std::future::Future;
use std::time::Duration;

pub use task::RefreshLoop;

// ─── PriceSource ─────────────────────────────────────────────────────────────

/// Anything that can produce a price snapshot: the HTTP relay client, or an
/// in-process source.
pub trait PriceSource: Send + Sync + 'static {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<PriceSnapshot, RefreshError>> + Send;
}

// ─── RefreshState ────────────────────────────────────────────────────────────

/// Loop state as observed from outside the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RefreshState {
    Idle = 0,
    Refreshing = 1,
    Stopped = 2,
}

impl From<u8> for RefreshState {
    fn from(v: u8) -> Self {
        match v {
            0 => RefreshState::Idle,
            1 => RefreshState::Refreshing,
            _ => RefreshState::Stopped,
        }
    }
}

// ─── RefreshEvent ────────────────────────────────────────────────────────────

/// Events emitted by the loop to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshEvent {
    /// A snapshot was applied to the slots of `hour`.
    Refreshed { hour: HourOfDay },
    /// The tick was abandoned; slots are unchanged.
    Failed(RefreshError),
    /// The task has exited.
    Stopped,
}

// ─── RefreshConfig ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}
