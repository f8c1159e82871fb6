//! Wall-clock sources for hour-of-day lookups.

use super::HourOfDay;
use std::sync::atomic::{AtomicU8, Ordering};

/// Supplies the current hour-of-day to the ledger and the desk.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn hour(&self) -> HourOfDay;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> HourOfDay {
        HourOfDay::now()
    }
}

/// A clock pinned to a settable hour. Used for simulations and tests.
#[derive(Debug)]
pub struct FixedClock {
    hour: AtomicU8,
}

impl FixedClock {
    pub fn new(hour: HourOfDay) -> Self {
        Self {
            hour: AtomicU8::new(hour.value()),
        }
    }

    pub fn set(&self, hour: HourOfDay) {
        self.hour.store(hour.value(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn hour(&self) -> HourOfDay {
        HourOfDay::new(self.hour.load(Ordering::SeqCst)).unwrap_or_else(HourOfDay::now)
    }
}
