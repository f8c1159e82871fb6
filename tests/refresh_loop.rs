//! Integration tests for the refresh loop, driven by in-process price sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use rust_decimal::Decimal;
use tokio::time::timeout;

use paper_desk::prelude::*;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn prices() -> PriceSnapshot {
    PriceSnapshot::new()
        .with(Asset::Bitcoin, Decimal::from(50000))
        .with(Asset::Ethereum, Decimal::from(2500))
}

fn test_desk(hour: u8) -> SharedDesk {
    PaperDesk::builder()
        .assets([Asset::Bitcoin, Asset::Ethereum])
        .clock(Arc::new(FixedClock::new(HourOfDay::new(hour).unwrap())))
        .build()
        .into_shared()
}

fn config(interval_ms: u64, fetch_timeout_ms: u64) -> RefreshConfig {
    RefreshConfig {
        interval: Duration::from_millis(interval_ms),
        fetch_timeout: Duration::from_millis(fetch_timeout_ms),
    }
}

/// Returns a fixed snapshot after an optional delay, counting calls and
/// tracking the peak number of overlapping fetches.
struct StaticSource {
    snapshot: PriceSnapshot,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl StaticSource {
    fn new(snapshot: PriceSnapshot) -> Self {
        Self {
            snapshot,
            delay: Duration::ZERO,
            calls: Arc::default(),
            in_flight: Arc::default(),
            peak_in_flight: Arc::default(),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl PriceSource for StaticSource {
    async fn fetch_snapshot(&self) -> Result<PriceSnapshot, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

struct DownSource;

impl PriceSource for DownSource {
    async fn fetch_snapshot(&self) -> Result<PriceSnapshot, RefreshError> {
        Err(RefreshError::RelayUnavailable("connection refused".into()))
    }
}

/// Next event, with the events stream created and dropped within this call.
async fn next_event<S: PriceSource>(refresh: &RefreshLoop<S>) -> RefreshEvent {
    let events = refresh.events();
    tokio::pin!(events);
    timeout(TEST_TIMEOUT, events.next())
        .await
        .expect("timed out waiting for a refresh event")
        .expect("event stream ended")
}

#[tokio::test]
async fn test_first_tick_is_immediate() {
    let desk = test_desk(7);
    // An hour-long interval: only the immediate tick can produce an event.
    let mut refresh = RefreshLoop::new(config(3_600_000, 1_000), StaticSource::new(prices()), desk.clone());
    refresh.start();

    let event = next_event(&refresh).await;
    assert_eq!(
        event,
        RefreshEvent::Refreshed {
            hour: HourOfDay::new(7).unwrap()
        }
    );
    assert_eq!(
        desk.read().await.current_price(Asset::Bitcoin),
        Some(Decimal::from(50000))
    );

    refresh.stop().await;
}

#[tokio::test]
async fn test_ticks_repeat_on_interval() {
    let source = StaticSource::new(prices());
    let calls = Arc::clone(&source.calls);
    let mut refresh = RefreshLoop::new(config(50, 1_000), source, test_desk(0));
    refresh.start();

    for _ in 0..3 {
        assert!(matches!(
            next_event(&refresh).await,
            RefreshEvent::Refreshed { .. }
        ));
    }
    refresh.stop().await;
    assert!(calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_partial_snapshot_fails_and_leaves_slots_unchanged() {
    let desk = test_desk(3);
    let partial = PriceSnapshot::new().with(Asset::Bitcoin, Decimal::from(50000));
    let mut refresh = RefreshLoop::new(config(3_600_000, 1_000), StaticSource::new(partial), desk.clone());
    refresh.start();

    assert_eq!(
        next_event(&refresh).await,
        RefreshEvent::Failed(RefreshError::MalformedSnapshot {
            missing: vec![Asset::Ethereum]
        })
    );
    let desk = desk.read().await;
    assert_eq!(desk.current_price(Asset::Bitcoin), None);
    assert!(desk.ledger().last_refreshed_at().is_none());
    drop(desk);

    refresh.stop().await;
}

#[tokio::test]
async fn test_relay_failure_is_reported_and_loop_keeps_running() {
    let mut refresh = RefreshLoop::new(config(50, 1_000), DownSource, test_desk(0));
    refresh.start();

    for _ in 0..2 {
        assert!(matches!(
            next_event(&refresh).await,
            RefreshEvent::Failed(RefreshError::RelayUnavailable(_))
        ));
    }
    assert!(refresh.is_running());

    refresh.stop().await;
}

#[tokio::test]
async fn test_slow_fetch_times_out() {
    let source = StaticSource::new(prices()).with_delay(Duration::from_secs(10));
    let desk = test_desk(0);
    let mut refresh = RefreshLoop::new(config(3_600_000, 100), source, desk.clone());
    refresh.start();

    assert!(matches!(
        next_event(&refresh).await,
        RefreshEvent::Failed(RefreshError::RelayUnavailable(_))
    ));
    assert_eq!(desk.read().await.current_price(Asset::Bitcoin), None);
    assert_eq!(refresh.state(), RefreshState::Idle);

    refresh.stop().await;
}

#[tokio::test]
async fn test_ticks_never_overlap() {
    // Fetches take three intervals each.
    let source = StaticSource::new(prices()).with_delay(Duration::from_millis(150));
    let calls = Arc::clone(&source.calls);
    let peak = Arc::clone(&source.peak_in_flight);
    let mut refresh = RefreshLoop::new(config(50, 1_000), source, test_desk(0));
    refresh.start();

    tokio::time::sleep(Duration::from_millis(700)).await;
    refresh.stop().await;

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    let calls = calls.load(Ordering::SeqCst);
    assert!((2..=6).contains(&calls), "unexpected fetch count {calls}");
}

#[tokio::test]
async fn test_state_is_refreshing_during_fetch() {
    let source = StaticSource::new(prices()).with_delay(Duration::from_millis(500));
    let mut refresh = RefreshLoop::new(config(3_600_000, 2_000), source, test_desk(0));
    refresh.start();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(refresh.state(), RefreshState::Refreshing);

    assert!(matches!(
        next_event(&refresh).await,
        RefreshEvent::Refreshed { .. }
    ));
    assert_eq!(refresh.state(), RefreshState::Idle);

    refresh.stop().await;
}

#[tokio::test]
async fn test_transactions_not_blocked_by_fetch() {
    let source = StaticSource::new(prices()).with_delay(Duration::from_millis(500));
    let desk = test_desk(0);
    let mut refresh = RefreshLoop::new(config(3_600_000, 2_000), source, desk.clone());
    refresh.start();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(refresh.state(), RefreshState::Refreshing);

    let result = timeout(Duration::from_millis(50), async {
        desk.write()
            .await
            .execute(Action::Buy, Asset::Bitcoin, Decimal::ONE)
    })
    .await
    .expect("desk lock held during fetch");
    assert!(matches!(result, Err(TransactionError::PriceUnavailable(_))));

    refresh.stop().await;
}

#[tokio::test]
async fn test_refresh_now_triggers_extra_tick() {
    let source = StaticSource::new(prices());
    let calls = Arc::clone(&source.calls);
    let mut refresh = RefreshLoop::new(config(3_600_000, 1_000), source, test_desk(0));
    refresh.start();

    assert!(matches!(
        next_event(&refresh).await,
        RefreshEvent::Refreshed { .. }
    ));
    refresh.refresh_now().unwrap();
    assert!(matches!(
        next_event(&refresh).await,
        RefreshEvent::Refreshed { .. }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    refresh.stop().await;
}

#[tokio::test]
async fn test_stop_emits_stopped() {
    let mut refresh = RefreshLoop::new(config(3_600_000, 1_000), StaticSource::new(prices()), test_desk(0));
    refresh.start();
    assert!(matches!(
        next_event(&refresh).await,
        RefreshEvent::Refreshed { .. }
    ));

    refresh.stop().await;

    assert_eq!(next_event(&refresh).await, RefreshEvent::Stopped);
    assert_eq!(refresh.state(), RefreshState::Stopped);
    assert!(!refresh.is_running());
    assert_eq!(refresh.refresh_now(), Err(RefreshError::LoopStopped));
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let source = StaticSource::new(prices());
    let calls = Arc::clone(&source.calls);
    let mut refresh = RefreshLoop::new(config(3_600_000, 1_000), source, test_desk(0));
    refresh.start();
    refresh.start();

    assert!(matches!(
        next_event(&refresh).await,
        RefreshEvent::Refreshed { .. }
    ));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    refresh.stop().await;
}
