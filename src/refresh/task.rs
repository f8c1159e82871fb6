//! Refresh loop task — `tokio` background task driving snapshot fetches.
//!
//! - Immediate first tick, then one tick per interval
//! - Skip-if-busy: a tick that comes due during a fetch is dropped
//! - Per-fetch timeout
//! - Manual refresh and stop commands over an mpsc channel
//! - Stream-based event delivery to the consumer

use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::desk::SharedDesk;
use crate::error::RefreshError;
use crate::refresh::{PriceSource, RefreshConfig, RefreshEvent, RefreshState};

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    RefreshNow,
    Stop,
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState<S> {
    config: RefreshConfig,
    source: Arc<S>,
    desk: SharedDesk,
    event_tx: mpsc::Sender<RefreshEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    state: Arc<AtomicU8>,
}

impl<S> TaskState<S> {
    fn emit(&self, event: RefreshEvent) {
        if let Err(mpsc::error::TrySendError::Full(event)) = self.event_tx.try_send(event) {
            tracing::trace!(?event, "Event channel full, dropping refresh event");
        }
    }

    fn set_state(&self, state: RefreshState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

// ─── Public RefreshLoop ──────────────────────────────────────────────────────

/// Handle to the periodic refresh task.
///
/// The task is spawned by `start()` and runs until `stop()` is called or the
/// handle is dropped.
pub struct RefreshLoop<S: PriceSource> {
    config: RefreshConfig,
    source: Arc<S>,
    desk: SharedDesk,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<RefreshEvent>>,
    event_tx: mpsc::Sender<RefreshEvent>,
    task_handle: Option<JoinHandle<()>>,
    state: Arc<AtomicU8>,
}

impl<S: PriceSource> RefreshLoop<S> {
    /// Create a loop. Does not start ticking yet.
    pub fn new(config: RefreshConfig, source: S, desk: SharedDesk) -> Self {
        let (event_tx, event_rx) = mpsc::channel(64);
        Self {
            config,
            source: Arc::new(source),
            desk,
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            task_handle: None,
            state: Arc::new(AtomicU8::new(RefreshState::Idle as u8)),
        }
    }

    /// Spawn the background task. The first refresh runs immediately.
    ///
    /// Calling `start` on a running loop is a no-op.
    pub fn start(&mut self) {
        if self.cmd_tx.is_some() {
            return;
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        self.cmd_tx = Some(cmd_tx);
        self.state.store(RefreshState::Idle as u8, Ordering::SeqCst);

        let task = TaskState {
            config: self.config.clone(),
            source: Arc::clone(&self.source),
            desk: Arc::clone(&self.desk),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            state: Arc::clone(&self.state),
        };

        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            "Refresh loop started"
        );
        self.task_handle = Some(tokio::spawn(run_task(task)));
    }

    /// Stop the task and wait for it to finish.
    ///
    /// An in-flight fetch is allowed to complete; if the task has not exited
    /// within five seconds it is aborted.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(Command::Stop).await;
        }

        if let Some(mut handle) = self.task_handle.take() {
            if tokio::time::timeout(Duration::from_secs(5), &mut handle)
                .await
                .is_err()
            {
                tracing::warn!("Refresh task did not stop in time, aborting");
                handle.abort();
            }
        }

        self.state.store(RefreshState::Stopped as u8, Ordering::SeqCst);
    }

    /// Request an out-of-schedule refresh.
    ///
    /// Requests made while others are still queued are coalesced.
    pub fn refresh_now(&self) -> Result<(), RefreshError> {
        match &self.cmd_tx {
            Some(tx) => match tx.try_send(Command::RefreshNow) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
                Err(mpsc::error::TrySendError::Closed(_)) => Err(RefreshError::LoopStopped),
            },
            None => Err(RefreshError::LoopStopped),
        }
    }

    pub fn is_running(&self) -> bool {
        self.cmd_tx.is_some()
    }

    pub fn state(&self) -> RefreshState {
        RefreshState::from(self.state.load(Ordering::SeqCst))
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Stream of loop events.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `stop()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = RefreshEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl<S: PriceSource> Drop for RefreshLoop<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task<S: PriceSource>(mut task: TaskState<S>) {
    let mut ticker = tokio::time::interval(task.config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            cmd = task.cmd_rx.recv() => match cmd {
                Some(Command::RefreshNow) => {
                    tracing::debug!("Manual refresh requested");
                }
                Some(Command::Stop) | None => break,
            },
        }

        let started = Instant::now();
        run_refresh(&task).await;

        if started.elapsed() >= task.config.interval {
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Refresh outlasted the interval, skipping missed tick"
            );
            ticker.reset();
        }
    }

    task.set_state(RefreshState::Stopped);
    task.emit(RefreshEvent::Stopped);
    tracing::info!("Refresh loop stopped");
}

/// One tick: fetch, apply, report. Never retries.
async fn run_refresh<S: PriceSource>(task: &TaskState<S>) {
    task.set_state(RefreshState::Refreshing);

    let fetched = tokio::time::timeout(task.config.fetch_timeout, task.source.fetch_snapshot())
        .await
        .unwrap_or_else(|_| {
            Err(RefreshError::RelayUnavailable(format!(
                "fetch timed out after {}ms",
                task.config.fetch_timeout.as_millis()
            )))
        });

    let result = match fetched {
        Ok(snapshot) => task.desk.write().await.refresh(&snapshot),
        Err(e) => Err(e),
    };
    task.set_state(RefreshState::Idle);

    match result {
        Ok(hour) => {
            tracing::info!(hour = hour.value(), "Prices refreshed");
            task.emit(RefreshEvent::Refreshed { hour });
        }
        Err(e) => {
            tracing::warn!("Refresh failed: {}", e);
            task.emit(RefreshEvent::Failed(e));
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
