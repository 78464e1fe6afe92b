//! Live countdown for one table
//!
//! A background task ticks at a fixed period and publishes a
//! [`CountdownFrame`] per tick on a `watch` channel. The occupation itself is
//! only re-queried on start, every `refetch_every` ticks and on
//! [`WatchHandle::refresh`]; ticks in between re-classify the cached record
//! against the current time.
//!
//! Lookups run as separate tasks tagged with a [`Ticket`], so switching to
//! another table while a lookup is in flight never shows the previous
//! table's answer.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shared::{Occupancy, TableOccupation, TableStatus};
use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::ClientConfig;
use crate::clock::{Clock, SystemClock};
use crate::generation::{RequestGeneration, Ticket};
use crate::query::OccupationQuery;
use crate::resolver::{ActiveOccupationResolver, Resolution};

/// Label of a frame whose lookup failed
pub const UNAVAILABLE: &str = "Occupancy unavailable";

/// What the countdown shows at one tick
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownFrame {
    pub table_id: i64,
    /// Ticks since the table was selected
    pub tick: u64,
    pub at: DateTime<Utc>,
    pub occupation: Option<TableOccupation>,
    /// `None` when the lookup failed
    pub occupancy: Option<Occupancy>,
    pub status: TableStatus,
    /// Reason of the last failed lookup
    pub error: Option<String>,
}

impl CountdownFrame {
    pub fn new(table_id: i64, tick: u64, at: DateTime<Utc>, resolution: &Resolution) -> Self {
        Self {
            table_id,
            tick,
            at,
            occupation: resolution.occupation().cloned(),
            occupancy: resolution.occupancy(at),
            status: resolution.table_status(at),
            error: match resolution {
                Resolution::Unavailable { reason } => Some(reason.clone()),
                Resolution::Known(_) => None,
            },
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.error.is_some()
    }

    /// Countdown text, e.g. `"4m 59s"`
    pub fn label(&self) -> String {
        match &self.occupancy {
            Some(occupancy) => occupancy.countdown(),
            None => UNAVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for CountdownFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.occupancy {
            Some(occupancy) => write!(f, "[{}] {}", self.status, occupancy),
            None => write!(
                f,
                "[{}] {}: {}",
                self.status,
                UNAVAILABLE,
                self.error.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Spawns countdown tasks
pub struct OccupationWatcher<Q> {
    resolver: Arc<ActiveOccupationResolver<Q>>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    refetch_every: u32,
}

impl<Q: OccupationQuery + 'static> OccupationWatcher<Q> {
    pub fn new(resolver: Arc<ActiveOccupationResolver<Q>>, config: &ClientConfig) -> Self {
        Self {
            resolver,
            clock: Arc::new(SystemClock),
            tick: config.tick(),
            refetch_every: config.refetch_every,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Start counting down for `table_id`.
    ///
    /// Must be called inside a tokio runtime. The task runs until the
    /// handle is stopped or dropped.
    pub fn watch(&self, table_id: i64) -> WatchHandle {
        let (frames_tx, frames_rx) = watch::channel(None);
        let (table_tx, table_rx) = watch::channel(table_id);
        let refresh = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        let task = WatchTask {
            resolver: self.resolver.clone(),
            clock: self.clock.clone(),
            tick: self.tick,
            refetch_every: self.refetch_every,
            frames: frames_tx,
            table_rx,
            refresh: refresh.clone(),
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(task.run());

        WatchHandle {
            frames: frames_rx,
            table_tx,
            refresh,
            shutdown,
            task: Some(task),
        }
    }
}

/// Control side of a running countdown
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct WatchHandle {
    frames: watch::Receiver<Option<CountdownFrame>>,
    table_tx: watch::Sender<i64>,
    refresh: Arc<Notify>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Receiver of frames; `None` until the first lookup of the current
    /// table has completed.
    pub fn subscribe(&self) -> watch::Receiver<Option<CountdownFrame>> {
        self.frames.clone()
    }

    pub fn latest(&self) -> Option<CountdownFrame> {
        self.frames.borrow().clone()
    }

    pub fn table_id(&self) -> i64 {
        *self.table_tx.borrow()
    }

    /// Count down for another table; lookups still in flight are discarded.
    pub fn switch_table(&self, table_id: i64) {
        self.table_tx.send_replace(table_id);
    }

    /// Re-query now, e.g. after the occupation was edited.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stop and wait for the task to exit.
    pub async fn join(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::error!(error = %e, "Occupation watcher task failed");
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

type FetchResult = (Ticket, Resolution);

struct WatchTask<Q> {
    resolver: Arc<ActiveOccupationResolver<Q>>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    refetch_every: u32,
    frames: watch::Sender<Option<CountdownFrame>>,
    table_rx: watch::Receiver<i64>,
    refresh: Arc<Notify>,
    shutdown: CancellationToken,
}

impl<Q: OccupationQuery + 'static> WatchTask<Q> {
    async fn run(self) {
        let WatchTask {
            resolver,
            clock,
            tick,
            refetch_every,
            frames,
            mut table_rx,
            refresh,
            shutdown,
        } = self;

        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<FetchResult>();
        let fetcher = Fetcher {
            resolver,
            shutdown: shutdown.clone(),
            results: results_tx,
        };
        let generation = RequestGeneration::new();

        let table_id = *table_rx.borrow_and_update();
        tracing::info!(table_id, "Occupation watcher started");

        let mut pending = Some(fetcher.spawn(generation.switch_table(table_id)));
        let mut current: Option<Resolution> = None;
        let mut ticks: u64 = 0;

        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,

                changed = table_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let table_id = *table_rx.borrow_and_update();
                    tracing::info!(table_id, "Switching watched table");
                    current = None;
                    ticks = 0;
                    frames.send_replace(None);
                    pending = Some(fetcher.spawn(generation.switch_table(table_id)));
                }

                _ = refresh.notified() => {
                    if let Some(ticket) = generation.issue() {
                        tracing::debug!(table_id = ticket.table_id(), "Refresh requested");
                        pending = Some(fetcher.spawn(ticket));
                    }
                }

                Some((ticket, resolution)) = results_rx.recv() => {
                    if pending == Some(ticket) {
                        pending = None;
                    }
                    if let Some(resolution) = generation.accept(&ticket, resolution) {
                        let frame = CountdownFrame::new(ticket.table_id(), ticks, clock.now(), &resolution);
                        frames.send_replace(Some(frame));
                        current = Some(resolution);
                    }
                }

                _ = ticker.tick() => {
                    ticks += 1;
                    let due = refetch_every > 0 && ticks % u64::from(refetch_every) == 0;
                    if due && pending.is_none()
                        && let Some(ticket) = generation.issue()
                    {
                        pending = Some(fetcher.spawn(ticket));
                    }
                    if let (Some(resolution), Some(table_id)) = (&current, generation.current_table()) {
                        let frame = CountdownFrame::new(table_id, ticks, clock.now(), resolution);
                        frames.send_replace(Some(frame));
                    }
                }
            }
        }

        tracing::info!(table_id = ?generation.current_table(), "Occupation watcher stopped");
    }
}

/// Runs lookups off the tick loop
struct Fetcher<Q> {
    resolver: Arc<ActiveOccupationResolver<Q>>,
    shutdown: CancellationToken,
    results: mpsc::UnboundedSender<FetchResult>,
}

impl<Q: OccupationQuery + 'static> Fetcher<Q> {
    fn spawn(&self, ticket: Ticket) -> Ticket {
        let resolver = self.resolver.clone();
        let shutdown = self.shutdown.clone();
        let results = self.results.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                resolution = resolver.resolve(ticket.table_id()) => {
                    // The loop may already be gone
                    let _ = results.send((ticket, resolution));
                }
            }
        });
        ticket
    }
}
