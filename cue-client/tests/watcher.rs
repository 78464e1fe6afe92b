//! Live countdown driven by a paused tokio clock and a manual wall clock

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use cue_client::{
    ActiveOccupationResolver, ClientConfig, ClientError, ClientResult, CountdownFrame,
    InMemoryOccupations, ManualClock, OccupationQuery, OccupationWatcher, WatchHandle,
};
use shared::{OccupationQueryRequest, Occupancy, PaginatedResponse, TableOccupation, TableStatus};
use tokio::sync::watch;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
}

fn occupation(
    id: i64,
    table_id: i64,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
) -> TableOccupation {
    TableOccupation {
        id,
        table_id,
        started_at,
        finished_at,
        created_at: t0() - Duration::days(1),
        updated_at: t0() - Duration::days(1),
    }
}

fn start<Q: OccupationQuery + 'static>(
    query: Q,
    clock: Arc<ManualClock>,
    refetch_every: u32,
    table_id: i64,
) -> WatchHandle {
    let resolver = Arc::new(ActiveOccupationResolver::new(query));
    let config = ClientConfig::default().with_refetch_every(refetch_every);
    OccupationWatcher::new(resolver, &config)
        .with_clock(clock)
        .watch(table_id)
}

async fn frame_where(
    rx: &mut watch::Receiver<Option<CountdownFrame>>,
    mut pred: impl FnMut(&CountdownFrame) -> bool,
) -> CountdownFrame {
    let frame = tokio::time::timeout(
        StdDuration::from_secs(600),
        rx.wait_for(|frame| frame.as_ref().is_some_and(&mut pred)),
    )
    .await
    .expect("timed out waiting for frame")
    .expect("watcher stopped");
    frame.clone().unwrap()
}

/// Fails every lookup while `failing` is set
struct Flaky {
    inner: InMemoryOccupations,
    failing: AtomicBool,
}

#[async_trait]
impl OccupationQuery for Flaky {
    async fn query_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                message: "maintenance".into(),
            });
        }
        self.inner.query_occupations(request).await
    }
}

/// Answers lookups for some tables late
struct Delayed {
    inner: InMemoryOccupations,
    delays: HashMap<i64, StdDuration>,
    calls: AtomicUsize,
}

#[async_trait]
impl OccupationQuery for Delayed {
    async fn query_occupations(
        &self,
        request: &OccupationQueryRequest,
    ) -> ClientResult<PaginatedResponse<TableOccupation>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = request.filter.table_id.and_then(|id| self.delays.get(&id)) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.query_occupations(request).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_open_ended_counts_up() {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = InMemoryOccupations::new(vec![occupation(1, 4, t0() - Duration::seconds(10), None)]);
    let handle = start(store, clock.clone(), 15, 4);
    let mut rx = handle.subscribe();

    let frame = frame_where(&mut rx, |_| true).await;
    assert_eq!(frame.table_id, 4);
    assert_eq!(frame.status, TableStatus::Occupied);
    assert_eq!(frame.label(), "10s");

    clock.advance(Duration::seconds(5));
    let frame = frame_where(&mut rx, |f| f.label() == "15s").await;
    assert_eq!(
        frame.occupancy,
        Some(Occupancy::OpenEnded {
            elapsed: Duration::seconds(15)
        })
    );

    clock.advance(Duration::seconds(3600));
    frame_where(&mut rx, |f| f.label() == "1h 0m 15s").await;
}

#[tokio::test(start_paused = true)]
async fn test_upcoming_becomes_timed_then_expires() {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = InMemoryOccupations::new(vec![occupation(
        1,
        4,
        t0() + Duration::seconds(2),
        Some(t0() + Duration::seconds(4)),
    )]);
    let handle = start(store, clock.clone(), 0, 4);
    let mut rx = handle.subscribe();

    let frame = frame_where(&mut rx, |_| true).await;
    assert_eq!(
        frame.occupancy,
        Some(Occupancy::Upcoming {
            starts_in: Duration::seconds(2)
        })
    );
    assert_eq!(frame.status, TableStatus::Available);

    clock.advance(Duration::seconds(3));
    let frame = frame_where(&mut rx, |f| f.status == TableStatus::Occupied).await;
    assert_eq!(frame.label(), "1s");

    clock.advance(Duration::seconds(2));
    let frame = frame_where(&mut rx, |f| f.occupancy == Some(Occupancy::Expired)).await;
    assert_eq!(frame.label(), "Time is up");
    assert_eq!(frame.status, TableStatus::Available);
}

#[tokio::test(start_paused = true)]
async fn test_failures_keep_the_loop_running() {
    let clock = Arc::new(ManualClock::new(t0()));
    let query = Arc::new(Flaky {
        inner: InMemoryOccupations::new(vec![occupation(1, 4, t0() - Duration::minutes(1), None)]),
        failing: AtomicBool::new(true),
    });
    let handle = start(query.clone(), clock.clone(), 0, 4);
    let mut rx = handle.subscribe();

    let frame = frame_where(&mut rx, |_| true).await;
    assert!(frame.is_unavailable());
    assert_eq!(frame.status, TableStatus::Available);
    assert!(frame.error.as_deref().is_some_and(|e| e.contains("maintenance")));

    // Still ticking
    let later = frame_where(&mut rx, |f| f.tick > frame.tick + 2).await;
    assert!(later.is_unavailable());

    query.failing.store(false, Ordering::SeqCst);
    handle.refresh();
    let frame = frame_where(&mut rx, |f| !f.is_unavailable()).await;
    assert_eq!(frame.status, TableStatus::Occupied);
    assert_eq!(frame.label(), "1m 0s");
}

#[tokio::test(start_paused = true)]
async fn test_periodic_refetch_picks_up_new_occupation() {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = Arc::new(InMemoryOccupations::default());
    let handle = start(store.clone(), clock.clone(), 3, 9);
    let mut rx = handle.subscribe();

    let frame = frame_where(&mut rx, |_| true).await;
    assert_eq!(frame.occupancy, Some(Occupancy::NoOccupation));
    assert_eq!(frame.label(), "No active occupation");

    store
        .insert(occupation(
            1,
            9,
            t0() - Duration::minutes(1),
            Some(t0() + Duration::minutes(4)),
        ))
        .await;
    let frame = frame_where(&mut rx, |f| f.status == TableStatus::Occupied).await;
    assert_eq!(frame.label(), "4m 0s");
}

#[tokio::test(start_paused = true)]
async fn test_switching_table_discards_late_answer() {
    let clock = Arc::new(ManualClock::new(t0()));
    let query = Arc::new(Delayed {
        inner: InMemoryOccupations::new(vec![
            occupation(1, 1, t0() - Duration::minutes(1), None),
            occupation(2, 2, t0() + Duration::hours(1), None),
        ]),
        delays: HashMap::from([(1, StdDuration::from_secs(30))]),
        calls: AtomicUsize::new(0),
    });
    let handle = start(query.clone(), clock, 0, 1);
    let mut rx = handle.subscribe();
    while query.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    handle.switch_table(2);
    assert_eq!(handle.table_id(), 2);
    let frame = frame_where(&mut rx, |_| true).await;
    assert_eq!(frame.table_id, 2);

    // Let table 1's lookup finish long after the switch
    tokio::time::sleep(StdDuration::from_secs(60)).await;
    let latest = handle.latest().unwrap();
    assert_eq!(latest.table_id, 2);
    assert_eq!(latest.occupation.map(|o| o.table_id), Some(2));
    assert_eq!(latest.status, TableStatus::Available);
    assert!(query.calls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_the_task() {
    let clock = Arc::new(ManualClock::new(t0()));
    let handle = start(InMemoryOccupations::default(), clock, 15, 1);
    let mut rx = handle.subscribe();
    frame_where(&mut rx, |_| true).await;

    handle.stop();
    assert!(handle.is_stopped());
    tokio::time::timeout(StdDuration::from_secs(5), handle.join())
        .await
        .expect("watcher did not stop");
    assert!(rx.has_changed().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_the_task() {
    let clock = Arc::new(ManualClock::new(t0()));
    let handle = start(InMemoryOccupations::default(), clock, 15, 1);
    let mut rx = handle.subscribe();
    drop(handle);

    tokio::time::timeout(StdDuration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await
    .expect("watcher kept running after its handle was dropped");
}
