// Dashboard controller - Poll loop and snapshot fan-out
use crate::application::parking_backend::{FetchError, ParkingBackend};
use crate::application::surfaces::Surfaces;
use crate::domain::snapshot::StatsSnapshot;
use crate::domain::time_series::{TimeSeriesBuffer, TimeSeriesPoint};
use crate::infrastructure::config::PollSettings;
use crate::presentation::chart_renderer::ChartRenderer;
use crate::presentation::slot_log_renderer::SlotLogRenderer;
use crate::presentation::tiles::render_tiles;
use futures::StreamExt;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollState {
    Idle,
    Polling,
}

/// What happened to a completed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    /// A newer poll had already been rendered.
    Stale,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    pub state: PollState,
    pub last_issued_seq: u64,
    pub last_applied_seq: u64,
    pub samples: usize,
}

struct RenderState {
    buffer: TimeSeriesBuffer,
    snapshot: Option<StatsSnapshot>,
    last_applied_seq: u64,
}

pub struct DashboardController {
    backend: Arc<dyn ParkingBackend>,
    surfaces: Surfaces,
    chart: ChartRenderer,
    slot_log: SlotLogRenderer,
    render: Mutex<RenderState>,
    permits: Arc<Semaphore>,
    max_in_flight: usize,
    next_seq: AtomicU64,
    interval: Duration,
    timeout: Duration,
}

impl DashboardController {
    pub fn new(backend: Arc<dyn ParkingBackend>, surfaces: Surfaces, settings: &PollSettings) -> Self {
        let max_in_flight = settings.max_in_flight.max(1);
        Self {
            backend,
            chart: ChartRenderer::new(surfaces.chart.clone()),
            slot_log: SlotLogRenderer::new(surfaces.slot_log.clone()),
            surfaces,
            render: Mutex::new(RenderState {
                buffer: TimeSeriesBuffer::new(),
                snapshot: None,
                last_applied_seq: 0,
            }),
            permits: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            next_seq: AtomicU64::new(1),
            interval: settings.interval(),
            timeout: settings.timeout(),
        }
    }

    /// Whether the page has anything for the poll loop to update.
    pub fn can_poll(&self) -> bool {
        self.surfaces.has_poll_targets()
    }

    pub fn state(&self) -> PollState {
        if self.permits.available_permits() < self.max_in_flight {
            PollState::Polling
        } else {
            PollState::Idle
        }
    }

    pub fn status(&self) -> ControllerStatus {
        let render = self.lock_render();
        ControllerStatus {
            state: self.state(),
            last_issued_seq: self.next_seq.load(Ordering::Relaxed) - 1,
            last_applied_seq: render.last_applied_seq,
            samples: render.buffer.len(),
        }
    }

    pub fn snapshot(&self) -> Option<StatsSnapshot> {
        self.lock_render().snapshot.clone()
    }

    /// Tick forever. Returns immediately when the page has no poll targets.
    pub async fn run(self: Arc<Self>) {
        if !self.can_poll() {
            tracing::info!("No dashboard surfaces on this page, poll loop not started");
            return;
        }

        tracing::info!(
            "Polling stats every {:?} (timeout {:?}, max in flight {})",
            self.interval,
            self.timeout,
            self.max_in_flight
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(interval);

        while ticks.next().await.is_some() {
            self.on_tick();
        }
    }

    /// Start a poll unless too many are already outstanding.
    pub fn on_tick(self: &Arc<Self>) -> Option<JoinHandle<Result<PollOutcome, FetchError>>> {
        let Ok(permit) = self.permits.clone().try_acquire_owned() else {
            tracing::debug!("Previous stats poll still outstanding, skipping tick");
            return None;
        };

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let controller = Arc::clone(self);
        Some(tokio::spawn(async move {
            let result = controller.poll_once(seq).await;
            drop(permit);
            result
        }))
    }

    /// Fetch one snapshot and render it if it is still the newest.
    pub async fn poll_once(&self, seq: u64) -> Result<PollOutcome, FetchError> {
        let fetched = match tokio::time::timeout(self.timeout, self.backend.fetch_stats()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::TimedOut(self.timeout)),
        };

        match fetched {
            Ok(snapshot) => {
                let label = chrono::Local::now().format("%H:%M:%S").to_string();
                Ok(self.apply(seq, snapshot, label))
            }
            Err(e) => {
                tracing::warn!("Error fetching stats (poll {}): {}", seq, e);
                Err(e)
            }
        }
    }

    /// Fan a snapshot out to every present surface.
    pub fn apply(&self, seq: u64, snapshot: StatsSnapshot, label: String) -> PollOutcome {
        let mut render = self.lock_render();
        if seq <= render.last_applied_seq {
            tracing::debug!(
                "Discarding stale stats poll {} (already showing {})",
                seq,
                render.last_applied_seq
            );
            return PollOutcome::Stale;
        }
        render.last_applied_seq = seq;

        render_tiles(&self.surfaces, &snapshot);
        self.reconcile_source(&snapshot.source);

        render
            .buffer
            .append(TimeSeriesPoint::new(label, snapshot.occupied, snapshot.vacant));
        self.chart.render(&render.buffer.to_series());

        self.slot_log.render(&snapshot.slots, &snapshot.durations);
        render.snapshot = Some(snapshot);

        PollOutcome::Applied
    }

    // Only write when the value changed so an operator mid-edit is not fought.
    fn reconcile_source(&self, source: &str) {
        let Some(selector) = &self.surfaces.source_selector else {
            return;
        };
        if source.is_empty() {
            return;
        }
        if selector.value() != source {
            tracing::debug!("Source selector reconciled to {}", source);
            selector.set_value(source);
        }
    }

    fn lock_render(&self) -> std::sync::MutexGuard<'_, RenderState> {
        self.render.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::surfaces::SelectorSurface;
    use crate::infrastructure::config::SurfaceSettings;
    use crate::presentation::page::Page;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    /// Replays queued results; an empty queue hangs forever.
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<StatsSnapshot, FetchError>>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<StatsSnapshot, FetchError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
            })
        }
    }

    #[async_trait]
    impl ParkingBackend for ScriptedBackend {
        async fn fetch_stats(&self) -> Result<StatsSnapshot, FetchError> {
            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(reply) => reply,
                None => futures::future::pending().await,
            }
        }

        async fn switch_source(&self, source: &str) -> Result<String, crate::application::parking_backend::CommandError> {
            Ok(source.to_string())
        }

        async fn save_settings(
            &self,
            _payload: &crate::domain::settings::SettingsPayload,
        ) -> Result<String, crate::application::parking_backend::CommandError> {
            Ok("success".to_string())
        }
    }

    #[derive(Default)]
    struct CountingSelector {
        value: Mutex<String>,
        writes: Mutex<u32>,
    }

    impl SelectorSurface for CountingSelector {
        fn value(&self) -> String {
            self.value.lock().unwrap().clone()
        }

        fn set_value(&self, value: &str) {
            *self.value.lock().unwrap() = value.to_string();
            *self.writes.lock().unwrap() += 1;
        }
    }

    fn snapshot(occupied: u32, source: &str) -> StatsSnapshot {
        StatsSnapshot {
            total: 3,
            occupied,
            vacant: 3 - occupied,
            utilization: f64::from(occupied) / 3.0 * 100.0,
            slots: (0..3).map(|i| i < occupied).collect(),
            durations: vec!["5m".to_string(), "0m".to_string()],
            source: source.to_string(),
        }
    }

    fn settings(timeout_ms: u64, max_in_flight: usize) -> PollSettings {
        PollSettings {
            interval_ms: 1000,
            timeout_ms,
            max_in_flight,
        }
    }

    fn controller_on_page(
        backend: Arc<dyn ParkingBackend>,
        poll: &PollSettings,
    ) -> (Arc<DashboardController>, Page) {
        let page = Page::new("/video_feed");
        let surfaces = page.surfaces(&SurfaceSettings::default());
        (Arc::new(DashboardController::new(backend, surfaces, poll)), page)
    }

    #[test]
    fn test_apply_updates_every_surface() {
        let (controller, page) = controller_on_page(ScriptedBackend::new(vec![]), &settings(1000, 1));

        let outcome = controller.apply(1, snapshot(2, "camA"), "10:00:00".to_string());
        assert_eq!(outcome, PollOutcome::Applied);

        let state = page.state();
        assert_eq!(state.tiles.capacity, "3");
        assert_eq!(state.tiles.occupied, "2");
        assert_eq!(state.tiles.available, "1");
        assert_eq!(state.tiles.utilization, "66.7%");
        assert_eq!(state.source_selector, "camA");
        assert_eq!(state.chart.series.labels, vec!["10:00:00"]);
        assert_eq!(state.chart.series.occupied, vec![2]);
        assert_eq!(state.chart.series.vacant, vec![1]);
        assert_eq!(state.slot_log.len(), 3);
        assert_eq!(state.slot_log[2].label, "Slot #03");
        assert_eq!(state.slot_log[2].duration, "0m");
        assert_eq!(controller.snapshot(), Some(snapshot(2, "camA")));
    }

    #[test]
    fn test_same_snapshot_twice_renders_identically() {
        let (controller, page) = controller_on_page(ScriptedBackend::new(vec![]), &settings(1000, 1));

        controller.apply(1, snapshot(1, "camA"), "10:00:00".to_string());
        let first = page.state();
        controller.apply(2, snapshot(1, "camA"), "10:00:01".to_string());
        let second = page.state();

        assert_eq!(first.tiles, second.tiles);
        assert_eq!(first.slot_log, second.slot_log);
        assert_eq!(second.chart.series.occupied, vec![1, 1]);
    }

    #[test]
    fn test_matching_source_is_not_rewritten() {
        let selector = Arc::new(CountingSelector::default());
        *selector.value.lock().unwrap() = "camA".to_string();
        let surfaces = Surfaces {
            source_selector: Some(selector.clone()),
            ..Surfaces::default()
        };
        let controller = DashboardController::new(ScriptedBackend::new(vec![]), surfaces, &settings(1000, 1));

        controller.apply(1, snapshot(1, "camA"), "t1".to_string());
        assert_eq!(*selector.writes.lock().unwrap(), 0);

        controller.apply(2, snapshot(1, "camB"), "t2".to_string());
        assert_eq!(*selector.writes.lock().unwrap(), 1);
        assert_eq!(selector.value(), "camB");

        controller.apply(3, snapshot(1, ""), "t3".to_string());
        assert_eq!(selector.value(), "camB");
    }

    #[test]
    fn test_stale_poll_is_discarded() {
        let (controller, page) = controller_on_page(ScriptedBackend::new(vec![]), &settings(1000, 2));

        assert_eq!(controller.apply(2, snapshot(3, "camA"), "t2".to_string()), PollOutcome::Applied);
        assert_eq!(controller.apply(1, snapshot(0, "camB"), "t1".to_string()), PollOutcome::Stale);

        let state = page.state();
        assert_eq!(state.tiles.occupied, "3");
        assert_eq!(state.source_selector, "camA");
        assert_eq!(state.chart.series.labels, vec!["t2"]);
        assert_eq!(controller.status().last_applied_seq, 2);
    }

    #[test]
    fn test_window_is_capped_across_polls() {
        let (controller, page) = controller_on_page(ScriptedBackend::new(vec![]), &settings(1000, 1));

        for seq in 1..=25 {
            controller.apply(seq, snapshot((seq % 4) as u32, "camA"), format!("t{}", seq));
        }

        let series = page.state().chart.series;
        assert_eq!(series.labels.len(), 20);
        assert_eq!(series.labels.first().map(String::as_str), Some("t6"));
        assert_eq!(series.labels.last().map(String::as_str), Some("t25"));
        assert_eq!(controller.status().samples, 20);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_last_good_display_and_next_tick_fires() {
        let backend = ScriptedBackend::new(vec![
            Ok(snapshot(2, "camA")),
            Err(FetchError::Transport("connection reset".to_string())),
            Ok(snapshot(1, "camA")),
        ]);
        let (controller, page) = controller_on_page(backend, &settings(1000, 1));

        let first = controller.on_tick().unwrap().await.unwrap();
        assert_eq!(first, Ok(PollOutcome::Applied));
        let before = page.state();

        let failed = controller.on_tick().unwrap().await.unwrap();
        assert!(matches!(failed, Err(FetchError::Transport(_))));
        let after = page.state();
        assert_eq!(before.tiles, after.tiles);
        assert_eq!(before.slot_log, after.slot_log);
        assert_eq!(before.chart, after.chart);
        assert_eq!(controller.state(), PollState::Idle);

        let recovered = controller.on_tick().unwrap().await.unwrap();
        assert_eq!(recovered, Ok(PollOutcome::Applied));
        assert_eq!(page.state().tiles.occupied, "1");
    }

    #[tokio::test]
    async fn test_tick_skipped_while_poll_outstanding_then_times_out() {
        let (controller, _page) = controller_on_page(ScriptedBackend::new(vec![]), &settings(50, 1));

        let hung = controller.on_tick().unwrap();
        tokio::task::yield_now().await;
        assert_eq!(controller.state(), PollState::Polling);
        assert!(controller.on_tick().is_none());

        let result = hung.await.unwrap();
        assert_eq!(result, Err(FetchError::TimedOut(Duration::from_millis(50))));
        assert_eq!(controller.state(), PollState::Idle);
        assert!(controller.on_tick().is_some());
    }

    // Lets spawned poll tasks run to completion without moving the paused clock.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_polls_on_its_own_schedule() {
        let backend = ScriptedBackend::new(vec![
            Ok(snapshot(2, "camA")),
            Err(FetchError::Status(500)),
            Ok(snapshot(1, "camB")),
        ]);
        let poll = settings(5000, 1);
        let (controller, page) = controller_on_page(backend, &poll);
        let loop_handle = tokio::spawn(controller.clone().run());

        // First tick fires immediately.
        settle().await;
        let status = controller.status();
        assert_eq!(status.last_issued_seq, 1);
        assert_eq!(status.last_applied_seq, 1);
        assert_eq!(page.state().tiles.occupied, "2");

        // Failed poll leaves the display alone.
        tokio::time::advance(poll.interval()).await;
        settle().await;
        let status = controller.status();
        assert_eq!(status.last_issued_seq, 2);
        assert_eq!(status.last_applied_seq, 1);
        assert_eq!(status.state, PollState::Idle);
        assert_eq!(page.state().tiles.occupied, "2");

        // The tick after the failure still polls.
        tokio::time::advance(poll.interval()).await;
        settle().await;
        let status = controller.status();
        assert_eq!(status.last_issued_seq, 3);
        assert_eq!(status.last_applied_seq, 3);
        assert_eq!(page.state().tiles.occupied, "1");
        assert_eq!(page.state().source_selector, "camB");
        assert_eq!(page.state().chart.series.occupied, vec![2, 1]);

        // Script exhausted: this poll hangs and holds the only permit.
        tokio::time::advance(poll.interval()).await;
        settle().await;
        assert_eq!(controller.status().last_issued_seq, 4);
        assert_eq!(controller.state(), PollState::Polling);

        for _ in 0..2 {
            tokio::time::advance(poll.interval()).await;
            settle().await;
        }
        let status = controller.status();
        assert_eq!(status.last_issued_seq, 4);
        assert_eq!(status.last_applied_seq, 3);
        assert_eq!(page.state().tiles.occupied, "1");

        loop_handle.abort();
    }

    #[tokio::test]
    async fn test_run_returns_without_surfaces() {
        let controller = Arc::new(DashboardController::new(
            ScriptedBackend::new(vec![]),
            Surfaces::default(),
            &settings(1000, 1),
        ));

        assert!(!controller.can_poll());
        controller.run().await;
    }
}
