//! # Refresh Scheduler
//!
//! Drives the probe → fetch → render cycle that keeps the dashboard current.
//!
//! One cycle walks a fixed sequence of phases:
//!
//! 1. **Probing**: one connectivity probe. A failed probe never aborts the
//!    cycle; it only selects the offline sub-path below.
//! 2. **Fetching**: online, one concurrent fetch per resource through the
//!    data source, each bounded by a per-resource timeout that resolves to
//!    fallback. Offline, the fallback provider is called directly for every
//!    resource and no network traffic happens at all.
//! 3. **Rendering**: every settled value is pushed at the sink in declared
//!    resource order. A sink failure is logged and skipped per resource.
//!
//! Cycles are started by a periodic tick or by an external trigger (manual
//! refresh, visibility regained). Both inputs feed the same sequential
//! consumer, so cycles never overlap. The loop keeps ticking while offline;
//! the per-cycle probe is what detects recovery.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::engine::connectivity::{ConnectivityMonitor, ConnectivityState, StatusProbe};
use crate::engine::fallback::FallbackProvider;
use crate::engine::resource::{Provenance, ResourceKind, ResourceValue};

/// Infallible source of resource data.
///
/// Implementations normalize every failure into a fallback-tagged value, so
/// the scheduler can treat each fetch as pure coordination.
pub trait DataSource {
    fn fetch(&self, resource: ResourceKind) -> impl Future<Output = ResourceValue> + Send;
}

/// Presentation-side contract. The engine owns no presentation state and
/// isolates every error raised here.
pub trait RenderSink {
    /// Draws one refreshed value.
    fn render(&mut self, value: &ResourceValue) -> anyhow::Result<()>;

    /// Updates the connectivity indicator after each cycle.
    fn render_connectivity(&mut self, online: bool) -> anyhow::Result<()> {
        let _ = online;
        Ok(())
    }
}

/// What started a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The periodic timer.
    Interval,
    /// An explicit refresh request from the host UI.
    Manual,
    /// The host application regained foreground focus.
    VisibilityRegained,
}

/// Cloneable handle for feeding external triggers into the scheduling loop.
#[derive(Clone)]
pub struct RefreshHandle {
    tx: mpsc::UnboundedSender<RefreshTrigger>,
}

impl RefreshHandle {
    /// Requests an out-of-band cycle as soon as the loop is idle.
    pub fn refresh_now(&self) {
        let _ = self.tx.send(RefreshTrigger::Manual);
    }

    /// Signals that the host regained focus.
    pub fn visibility_regained(&self) {
        let _ = self.tx.send(RefreshTrigger::VisibilityRegained);
    }
}

/// Summary of one completed cycle, in render order.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub trigger: RefreshTrigger,
    pub online: bool,
    pub outcomes: Vec<(ResourceKind, Provenance)>,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
}

impl CycleReport {
    pub fn live_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, p)| *p == Provenance::Live)
            .count()
    }

    pub fn fallback_count(&self) -> usize {
        self.outcomes.len() - self.live_count()
    }
}

/// The cyclic state machine coordinating monitor, source, fallback and sink.
pub struct RefreshScheduler<S, R, P> {
    source: S,
    sink: R,
    monitor: ConnectivityMonitor<P>,
    fallback: FallbackProvider,
    state: ConnectivityState,
    update_interval: Duration,
    fetch_timeout: Duration,
    trigger_tx: mpsc::UnboundedSender<RefreshTrigger>,
    trigger_rx: mpsc::UnboundedReceiver<RefreshTrigger>,
}

impl<S, R, P> RefreshScheduler<S, R, P>
where
    S: DataSource,
    R: RenderSink,
    P: StatusProbe,
{
    pub fn new(
        source: S,
        sink: R,
        monitor: ConnectivityMonitor<P>,
        update_interval: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        Self {
            source,
            sink,
            monitor,
            fallback: FallbackProvider,
            state: ConnectivityState::new(),
            update_interval,
            fetch_timeout,
            trigger_tx,
            trigger_rx,
        }
    }

    /// Handle for manual-refresh and visibility triggers.
    pub fn handle(&self) -> RefreshHandle {
        RefreshHandle {
            tx: self.trigger_tx.clone(),
        }
    }

    pub fn state(&self) -> &ConnectivityState {
        &self.state
    }

    /// Runs cycles until the shutdown signal arrives.
    ///
    /// The first tick fires immediately, which doubles as the initial full
    /// load. In-flight work at shutdown is simply dropped; every cycle is
    /// self-contained and idempotent, so nothing needs to be awaited out.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = interval(self.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let trigger = tokio::select! {
                _ = shutdown.recv() => {
                    info!("refresh scheduler received shutdown signal");
                    break;
                }
                _ = ticker.tick() => RefreshTrigger::Interval,
                Some(t) = self.trigger_rx.recv() => t,
            };

            if !self.accepts(trigger) {
                debug!(?trigger, "trigger ignored while offline");
                continue;
            }
            self.run_cycle(trigger).await;
        }
    }

    /// A visibility-regained event only refreshes if the engine was online
    /// when it arrived; the periodic tick covers recovery otherwise.
    fn accepts(&self, trigger: RefreshTrigger) -> bool {
        match trigger {
            RefreshTrigger::VisibilityRegained => self.state.is_online,
            _ => true,
        }
    }

    /// Executes exactly one probe → fetch → render pass.
    pub async fn run_cycle(&mut self, trigger: RefreshTrigger) -> CycleReport {
        let started_at = Utc::now();
        let begun = std::time::Instant::now();

        debug!(?trigger, "refresh cycle starting, probing backend");
        let online = self.monitor.probe(&mut self.state).await;

        let values = if online {
            self.fetch_all().await
        } else {
            // Skip the network entirely to avoid cascading timeouts.
            debug!("backend offline, substituting fallback for every resource");
            ResourceKind::ALL
                .iter()
                .map(|r| self.fallback.value(*r))
                .collect()
        };

        let mut outcomes = Vec::with_capacity(values.len());
        for value in &values {
            if let Err(error) = self.sink.render(value) {
                warn!(resource = %value.resource, %error, "render sink failed, resource skipped");
            }
            outcomes.push((value.resource, value.provenance));
        }
        if let Err(error) = self.sink.render_connectivity(online) {
            warn!(%error, "connectivity indicator update failed");
        }

        let report = CycleReport {
            trigger,
            online,
            outcomes,
            started_at,
            duration: begun.elapsed(),
        };
        info!(
            online,
            live = report.live_count(),
            fallback = report.fallback_count(),
            elapsed = ?report.duration,
            "refresh cycle complete"
        );
        report
    }

    /// Fan-out/fan-in: one fetch per resource, all concurrent, all settled
    /// before returning. `join_all` keeps the input order, which is the
    /// render order.
    async fn fetch_all(&self) -> Vec<ResourceValue> {
        let fetches = ResourceKind::ALL.iter().map(|r| {
            let resource = *r;
            async move {
                match timeout(self.fetch_timeout, self.source.fetch(resource)).await {
                    Ok(value) => value,
                    Err(_) => {
                        warn!(
                            resource = %resource,
                            after = ?self.fetch_timeout,
                            "fetch timed out, substituting fallback"
                        );
                        self.fallback.value(resource)
                    }
                }
            }
        });
        join_all(fetches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use serde_json::json;

    /// Data source that serves live payloads except for scripted failures,
    /// mirroring the adapter's degrade-to-fallback behavior.
    struct FakeSource {
        failing: HashSet<ResourceKind>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(failing: impl IntoIterator<Item = ResourceKind>) -> Self {
            Self {
                failing: failing.into_iter().collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DataSource for FakeSource {
        async fn fetch(&self, resource: ResourceKind) -> ResourceValue {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&resource) {
                FallbackProvider.value(resource)
            } else {
                ResourceValue::live(resource, json!({ "resource": resource.key() }))
            }
        }
    }

    /// Source whose fetches never complete on their own.
    struct StuckSource;

    impl DataSource for StuckSource {
        async fn fetch(&self, resource: ResourceKind) -> ResourceValue {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            ResourceValue::live(resource, json!(null))
        }
    }

    #[derive(Default)]
    struct CaptureSink {
        rendered: Vec<ResourceValue>,
        connectivity: Vec<bool>,
        fail_on: Option<ResourceKind>,
    }

    impl RenderSink for CaptureSink {
        fn render(&mut self, value: &ResourceValue) -> anyhow::Result<()> {
            if self.fail_on == Some(value.resource) {
                anyhow::bail!("no render target for {}", value.resource);
            }
            self.rendered.push(value.clone());
            Ok(())
        }

        fn render_connectivity(&mut self, online: bool) -> anyhow::Result<()> {
            self.connectivity.push(online);
            Ok(())
        }
    }

    /// Probe that replays a scripted sequence, then keeps succeeding.
    struct ScriptedProbe {
        outcomes: Mutex<Vec<bool>>,
    }

    impl ScriptedProbe {
        fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
            let mut outcomes: Vec<bool> = outcomes.into_iter().collect();
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
            }
        }
    }

    impl StatusProbe for ScriptedProbe {
        async fn check(&self) -> bool {
            self.outcomes.lock().unwrap().pop().unwrap_or(true)
        }
    }

    fn scheduler(
        source: FakeSource,
        probe: ScriptedProbe,
    ) -> RefreshScheduler<FakeSource, CaptureSink, ScriptedProbe> {
        RefreshScheduler::new(
            source,
            CaptureSink::default(),
            ConnectivityMonitor::new(probe, 3),
            Duration::from_secs(30),
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn partial_failure_does_not_abort_the_cycle() {
        let mut s = scheduler(
            FakeSource::new([ResourceKind::Charts]),
            ScriptedProbe::new([true]),
        );
        let report = s.run_cycle(RefreshTrigger::Interval).await;

        assert!(report.online);
        assert_eq!(report.live_count(), 4);
        assert_eq!(report.fallback_count(), 1);
        for (resource, provenance) in &report.outcomes {
            let expected = if *resource == ResourceKind::Charts {
                Provenance::Fallback
            } else {
                Provenance::Live
            };
            assert_eq!(*provenance, expected);
        }
    }

    #[tokio::test]
    async fn render_order_is_stable() {
        let mut s = scheduler(FakeSource::new([]), ScriptedProbe::new([true]));
        s.run_cycle(RefreshTrigger::Interval).await;

        let order: Vec<ResourceKind> = s.sink.rendered.iter().map(|v| v.resource).collect();
        assert_eq!(order, ResourceKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn offline_cycle_skips_the_source_entirely() {
        let mut s = scheduler(
            FakeSource::new([]),
            ScriptedProbe::new([false, false, false]),
        );

        // Two failed probes: still online, still fetching live.
        s.run_cycle(RefreshTrigger::Interval).await;
        s.run_cycle(RefreshTrigger::Interval).await;
        assert_eq!(s.source.call_count(), 10);

        // Third failure crosses the ceiling: offline, no fetches issued.
        let report = s.run_cycle(RefreshTrigger::Interval).await;
        assert!(!report.online);
        assert_eq!(report.fallback_count(), 5);
        assert_eq!(s.source.call_count(), 10);
        assert_eq!(s.sink.connectivity.last(), Some(&false));
    }

    #[tokio::test]
    async fn recovery_resumes_live_fetches() {
        let mut s = scheduler(
            FakeSource::new([]),
            ScriptedProbe::new([false, false, false, true]),
        );
        for _ in 0..3 {
            s.run_cycle(RefreshTrigger::Interval).await;
        }
        assert!(!s.state.is_online);

        let report = s.run_cycle(RefreshTrigger::Interval).await;
        assert!(report.online);
        assert_eq!(s.state.consecutive_failures, 0);
        assert_eq!(report.live_count(), 5);
        assert_eq!(s.sink.connectivity.last(), Some(&true));
    }

    #[tokio::test]
    async fn render_failure_is_isolated_per_resource() {
        let mut s = scheduler(FakeSource::new([]), ScriptedProbe::new([true]));
        s.sink.fail_on = Some(ResourceKind::Kpis);

        let report = s.run_cycle(RefreshTrigger::Manual).await;

        // The cycle completed and every other resource still rendered.
        assert_eq!(report.outcomes.len(), 5);
        let rendered: Vec<ResourceKind> = s.sink.rendered.iter().map(|v| v.resource).collect();
        assert!(!rendered.contains(&ResourceKind::Kpis));
        assert_eq!(rendered.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_fetch_resolves_to_fallback() {
        let mut s = RefreshScheduler::new(
            StuckSource,
            CaptureSink::default(),
            ConnectivityMonitor::new(ScriptedProbe::new([true]), 3),
            Duration::from_secs(30),
            Duration::from_secs(10),
        );
        let report = s.run_cycle(RefreshTrigger::Interval).await;

        assert_eq!(report.fallback_count(), 5);
        assert!(report.online);
    }

    #[tokio::test]
    async fn visibility_trigger_is_ignored_while_offline() {
        let mut s = scheduler(
            FakeSource::new([]),
            ScriptedProbe::new([false, false, false]),
        );
        for _ in 0..3 {
            s.run_cycle(RefreshTrigger::Interval).await;
        }
        assert!(!s.accepts(RefreshTrigger::VisibilityRegained));
        assert!(s.accepts(RefreshTrigger::Manual));
        assert!(s.accepts(RefreshTrigger::Interval));
    }

    #[tokio::test]
    async fn handle_feeds_the_running_loop() {
        let s = scheduler(FakeSource::new([]), ScriptedProbe::new([true, true]));
        let handle = s.handle();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(s.run(shutdown_rx));
        handle.refresh_now();
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();
        task.await.unwrap();
    }
}
