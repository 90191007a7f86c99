//! Backend reachability tracking, independent of individual resource fetches.
//!
//! The monitor is pure policy over a transport it is handed: one probe per
//! cycle, a consecutive-failure counter, and an offline flip once the counter
//! reaches the configured ceiling. Recovery is immediate: a single successful
//! probe returns the engine to online mode, there is hysteresis only on the
//! way down.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Reachability snapshot. Owned by the scheduler; mutated only by the
/// scheduler and the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityState {
    pub is_online: bool,
    pub consecutive_failures: u32,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl ConnectivityState {
    /// The engine starts optimistic: online until probes prove otherwise.
    pub fn new() -> Self {
        Self {
            is_online: true,
            consecutive_failures: 0,
            last_checked_at: None,
        }
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::new()
    }
}

/// One lightweight request against the backend's status resource.
pub trait StatusProbe {
    fn check(&self) -> impl Future<Output = bool> + Send;
}

/// Applies the offline/online policy to probe outcomes.
pub struct ConnectivityMonitor<P> {
    probe: P,
    max_retries: u32,
}

impl<P: StatusProbe> ConnectivityMonitor<P> {
    pub fn new(probe: P, max_retries: u32) -> Self {
        Self { probe, max_retries }
    }

    /// Issues one probe and folds the outcome into `state`.
    ///
    /// Returns the post-probe `is_online`, which the scheduler uses to pick
    /// the online or offline sub-path for the current cycle.
    pub async fn probe(&self, state: &mut ConnectivityState) -> bool {
        let ok = self.probe.check().await;
        state.last_checked_at = Some(Utc::now());

        if ok {
            if !state.is_online {
                info!("backend reachable again, leaving offline mode");
            }
            state.is_online = true;
            state.consecutive_failures = 0;
        } else {
            state.consecutive_failures += 1;
            if state.consecutive_failures >= self.max_retries {
                if state.is_online {
                    warn!(
                        failures = state.consecutive_failures,
                        "backend unreachable, entering offline mode"
                    );
                }
                state.is_online = false;
            }
        }

        state.is_online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Probe transport that replays a scripted sequence of outcomes.
    struct ScriptedProbe {
        outcomes: Mutex<VecDeque<bool>>,
    }

    impl ScriptedProbe {
        fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
            }
        }
    }

    impl StatusProbe for ScriptedProbe {
        async fn check(&self) -> bool {
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(false)
        }
    }

    #[tokio::test]
    async fn stays_online_below_retry_ceiling() {
        let monitor = ConnectivityMonitor::new(ScriptedProbe::new([false, false]), 3);
        let mut state = ConnectivityState::new();

        assert!(monitor.probe(&mut state).await);
        assert!(monitor.probe(&mut state).await);
        assert_eq!(state.consecutive_failures, 2);
        assert!(state.is_online);
    }

    #[tokio::test]
    async fn flips_offline_at_exactly_max_retries() {
        let monitor = ConnectivityMonitor::new(ScriptedProbe::new([false, false, false]), 3);
        let mut state = ConnectivityState::new();

        monitor.probe(&mut state).await;
        monitor.probe(&mut state).await;
        assert!(state.is_online);

        assert!(!monitor.probe(&mut state).await);
        assert!(!state.is_online);
        assert_eq!(state.consecutive_failures, 3);
    }

    #[tokio::test]
    async fn single_success_recovers_immediately() {
        let monitor =
            ConnectivityMonitor::new(ScriptedProbe::new([false, false, false, true]), 3);
        let mut state = ConnectivityState::new();

        for _ in 0..3 {
            monitor.probe(&mut state).await;
        }
        assert!(!state.is_online);

        assert!(monitor.probe(&mut state).await);
        assert!(state.is_online);
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.last_checked_at.is_some());
    }

    #[tokio::test]
    async fn success_resets_a_partial_failure_streak() {
        let monitor =
            ConnectivityMonitor::new(ScriptedProbe::new([false, false, true, false]), 3);
        let mut state = ConnectivityState::new();

        for _ in 0..4 {
            monitor.probe(&mut state).await;
        }
        // The streak broke at probe three, so one later failure is not enough.
        assert!(state.is_online);
        assert_eq!(state.consecutive_failures, 1);
    }
}
