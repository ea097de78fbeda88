
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::{sync::Mutex, task::JoinHandle};

use super::{
    clock::Clock,
    dispatch::NotificationFanout,
    model::{Host, HostIdentity, HostMetrics, Status, Thresholds},
    normalizer::{collect_host_metrics, cpu_history},
    source::{MetricSource, RangePoint, SourceError},
    transition::{StatusEvent, StatusHistory},
};

pub const MAX_ROWS: u16 = 8;

/// What the operator is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    pub status_filter: Option<Status>,
    pub group_filter: Option<String>,
    pub rows: u16,
}

impl ViewSettings {
    pub fn with_rows(rows: u16) -> Self {
        Self {
            status_filter: None,
            group_filter: None,
            rows: rows.clamp(1, MAX_ROWS),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub critical: usize,
    pub warning: usize,
    pub healthy: usize,
    pub offline: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub id: String,
    pub query_target: String,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown host {0}")]
    UnknownHost(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Session state: the fleet, its thresholds, status history and view settings.
#[derive(Debug)]
pub struct FleetState {
    hosts: Vec<Host>,
    thresholds: Thresholds,
    history: StatusHistory,
    view: ViewSettings,
}

impl FleetState {
    pub fn new(identities: Vec<HostIdentity>, thresholds: Thresholds, view: ViewSettings) -> Self {
        Self {
            hosts: identities.into_iter().map(Host::new).collect(),
            thresholds,
            history: StatusHistory::new(),
            view,
        }
    }

    /// Swaps in a freshly loaded inventory. Hosts start over as offline until the
    /// next cycle; history survives for ids that are still present.
    pub fn replace_inventory(&mut self, identities: Vec<HostIdentity>, thresholds: Thresholds) {
        self.hosts = identities.into_iter().map(Host::new).collect();
        self.thresholds = thresholds;
        self.history
            .retain_hosts(self.hosts.iter().map(|host| host.id()));
    }

    pub fn targets(&self) -> Vec<HostTarget> {
        self.hosts
            .iter()
            .map(|host| HostTarget {
                id: host.id().to_string(),
                query_target: host.query_target().to_string(),
            })
            .collect()
    }

    /// Stores each observation, reclassifies, and returns the events to announce.
    /// Observations for ids no longer in the inventory are dropped.
    pub fn apply_observations(&mut self, observations: Vec<(String, HostMetrics)>) -> Vec<StatusEvent> {
        let mut events = Vec::new();

        for (id, metrics) in observations {
            let Some(host) = self.hosts.iter_mut().find(|host| host.id() == id) else {
                log::debug!("observation_dropped host={} reason=not_in_inventory", id);
                continue;
            };

            let status = host.observe(metrics, &self.thresholds);
            if let Some(event) = self.history.observe(host.id(), host.display_name(), status) {
                events.push(event);
            }
        }

        events
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn host(&self, id: &str) -> Option<&Host> {
        self.hosts.iter().find(|host| host.id() == id)
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    #[cfg(test)]
    pub fn history(&self) -> &StatusHistory {
        &self.history
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn set_status_filter(&mut self, filter: Option<Status>) {
        self.view.status_filter = filter;
    }

    pub fn set_group_filter(&mut self, filter: Option<String>) {
        self.view.group_filter = filter.filter(|group| !group.trim().is_empty());
    }

    /// Returns the row count actually applied.
    pub fn set_rows(&mut self, rows: u16) -> u16 {
        self.view.rows = rows.clamp(1, MAX_ROWS);
        self.view.rows
    }

    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self
            .hosts
            .iter()
            .map(|host| host.group_label().to_string())
            .filter(|group| !group.is_empty())
            .collect();
        groups.sort();
        groups.dedup();
        groups
    }

    pub fn stats(&self) -> StatusCounts {
        let mut counts = StatusCounts {
            total: self.hosts.len(),
            ..StatusCounts::default()
        };
        for host in &self.hosts {
            match host.status() {
                Status::Critical => counts.critical += 1,
                Status::Warning => counts.warning += 1,
                Status::Healthy => counts.healthy += 1,
                Status::Offline => counts.offline += 1,
            }
        }
        counts
    }
}

/// Fetches every target concurrently.
pub async fn collect_fleet<S, C>(source: &S, clock: &C, targets: &[HostTarget]) -> Vec<(String, HostMetrics)>
where
    S: MetricSource,
    C: Clock,
{
    join_all(targets.iter().map(|target| async move {
        let metrics = collect_host_metrics(source, clock, &target.query_target).await;
        (target.id.clone(), metrics)
    }))
    .await
}

#[derive(Debug)]
pub struct CycleOutcome {
    pub events: Vec<StatusEvent>,
    pub stats: StatusCounts,
    /// Detached announcement of `events`; `None` when there was nothing to announce.
    pub delivery: Option<JoinHandle<()>>,
}

/// Polling engine with its collaborators injected.
pub struct FleetEngine<S, C, N> {
    source: Arc<S>,
    clock: Arc<C>,
    fanout: Arc<N>,
    state: Arc<Mutex<FleetState>>,
}

impl<S, C, N> Clone for FleetEngine<S, C, N> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            clock: Arc::clone(&self.clock),
            fanout: Arc::clone(&self.fanout),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S, C, N> FleetEngine<S, C, N>
where
    S: MetricSource,
    C: Clock,
    N: NotificationFanout,
{
    pub fn new(source: Arc<S>, clock: Arc<C>, fanout: Arc<N>, state: FleetState) -> Self {
        Self {
            source,
            clock,
            fanout,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> &Arc<Mutex<FleetState>> {
        &self.state
    }

    /// One polling cycle: fetch, classify, record history, announce.
    ///
    /// History is written back before this returns; announcements run on a
    /// detached task so the next cycle never waits for a slow sink.
    pub async fn poll_cycle(&self) -> CycleOutcome {
        let targets = self.state.lock().await.targets();
        let observations = collect_fleet(self.source.as_ref(), self.clock.as_ref(), &targets).await;

        let (events, stats) = {
            let mut state = self.state.lock().await;
            let events = state.apply_observations(observations);
            (events, state.stats())
        };

        let delivery = if events.is_empty() {
            None
        } else {
            let fanout = Arc::clone(&self.fanout);
            let pending = events.clone();
            Some(tokio::spawn(async move {
                for event in &pending {
                    fanout.fan_out(event).await;
                }
            }))
        };

        CycleOutcome {
            events,
            stats,
            delivery,
        }
    }

    pub async fn host_cpu_history(
        &self,
        host_id: &str,
        window_secs: u64,
        step_secs: u64,
    ) -> Result<Vec<RangePoint>, EngineError> {
        let target = {
            let state = self.state.lock().await;
            state
                .host(host_id)
                .map(|host| host.query_target().to_string())
                .ok_or_else(|| EngineError::UnknownHost(host_id.to_string()))?
        };

        Ok(cpu_history(self.source.as_ref(), self.clock.as_ref(), &target, window_secs, step_secs).await?)
    }
}
