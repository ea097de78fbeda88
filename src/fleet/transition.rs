use std::collections::HashMap;

use serde::Serialize;

use super::model::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Alert,
    Recovery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub host_id: String,
    pub host_name: String,
    pub status: Status,
    pub previous: Option<Status>,
    pub kind: TransitionKind,
}

/// Decides whether moving from `previous` to `current` must be announced.
///
/// Entering an alerting status fires on first observation too. Recovery only
/// fires when leaving an alerting status for healthy.
pub fn transition_kind(previous: Option<Status>, current: Status) -> Option<TransitionKind> {
    if previous == Some(current) {
        return None;
    }

    if current.is_alerting() {
        return Some(TransitionKind::Alert);
    }

    match previous {
        Some(previous) if current == Status::Healthy && previous.is_alerting() => {
            Some(TransitionKind::Recovery)
        }
        _ => None,
    }
}

/// Last observed status per host id, kept for the whole session.
#[derive(Debug, Default)]
pub struct StatusHistory {
    last: HashMap<String, Status>,
}

impl StatusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn previous(&self, host_id: &str) -> Option<Status> {
        self.last.get(host_id).copied()
    }

    /// Records `current` unconditionally and returns the event it triggers, if any.
    pub fn observe(&mut self, host_id: &str, host_name: &str, current: Status) -> Option<StatusEvent> {
        let previous = self.last.insert(host_id.to_string(), current);

        if previous != Some(current) {
            log::info!(
                "status_changed host={} from={} to={}",
                host_id,
                previous.map_or("none", Status::as_str),
                current
            );
        }

        transition_kind(previous, current).map(|kind| StatusEvent {
            host_id: host_id.to_string(),
            host_name: host_name.to_string(),
            status: current,
            previous,
            kind,
        })
    }

    /// Forgets hosts that left the inventory.
    pub fn retain_hosts<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = ids.into_iter().collect();
        self.last.retain(|id, _| keep.contains(id.as_str()));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.last.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
