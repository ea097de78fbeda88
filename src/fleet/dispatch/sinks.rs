use std::{
    collections::VecDeque,
    io::Write,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;

use super::{AlertSink, SinkError};
use crate::fleet::{
    clock::Clock,
    model::Status,
    transition::{StatusEvent, TransitionKind},
};

const BELL: &[u8] = b"\x07";

pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Terminal bell: two beeps for an alert, one for a recovery.
#[derive(Clone)]
pub struct AudibleCue {
    writer: SharedWriter,
    enabled: bool,
    beep_gap: Duration,
}

impl AudibleCue {
    pub fn new(writer: SharedWriter, enabled: bool, beep_gap: Duration) -> Self {
        Self {
            writer,
            enabled,
            beep_gap,
        }
    }

    pub fn stderr(enabled: bool) -> Self {
        Self::new(
            Arc::new(Mutex::new(Box::new(std::io::stderr()))),
            enabled,
            Duration::from_millis(250),
        )
    }

    fn ring(&self) -> Result<(), SinkError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Unavailable("audible writer lock poisoned".to_string()))?;
        writer.write_all(BELL)?;
        writer.flush()?;
        Ok(())
    }
}

impl AlertSink for AudibleCue {
    fn name(&self) -> &'static str {
        "audible"
    }

    fn is_active(&self) -> bool {
        self.enabled
    }

    async fn deliver(&self, event: &StatusEvent) -> Result<(), SinkError> {
        self.ring()?;
        if event.kind == TransitionKind::Alert {
            tokio::time::sleep(self.beep_gap).await;
            self.ring()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub host_id: String,
    pub host_name: String,
    pub status: Status,
    pub label: &'static str,
    pub raised_at: DateTime<Utc>,
}

impl Toast {
    pub fn from_event(event: &StatusEvent, raised_at: DateTime<Utc>) -> Self {
        let label = match (event.kind, event.status) {
            (TransitionKind::Recovery, _) => "Recovered",
            (TransitionKind::Alert, Status::Critical) => "Critical",
            (TransitionKind::Alert, Status::Warning) => "Warning",
            (TransitionKind::Alert, Status::Offline) => "Offline",
            (TransitionKind::Alert, Status::Healthy) => "Healthy",
        };

        Self {
            host_id: event.host_id.clone(),
            host_name: event.host_name.clone(),
            status: event.status,
            label,
            raised_at,
        }
    }
}

/// Bounded list of on-screen notifications, each visible for `lifetime`.
#[derive(Clone)]
pub struct ToastBoard {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
    lifetime: ChronoDuration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ToastBoard {
    pub fn new(lifetime: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(VecDeque::new())),
            lifetime: ChronoDuration::from_std(lifetime).unwrap_or(ChronoDuration::seconds(5)),
            capacity: capacity.max(1),
            clock,
        }
    }

    pub fn push(&self, toast: Toast) {
        let Ok(mut toasts) = self.toasts.lock() else {
            log::warn!("toast_board_unavailable reason=lock_poisoned");
            return;
        };
        toasts.push_back(toast);
        while toasts.len() > self.capacity {
            toasts.pop_front();
        }
    }

    /// Toasts still visible at `now`, oldest first. Expired ones are dropped.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let Ok(mut toasts) = self.toasts.lock() else {
            return Vec::new();
        };
        toasts.retain(|toast| toast.raised_at + self.lifetime > now);
        toasts.iter().cloned().collect()
    }
}

impl AlertSink for ToastBoard {
    fn name(&self) -> &'static str {
        "visual"
    }

    async fn deliver(&self, event: &StatusEvent) -> Result<(), SinkError> {
        self.push(Toast::from_event(event, self.clock.now()));
        Ok(())
    }
}
