use std::{
    io::Write,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::Duration as ChronoDuration;

use super::{
    AlertDispatcher, AlertSink, AudibleCue, DeliveryOutcome, NotificationFanout, RemoteAlertSink,
    SinkError, ToastBoard,
    remote::{AlertPayload, alert_text},
};
use crate::{
    alert_flag::AlertFlag,
    fleet::{
        clock::{Clock, FixedClock},
        model::Status,
        transition::{StatusEvent, TransitionKind},
    },
};

#[derive(Clone, Default)]
struct RecordingSink {
    fail: bool,
    delivered: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn hosts(&self) -> Vec<String> {
        self.delivered.lock().expect("lock").clone()
    }
}

impl AlertSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, event: &StatusEvent) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Unavailable("unreachable".to_string()));
        }
        self.delivered
            .lock()
            .expect("lock")
            .push(event.host_id.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn event(status: Status, kind: TransitionKind) -> StatusEvent {
    StatusEvent {
        host_id: "db-1".to_string(),
        host_name: "Database".to_string(),
        status,
        previous: None,
        kind,
    }
}

#[tokio::test]
async fn remote_failure_does_not_block_local_cues() {
    let audible = RecordingSink::default();
    let visual = RecordingSink::default();
    let dispatcher = AlertDispatcher::new(
        audible.clone(),
        visual.clone(),
        RecordingSink::failing(),
        AlertFlag::fixed(true),
    );

    let report = dispatcher
        .fan_out(&event(Status::Critical, TransitionKind::Alert))
        .await;

    assert_eq!(report.audible, DeliveryOutcome::Delivered);
    assert_eq!(report.visual, DeliveryOutcome::Delivered);
    assert_eq!(report.remote, DeliveryOutcome::Failed);
    assert_eq!(audible.hosts(), vec!["db-1".to_string()]);
    assert_eq!(visual.hosts(), vec!["db-1".to_string()]);
}

#[tokio::test]
async fn disabled_flag_skips_only_remote() {
    let remote = RecordingSink::default();
    let dispatcher = AlertDispatcher::new(
        RecordingSink::default(),
        RecordingSink::default(),
        remote.clone(),
        AlertFlag::fixed(false),
    );

    let report = dispatcher
        .fan_out(&event(Status::Offline, TransitionKind::Alert))
        .await;

    assert_eq!(report.audible, DeliveryOutcome::Delivered);
    assert_eq!(report.visual, DeliveryOutcome::Delivered);
    assert_eq!(report.remote, DeliveryOutcome::Skipped);
    assert!(remote.hosts().is_empty());
}

#[tokio::test]
async fn disabled_remote_sink_is_skipped() {
    let dispatcher = AlertDispatcher::new(
        RecordingSink::default(),
        RecordingSink::default(),
        RemoteAlertSink::Disabled,
        AlertFlag::fixed(true),
    );

    let report = dispatcher
        .fan_out(&event(Status::Warning, TransitionKind::Alert))
        .await;

    assert_eq!(report.remote, DeliveryOutcome::Skipped);
}

#[tokio::test]
async fn audible_cue_beeps_twice_for_alerts_once_for_recovery() {
    let buffer = SharedBuffer::default();
    let cue = AudibleCue::new(
        Arc::new(Mutex::new(Box::new(buffer.clone()))),
        true,
        Duration::ZERO,
    );

    cue.deliver(&event(Status::Critical, TransitionKind::Alert))
        .await
        .expect("alert cue");
    assert_eq!(buffer.0.lock().expect("lock").as_slice(), b"\x07\x07");

    cue.deliver(&event(Status::Healthy, TransitionKind::Recovery))
        .await
        .expect("recovery cue");
    assert_eq!(buffer.0.lock().expect("lock").len(), 3);
}

#[tokio::test]
async fn toasts_expire_after_lifetime() {
    let clock = FixedClock::at_unix(1_000);
    let board = ToastBoard::new(Duration::from_secs(5), 10, Arc::new(clock));

    board
        .deliver(&event(Status::Critical, TransitionKind::Alert))
        .await
        .expect("toast");

    let now = clock.now();
    let visible = board.active(now + ChronoDuration::seconds(4));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].label, "Critical");

    assert!(board.active(now + ChronoDuration::seconds(5)).is_empty());
}

#[tokio::test]
async fn toast_board_keeps_newest_within_capacity() {
    let clock = FixedClock::at_unix(1_000);
    let board = ToastBoard::new(Duration::from_secs(5), 2, Arc::new(clock));

    for host in ["a", "b", "c"] {
        let mut event = event(Status::Healthy, TransitionKind::Recovery);
        event.host_id = host.to_string();
        board.deliver(&event).await.expect("toast");
    }

    let visible = board.active(clock.now());
    let hosts: Vec<&str> = visible.iter().map(|toast| toast.host_id.as_str()).collect();
    assert_eq!(hosts, vec!["b", "c"]);
    assert!(visible.iter().all(|toast| toast.label == "Recovered"));
}

#[test]
fn webhook_payload_uses_camel_case() {
    let event = event(Status::Offline, TransitionKind::Alert);
    let json = serde_json::to_string(&AlertPayload::from(&event)).expect("json");
    assert_eq!(
        json,
        r#"{"hostId":"db-1","hostName":"Database","status":"offline"}"#
    );
}

#[test]
fn alert_text_names_host_and_status() {
    let text = alert_text(&event(Status::Critical, TransitionKind::Alert));
    assert!(text.contains("Database (db-1) is critical"));

    let text = alert_text(&event(Status::Healthy, TransitionKind::Recovery));
    assert!(text.starts_with("✅ RECOVERED"));
}
