mod remote;
mod sinks;

#[cfg(test)]
mod tests;

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::alert_flag::AlertFlag;

use super::transition::StatusEvent;

pub use remote::{RemoteAlertSink, TelegramSink, WebhookSink};
pub use sinks::{AudibleCue, Toast, ToastBoard};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("alert request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("alert endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("telegram delivery failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
    #[error("failed to write cue: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// One destination for status events.
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inactive sinks are skipped without being called.
    fn is_active(&self) -> bool {
        true
    }

    fn deliver(&self, event: &StatusEvent) -> impl Future<Output = Result<(), SinkError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanoutReport {
    pub audible: DeliveryOutcome,
    pub visual: DeliveryOutcome,
    pub remote: DeliveryOutcome,
}

/// Announces a status event everywhere it has to go.
pub trait NotificationFanout: Send + Sync + 'static {
    fn fan_out(&self, event: &StatusEvent) -> impl Future<Output = FanoutReport> + Send;
}

/// Sends every event to the audible, visual and remote sinks at once.
///
/// A failing sink is logged and never holds back the others. The remote sink
/// is only called while the alert flag is on.
pub struct AlertDispatcher<A, V, R> {
    audible: A,
    visual: V,
    remote: R,
    flag: AlertFlag,
}

impl<A, V, R> AlertDispatcher<A, V, R>
where
    A: AlertSink,
    V: AlertSink,
    R: AlertSink,
{
    pub fn new(audible: A, visual: V, remote: R, flag: AlertFlag) -> Self {
        Self {
            audible,
            visual,
            remote,
            flag,
        }
    }
}

impl<A, V, R> NotificationFanout for AlertDispatcher<A, V, R>
where
    A: AlertSink + 'static,
    V: AlertSink + 'static,
    R: AlertSink + 'static,
{
    async fn fan_out(&self, event: &StatusEvent) -> FanoutReport {
        let remote_enabled = self.flag.is_enabled();

        let (audible, visual, remote) = tokio::join!(
            deliver(&self.audible, event),
            deliver(&self.visual, event),
            async {
                if remote_enabled {
                    deliver(&self.remote, event).await
                } else {
                    DeliveryOutcome::Skipped
                }
            },
        );

        FanoutReport {
            audible,
            visual,
            remote,
        }
    }
}

async fn deliver<S: AlertSink>(sink: &S, event: &StatusEvent) -> DeliveryOutcome {
    if !sink.is_active() {
        return DeliveryOutcome::Skipped;
    }

    match sink.deliver(event).await {
        Ok(()) => {
            log::debug!(
                "alert_delivered sink={} host={} status={}",
                sink.name(),
                event.host_id,
                event.status
            );
            DeliveryOutcome::Delivered
        }
        Err(error) => {
            log::warn!(
                "alert_sink_failed sink={} host={} status={} error={}",
                sink.name(),
                event.host_id,
                event.status,
                error
            );
            DeliveryOutcome::Failed
        }
    }
}
