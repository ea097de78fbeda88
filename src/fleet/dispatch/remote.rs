use serde::Serialize;
use teloxide::prelude::*;

use super::{AlertSink, SinkError};
use crate::fleet::{
    model::Status,
    transition::{StatusEvent, TransitionKind},
};

/// Body accepted by the alert webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload<'a> {
    pub host_id: &'a str,
    pub host_name: &'a str,
    pub status: Status,
}

impl<'a> From<&'a StatusEvent> for AlertPayload<'a> {
    fn from(event: &'a StatusEvent) -> Self {
        Self {
            host_id: &event.host_id,
            host_name: &event.host_name,
            status: event.status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    async fn post(&self, event: &StatusEvent) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.url)
            .json(&AlertPayload::from(event))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::HttpStatus {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send(&self, event: &StatusEvent) -> Result<(), SinkError> {
        self.bot
            .send_message(self.chat_id, alert_text(event))
            .await?;
        Ok(())
    }
}

pub fn alert_text(event: &StatusEvent) -> String {
    match event.kind {
        TransitionKind::Recovery => format!(
            "✅ RECOVERED: {} ({}) is healthy again",
            event.host_name, event.host_id
        ),
        TransitionKind::Alert => {
            let marker = match event.status {
                Status::Critical => "🔴",
                Status::Offline => "⚫",
                Status::Warning | Status::Healthy => "⚠️",
            };
            format!(
                "{} ALERT: {} ({}) is {}",
                marker, event.host_name, event.host_id, event.status
            )
        }
    }
}

/// Where alerts leave the process. Delivery is fire-and-forget; the receiver deduplicates.
#[derive(Debug, Clone)]
pub enum RemoteAlertSink {
    Disabled,
    Webhook(WebhookSink),
    Telegram(TelegramSink),
}

impl AlertSink for RemoteAlertSink {
    fn name(&self) -> &'static str {
        match self {
            RemoteAlertSink::Disabled => "remote_none",
            RemoteAlertSink::Webhook(_) => "remote_webhook",
            RemoteAlertSink::Telegram(_) => "remote_telegram",
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, RemoteAlertSink::Disabled)
    }

    async fn deliver(&self, event: &StatusEvent) -> Result<(), SinkError> {
        match self {
            RemoteAlertSink::Disabled => Ok(()),
            RemoteAlertSink::Webhook(sink) => sink.post(event).await,
            RemoteAlertSink::Telegram(sink) => sink.send(event).await,
        }
    }
}
