use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use thiserror::Error;
use tokio::sync::{Mutex, Notify, RwLock, mpsc, watch};

use crate::{
    alert_flag::AlertFlag,
    config::{Config, RemoteMode, RuntimeConfig},
    fleet::{
        clock::{Clock, SystemClock},
        dispatch::{AlertDispatcher, AudibleCue, RemoteAlertSink, TelegramSink, ToastBoard, WebhookSink},
        engine::{FleetEngine, FleetState, ViewSettings},
        source::{PrometheusSource, SourceError},
    },
    inventory::{Inventory, InventoryError, load_inventory},
    layout::{AutoScroll, DragEvent, FleetFrame},
};

pub type LiveDispatcher = AlertDispatcher<AudibleCue, ToastBoard, RemoteAlertSink>;
pub type LiveEngine = FleetEngine<PrometheusSource, SystemClock, LiveDispatcher>;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("failed to build webhook client: {0}")]
    Webhook(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub runtime_update_notify: Arc<Notify>,
    pub layout_notify: Arc<Notify>,
    pub engine: LiveEngine,
    pub toasts: ToastBoard,
    pub alert_flag: AlertFlag,
    pub frames: Arc<watch::Sender<Arc<FleetFrame>>>,
    pub scroll: Arc<Mutex<AutoScroll>>,
    pub scroll_offset: Arc<watch::Sender<f64>>,
    /// Pointer input for the scrolling track, applied in order by the sweep job.
    pub drag_events: mpsc::UnboundedSender<DragEvent>,
    pub(crate) drag_inbox: Arc<Mutex<Option<mpsc::UnboundedReceiver<DragEvent>>>>,
    pub last_poll_tick: Arc<Mutex<Option<DateTime<Utc>>>>,
    pub config_path: String,
}

impl AppContext {
    pub fn new(
        config: Config,
        inventory: Inventory,
        config_path: impl Into<String>,
        bot: Option<Bot>,
    ) -> Result<Self, StartupError> {
        let runtime_config = RuntimeConfig::from_config(&config);
        let clock = Arc::new(SystemClock);

        let alert_flag = if config.alerts.flag_path.trim().is_empty() {
            AlertFlag::fixed(true)
        } else {
            AlertFlag::load(&config.alerts.flag_path)
        };
        let toasts = ToastBoard::new(
            Duration::from_secs(config.alerts.toast_lifetime_secs),
            config.alerts.toast_capacity,
            clock.clone(),
        );
        let dispatcher = AlertDispatcher::new(
            AudibleCue::stderr(config.alerts.audible),
            toasts.clone(),
            build_remote_sink(&config, bot)?,
            alert_flag.clone(),
        );

        let source = PrometheusSource::new(&config.prometheus.url, config.prometheus.timeout())?;
        let state = FleetState::new(
            inventory.hosts,
            inventory.thresholds,
            ViewSettings::with_rows(runtime_config.layout.rows),
        );
        let engine = FleetEngine::new(Arc::new(source), clock.clone(), Arc::new(dispatcher), state);

        let empty_frame = FleetFrame::empty(
            &runtime_config.layout.settings(),
            runtime_config.layout.rows,
            clock.now(),
        );
        let scroll = AutoScroll::new(runtime_config.layout.sweep());
        let (drag_events, drag_inbox) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            runtime_config: Arc::new(RwLock::new(runtime_config)),
            runtime_update_notify: Arc::new(Notify::new()),
            layout_notify: Arc::new(Notify::new()),
            engine,
            toasts,
            alert_flag,
            frames: Arc::new(watch::channel(Arc::new(empty_frame)).0),
            scroll: Arc::new(Mutex::new(scroll)),
            scroll_offset: Arc::new(watch::channel(0.0).0),
            drag_events,
            drag_inbox: Arc::new(Mutex::new(Some(drag_inbox))),
            last_poll_tick: Arc::new(Mutex::new(None)),
            config_path: config_path.into(),
        })
    }

    /// Swaps the runtime config and wakes the jobs that depend on it.
    pub async fn update_runtime_config(&self, runtime_config: RuntimeConfig) {
        let rows = runtime_config.layout.rows;
        let previous_rows = std::mem::replace(&mut *self.runtime_config.write().await, runtime_config)
            .layout
            .rows;
        if rows != previous_rows {
            self.engine.state().lock().await.set_rows(rows);
        }
        self.runtime_update_notify.notify_waiters();
        self.layout_notify.notify_one();
    }

    /// Reloads the inventory file. On error the current fleet stays in place.
    pub async fn refresh_inventory(&self) -> Result<usize, InventoryError> {
        let inventory = load_inventory(&self.config.inventory_path)?;
        let count = inventory.hosts.len();
        self.engine
            .state()
            .lock()
            .await
            .replace_inventory(inventory.hosts, inventory.thresholds);
        log::info!(
            "inventory_refreshed path={} hosts={}",
            self.config.inventory_path,
            count
        );
        self.runtime_update_notify.notify_waiters();
        self.layout_notify.notify_one();
        Ok(count)
    }
}

fn build_remote_sink(config: &Config, bot: Option<Bot>) -> Result<RemoteAlertSink, StartupError> {
    match config.alerts.remote {
        RemoteMode::None => Ok(RemoteAlertSink::Disabled),
        RemoteMode::Webhook => {
            let Some(url) = config.alerts.webhook_url.clone() else {
                log::warn!("remote_alerts_disabled reason=webhook_url_missing");
                return Ok(RemoteAlertSink::Disabled);
            };
            let http = reqwest::Client::builder()
                .timeout(config.prometheus.timeout())
                .build()?;
            Ok(RemoteAlertSink::Webhook(WebhookSink::new(http, url)))
        }
        RemoteMode::Telegram => match (bot, config.owner_chat_id()) {
            (Some(bot), Ok(chat_id)) => Ok(RemoteAlertSink::Telegram(TelegramSink::new(bot, chat_id))),
            (None, _) => {
                log::warn!("remote_alerts_disabled reason=telegram_bot_unavailable");
                Ok(RemoteAlertSink::Disabled)
            }
            (_, Err(error)) => {
                log::warn!("remote_alerts_disabled reason=invalid_owner error={}", error);
                Ok(RemoteAlertSink::Disabled)
            }
        },
    }
}
