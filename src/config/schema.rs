use std::time::Duration;

use serde::Deserialize;

use crate::layout::{LayoutSettings, SweepSettings};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_inventory_path")]
    pub inventory_path: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub prometheus: Prometheus,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub alerts: Alerts,
    #[serde(default)]
    pub telegram: Option<Telegram>,
    #[serde(default)]
    pub snapshot: Snapshot,
}

/// The part of the config that can change without a restart.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub poll_interval_secs: u64,
    pub layout: Layout,
}

impl RuntimeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval_secs: config.poll_interval_secs,
            layout: config.layout.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prometheus {
    #[serde(default = "default_prometheus_url")]
    pub url: String,
    #[serde(default = "default_prometheus_timeout_secs")]
    pub timeout_secs: u64,
}

impl Prometheus {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layout {
    #[serde(default = "default_layout_rows")]
    pub rows: u16,
    #[serde(default = "default_min_card_height")]
    pub min_card_height: u32,
    #[serde(default = "default_max_card_height")]
    pub max_card_height: u32,
    #[serde(default = "default_card_aspect")]
    pub card_aspect: f64,
    #[serde(default = "default_base_gap")]
    pub base_gap: u32,
    #[serde(default = "default_max_extra_gap")]
    pub max_extra_gap: u32,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    #[serde(default = "default_sweep_speed_px_per_sec")]
    pub sweep_speed_px_per_sec: f64,
    #[serde(default = "default_sweep_pause_ms")]
    pub sweep_pause_ms: u64,
    #[serde(default = "default_sweep_tick_ms")]
    pub sweep_tick_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl Layout {
    pub fn settings(&self) -> LayoutSettings {
        LayoutSettings {
            min_card_height: self.min_card_height,
            max_card_height: self.max_card_height,
            card_aspect: self.card_aspect,
            base_gap: self.base_gap,
            max_extra_gap: self.max_extra_gap,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
        }
    }

    pub fn sweep(&self) -> SweepSettings {
        SweepSettings {
            speed_px_per_sec: self.sweep_speed_px_per_sec,
            pause: Duration::from_millis(self.sweep_pause_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteMode {
    #[default]
    None,
    Webhook,
    Telegram,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alerts {
    #[serde(default)]
    pub remote: RemoteMode,
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Empty keeps the flag in memory only.
    #[serde(default = "default_alert_flag_path")]
    pub flag_path: String,
    #[serde(default = "default_audible")]
    pub audible: bool,
    #[serde(default = "default_toast_lifetime_secs")]
    pub toast_lifetime_secs: u64,
    #[serde(default = "default_toast_capacity")]
    pub toast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Telegram {
    pub bot_token: String,
    pub owner_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}
