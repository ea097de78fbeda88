use super::schema::{Alerts, Layout, Prometheus, Snapshot};

pub(super) fn default_inventory_path() -> String {
    "inventory.json".to_string()
}

pub(super) fn default_poll_interval_secs() -> u64 {
    10
}

pub(super) fn default_prometheus_url() -> String {
    "http://127.0.0.1:9090".to_string()
}

pub(super) fn default_prometheus_timeout_secs() -> u64 {
    5
}

pub(super) fn default_layout_rows() -> u16 {
    3
}

pub(super) fn default_min_card_height() -> u32 {
    60
}

pub(super) fn default_max_card_height() -> u32 {
    155
}

pub(super) fn default_card_aspect() -> f64 {
    2.3
}

pub(super) fn default_base_gap() -> u32 {
    6
}

pub(super) fn default_max_extra_gap() -> u32 {
    30
}

pub(super) fn default_viewport_width() -> u32 {
    1600
}

pub(super) fn default_viewport_height() -> u32 {
    900
}

pub(super) fn default_sweep_speed_px_per_sec() -> f64 {
    18.0
}

pub(super) fn default_sweep_pause_ms() -> u64 {
    2000
}

pub(super) fn default_sweep_tick_ms() -> u64 {
    50
}

pub(super) fn default_resize_debounce_ms() -> u64 {
    200
}

pub(super) fn default_alert_flag_path() -> String {
    "data/alert_flag.json".to_string()
}

pub(super) fn default_audible() -> bool {
    true
}

pub(super) fn default_toast_lifetime_secs() -> u64 {
    5
}

pub(super) fn default_toast_capacity() -> usize {
    20
}

pub(super) fn default_snapshot_path() -> String {
    "data/fleet_frame.json".to_string()
}

impl Default for Prometheus {
    fn default() -> Self {
        Self {
            url: default_prometheus_url(),
            timeout_secs: default_prometheus_timeout_secs(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            rows: default_layout_rows(),
            min_card_height: default_min_card_height(),
            max_card_height: default_max_card_height(),
            card_aspect: default_card_aspect(),
            base_gap: default_base_gap(),
            max_extra_gap: default_max_extra_gap(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            sweep_speed_px_per_sec: default_sweep_speed_px_per_sec(),
            sweep_pause_ms: default_sweep_pause_ms(),
            sweep_tick_ms: default_sweep_tick_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }
}

impl Default for Alerts {
    fn default() -> Self {
        Self {
            remote: Default::default(),
            webhook_url: None,
            flag_path: default_alert_flag_path(),
            audible: default_audible(),
            toast_lifetime_secs: default_toast_lifetime_secs(),
            toast_capacity: default_toast_capacity(),
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_snapshot_path(),
        }
    }
}
