mod geometry;
mod partition;
mod scroll;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fleet::{
    classifier::{MetricLevel, metric_level},
    dispatch::Toast,
    engine::{FleetState, StatusCounts},
    model::{Host, HostMetrics, Status, Uptime},
};

pub use geometry::{
    BorderEmphasis, CardGeometry, Rect, card_geometry, content_width, max_scroll,
    pinned_strip_height, place_pinned, place_scrolling,
};
pub use partition::partition;
pub use scroll::{AutoScroll, DragEvent, ScrollPhase, ScrollSnapshot, SweepSettings};

/// Pixel parameters of the card grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub min_card_height: u32,
    pub max_card_height: u32,
    pub card_aspect: f64,
    pub base_gap: u32,
    pub max_extra_gap: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_card_height: 60,
            max_card_height: 155,
            card_aspect: 2.3,
            base_gap: 6,
            max_extra_gap: 30,
            viewport_width: 1600,
            viewport_height: 900,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A placed card. `rect` is relative to its own region (pinned strip or scrolling track).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCard {
    pub host_id: String,
    pub rect: Rect,
    pub emphasis: BorderEmphasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricLevels {
    pub cpu: MetricLevel,
    pub memory: MetricLevel,
    pub disk: MetricLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostView {
    pub id: String,
    pub name: String,
    pub group: String,
    pub status: Status,
    pub metrics: HostMetrics,
    pub levels: MetricLevels,
    pub uptime: Option<Uptime>,
}

impl HostView {
    pub(crate) fn from_host(host: &Host, state: &FleetState) -> Self {
        let metrics = host.metrics();
        let thresholds = state.thresholds();
        Self {
            id: host.id().to_string(),
            name: host.display_name().to_string(),
            group: host.group_label().to_string(),
            status: host.status(),
            metrics: metrics.clone(),
            levels: MetricLevels {
                cpu: metric_level(metrics.cpu_percent, thresholds.cpu),
                memory: metric_level(metrics.memory_percent, thresholds.memory),
                disk: metric_level(metrics.disk_percent, thresholds.disk),
            },
            uptime: metrics.uptime(),
        }
    }
}

/// Everything the presentation layer needs to paint one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetFrame {
    pub generated_at: DateTime<Utc>,
    pub rows: u16,
    pub card_geometry: CardGeometry,
    pub viewport: Viewport,
    pub pinned: Vec<LayoutCard>,
    /// The scrolling track starts this far below the top of the viewport.
    pub pinned_height: u32,
    pub scrolling: Vec<LayoutCard>,
    pub content_width: u32,
    pub max_scroll: u32,
    pub scroll: ScrollSnapshot,
    pub status_filter: Option<Status>,
    pub group_filter: Option<String>,
    pub stats: StatusCounts,
    pub hosts: Vec<HostView>,
    pub toasts: Vec<Toast>,
}

impl FleetFrame {
    pub fn empty(settings: &LayoutSettings, rows: u16, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            rows,
            card_geometry: card_geometry(rows, settings.viewport_height, settings),
            viewport: Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
            },
            pinned: Vec::new(),
            pinned_height: 0,
            scrolling: Vec::new(),
            content_width: 0,
            max_scroll: 0,
            scroll: ScrollSnapshot::default(),
            status_filter: None,
            group_filter: None,
            stats: StatusCounts::default(),
            hosts: Vec::new(),
            toasts: Vec::new(),
        }
    }
}

/// Partitions the fleet and places every card for the current view.
///
/// Rows are sized against the height left under the pinned strip. The strip is
/// first measured at full-height geometry, so the final cards (never larger)
/// always fit inside the reserved band.
pub fn compose_frame(
    state: &FleetState,
    settings: &LayoutSettings,
    toasts: Vec<Toast>,
    now: DateTime<Utc>,
) -> FleetFrame {
    let view = state.view();
    let rows = view.rows.max(1);
    let split = partition(state.hosts(), view);
    let full = card_geometry(rows, settings.viewport_height, settings);
    let reserved = pinned_strip_height(split.pinned.len(), settings.viewport_width, full);
    let geometry = card_geometry(
        rows,
        settings.viewport_height.saturating_sub(reserved),
        settings,
    );

    let pinned: Vec<LayoutCard> = split
        .pinned
        .iter()
        .enumerate()
        .map(|(index, host)| LayoutCard {
            host_id: host.id().to_string(),
            rect: place_pinned(index, settings.viewport_width, geometry),
            emphasis: host.status().into(),
        })
        .collect();

    let scrolling: Vec<LayoutCard> = split
        .scrolling
        .iter()
        .enumerate()
        .map(|(index, host)| LayoutCard {
            host_id: host.id().to_string(),
            rect: place_scrolling(index, rows, geometry),
            emphasis: host.status().into(),
        })
        .collect();

    let track_width = content_width(scrolling.len(), rows, geometry);
    let hosts = split
        .pinned
        .iter()
        .chain(split.scrolling.iter())
        .map(|host| HostView::from_host(host, state))
        .collect();

    FleetFrame {
        generated_at: now,
        rows,
        card_geometry: geometry,
        viewport: Viewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
        },
        pinned_height: pinned_strip_height(pinned.len(), settings.viewport_width, geometry),
        pinned,
        scrolling,
        content_width: track_width,
        max_scroll: max_scroll(track_width, settings.viewport_width),
        scroll: ScrollSnapshot::default(),
        status_filter: view.status_filter,
        group_filter: view.group_filter.clone(),
        stats: state.stats(),
        hosts,
        toasts,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{BorderEmphasis, LayoutSettings, compose_frame};
    use crate::fleet::{
        classifier::MetricLevel,
        engine::{FleetState, ViewSettings},
        model::{HostIdentity, HostMetrics, Thresholds},
    };

    fn identity(id: &str) -> HostIdentity {
        HostIdentity {
            id: id.to_string(),
            display_name: id.to_string(),
            group_label: "ops".to_string(),
            query_target: format!("{}:9100", id),
        }
    }

    fn online(cpu: f64) -> HostMetrics {
        HostMetrics {
            cpu_percent: Some(cpu),
            online: true,
            ..HostMetrics::default()
        }
    }

    #[test]
    fn frame_places_pinned_and_scrolling_cards() {
        let mut state = FleetState::new(
            vec![identity("a"), identity("b"), identity("c")],
            Thresholds::default(),
            ViewSettings::with_rows(2),
        );
        state.apply_observations(vec![
            ("a".to_string(), online(95.0)),
            ("b".to_string(), online(10.0)),
            ("c".to_string(), HostMetrics::offline()),
        ]);

        let frame = compose_frame(&state, &LayoutSettings::default(), Vec::new(), Utc::now());

        assert_eq!(frame.pinned.len(), 1);
        assert_eq!(frame.pinned[0].emphasis, BorderEmphasis::Danger);
        assert_eq!(frame.scrolling.len(), 2);
        assert_eq!(frame.scrolling[1].emphasis, BorderEmphasis::Muted);
        assert_eq!(frame.scrolling[1].rect.y, frame.card_geometry.height + frame.card_geometry.gap);
        assert_eq!(frame.max_scroll, 0);
        assert_eq!(frame.stats.critical, 1);
        assert_eq!(frame.hosts[0].levels.cpu, MetricLevel::Critical);
        assert_eq!(frame.hosts[2].levels.cpu, MetricLevel::Unknown);
    }

    #[test]
    fn wide_track_gets_scroll_bound() {
        let identities: Vec<HostIdentity> = (0..40).map(|n| identity(&format!("h{}", n))).collect();
        let mut state = FleetState::new(identities, Thresholds::default(), ViewSettings::with_rows(1));
        state.apply_observations(
            (0..40)
                .map(|n| (format!("h{}", n), online(5.0)))
                .collect(),
        );
        let settings = LayoutSettings {
            viewport_width: 800,
            viewport_height: 100,
            ..LayoutSettings::default()
        };

        let frame = compose_frame(&state, &settings, Vec::new(), Utc::now());

        let width = (100.0_f64 * 2.3).floor() as u32;
        assert_eq!(frame.card_geometry.height, 100);
        assert_eq!(frame.card_geometry.width, width);
        assert_eq!(frame.content_width, 40 * width + 39 * 6);
        assert_eq!(frame.max_scroll, frame.content_width - 800);

        let json = serde_json::to_value(&frame).expect("json");
        assert!(json.get("maxScroll").is_some());
        assert!(json["scrolling"][0].get("hostId").is_some());
    }

    #[test]
    fn track_rows_fit_under_the_pinned_strip() {
        let identities: Vec<HostIdentity> = (0..6).map(|n| identity(&format!("h{}", n))).collect();
        let mut state = FleetState::new(identities, Thresholds::default(), ViewSettings::with_rows(3));
        state.apply_observations(
            (0..6)
                .map(|n| (format!("h{}", n), online(if n < 2 { 95.0 } else { 5.0 })))
                .collect(),
        );
        let settings = LayoutSettings {
            viewport_height: 500,
            ..LayoutSettings::default()
        };

        let frame = compose_frame(&state, &settings, Vec::new(), Utc::now());

        assert_eq!(frame.pinned.len(), 2);
        // full-height cards are 155 + 23, leaving 322 px: (322 - 12) / 3 = 103
        let geometry = frame.card_geometry;
        assert_eq!(geometry.height, 103);
        assert_eq!(frame.pinned_height, geometry.height + geometry.gap);
        assert!(frame.pinned_height + 3 * geometry.height + 2 * geometry.gap <= 500);

        let json = serde_json::to_value(&frame).expect("json");
        assert_eq!(json["pinnedHeight"], frame.pinned_height);
        assert_eq!(json["scroll"]["phase"], "idle");
    }
}
