use serde::Serialize;

use crate::fleet::model::Status;

use super::LayoutSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardGeometry {
    pub width: u32,
    pub height: u32,
    pub gap: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderEmphasis {
    Danger,
    Warning,
    Normal,
    Muted,
}

impl From<Status> for BorderEmphasis {
    fn from(status: Status) -> Self {
        match status {
            Status::Critical => BorderEmphasis::Danger,
            Status::Warning => BorderEmphasis::Warning,
            Status::Healthy => BorderEmphasis::Normal,
            Status::Offline => BorderEmphasis::Muted,
        }
    }
}

/// Card size for `rows` rows in `available_height` pixels.
///
/// Height is clamped to the configured range and width follows the aspect ratio.
/// Spare height goes into the row gap on top of `base_gap`, at most `max_extra_gap` per gap.
pub fn card_geometry(rows: u16, available_height: u32, settings: &LayoutSettings) -> CardGeometry {
    let rows = u32::from(rows.max(1));
    let base_gap = settings.base_gap;

    let fitted = available_height.saturating_sub((rows - 1).saturating_mul(base_gap)) / rows;
    let height = fitted
        .min(settings.max_card_height)
        .max(settings.min_card_height);
    let width = (f64::from(height) * settings.card_aspect)
        .floor()
        .clamp(0.0, f64::from(u32::MAX)) as u32;

    let extra = if rows == 1 {
        0
    } else {
        let leftover = available_height.saturating_sub(rows.saturating_mul(height));
        (leftover / (rows - 1)).min(settings.max_extra_gap)
    };

    CardGeometry {
        width,
        height,
        gap: base_gap.saturating_add(extra),
    }
}

/// Column-major placement inside the scrolling track, `rows` cards per column.
pub fn place_scrolling(index: usize, rows: u16, geometry: CardGeometry) -> Rect {
    let rows = usize::from(rows.max(1));
    let column = (index / rows) as u32;
    let row = (index % rows) as u32;
    Rect {
        x: column.saturating_mul(geometry.width.saturating_add(geometry.gap)),
        y: row.saturating_mul(geometry.height.saturating_add(geometry.gap)),
        width: geometry.width,
        height: geometry.height,
    }
}

fn pinned_per_row(viewport_width: u32, geometry: CardGeometry) -> usize {
    let pitch = geometry.width.saturating_add(geometry.gap);
    (viewport_width.saturating_add(geometry.gap) / pitch.max(1)).max(1) as usize
}

/// Row-major placement inside the pinned strip, wrapping at `viewport_width`.
pub fn place_pinned(index: usize, viewport_width: u32, geometry: CardGeometry) -> Rect {
    let per_row = pinned_per_row(viewport_width, geometry);
    Rect {
        x: ((index % per_row) as u32).saturating_mul(geometry.width.saturating_add(geometry.gap)),
        y: ((index / per_row) as u32).saturating_mul(geometry.height.saturating_add(geometry.gap)),
        width: geometry.width,
        height: geometry.height,
    }
}

/// Height the pinned strip takes above the track, including the gap below its last row.
pub fn pinned_strip_height(cards: usize, viewport_width: u32, geometry: CardGeometry) -> u32 {
    if cards == 0 {
        return 0;
    }
    let strip_rows = cards.div_ceil(pinned_per_row(viewport_width, geometry)) as u32;
    strip_rows.saturating_mul(geometry.height.saturating_add(geometry.gap))
}

pub fn content_width(cards: usize, rows: u16, geometry: CardGeometry) -> u32 {
    if cards == 0 {
        return 0;
    }
    let columns = cards.div_ceil(usize::from(rows.max(1))) as u32;
    columns
        .saturating_mul(geometry.width)
        .saturating_add((columns - 1).saturating_mul(geometry.gap))
}

pub fn max_scroll(content_width: u32, viewport_width: u32) -> u32 {
    content_width.saturating_sub(viewport_width)
}

#[cfg(test)]
mod tests {
    use super::{
        CardGeometry, card_geometry, content_width, max_scroll, pinned_strip_height, place_pinned,
        place_scrolling,
    };
    use crate::layout::LayoutSettings;

    #[test]
    fn height_fits_rows_and_gap_absorbs_leftover() {
        let settings = LayoutSettings::default();
        let geometry = card_geometry(3, 400, &settings);

        // (400 - 2*6) / 3 = 129
        assert_eq!(geometry.height, 129);
        assert_eq!(geometry.width, (129.0_f64 * 2.3).floor() as u32);
        // leftover 400 - 387 = 13 -> 6 extra per gap on top of the base 6
        assert_eq!(geometry.gap, 12);
    }

    #[test]
    fn extra_gap_is_added_to_base_gap() {
        let settings = LayoutSettings::default();
        let geometry = card_geometry(3, 500, &settings);

        // (500 - 12) / 3 = 162 -> clamped to 155, leftover 35 -> 17 per gap
        assert_eq!(geometry.height, 155);
        assert_eq!(geometry.gap, 6 + 17);
    }

    #[test]
    fn oversized_settings_saturate_instead_of_overflowing() {
        let settings = LayoutSettings {
            min_card_height: u32::MAX / 2,
            max_card_height: u32::MAX,
            card_aspect: 1e12,
            base_gap: u32::MAX / 2,
            max_extra_gap: u32::MAX,
            viewport_width: u32::MAX,
            viewport_height: u32::MAX,
        };

        let geometry = card_geometry(u16::MAX, u32::MAX, &settings);
        assert_eq!(geometry.width, u32::MAX);
        assert_eq!(geometry.gap, u32::MAX / 2);

        assert_eq!(place_scrolling(usize::from(u16::MAX) * 4, u16::MAX, geometry).x, u32::MAX);
        assert_eq!(place_pinned(9, 1, geometry).y, u32::MAX);
        assert_eq!(content_width(1_000, 1, geometry), u32::MAX);
        assert_eq!(pinned_strip_height(3, 1, geometry), u32::MAX);
    }

    #[test]
    fn height_is_clamped_and_extra_gap_capped() {
        let settings = LayoutSettings::default();

        let tall = card_geometry(2, 900, &settings);
        assert_eq!(tall.height, settings.max_card_height);
        assert_eq!(tall.gap, settings.base_gap + settings.max_extra_gap);

        let short = card_geometry(6, 200, &settings);
        assert_eq!(short.height, settings.min_card_height);
        assert_eq!(short.gap, settings.base_gap);
    }

    #[test]
    fn single_row_keeps_base_gap() {
        let settings = LayoutSettings::default();
        let geometry = card_geometry(1, 120, &settings);
        assert_eq!(geometry.height, 120);
        assert_eq!(geometry.gap, settings.base_gap);
    }

    #[test]
    fn scrolling_cards_fill_columns_first() {
        let geometry = CardGeometry {
            width: 100,
            height: 40,
            gap: 10,
        };

        let third = place_scrolling(2, 2, geometry);
        assert_eq!((third.x, third.y), (110, 0));
        let fourth = place_scrolling(3, 2, geometry);
        assert_eq!((fourth.x, fourth.y), (110, 50));
    }

    #[test]
    fn pinned_cards_wrap_at_viewport() {
        let geometry = CardGeometry {
            width: 100,
            height: 40,
            gap: 10,
        };

        // 320 px fits three 100 px cards with 10 px gaps
        assert_eq!(place_pinned(2, 320, geometry).y, 0);
        let wrapped = place_pinned(3, 320, geometry);
        assert_eq!((wrapped.x, wrapped.y), (0, 50));

        assert_eq!(pinned_strip_height(0, 320, geometry), 0);
        assert_eq!(pinned_strip_height(3, 320, geometry), 50);
        assert_eq!(pinned_strip_height(4, 320, geometry), 100);
    }

    #[test]
    fn content_width_and_scroll_bound() {
        let geometry = CardGeometry {
            width: 100,
            height: 40,
            gap: 10,
        };

        assert_eq!(content_width(0, 3, geometry), 0);
        assert_eq!(content_width(6, 3, geometry), 210);
        assert_eq!(content_width(7, 3, geometry), 320);
        assert_eq!(max_scroll(320, 300), 20);
        assert_eq!(max_scroll(210, 300), 0);
    }
}
