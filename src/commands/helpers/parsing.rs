use crate::fleet::{engine::MAX_ROWS, model::Status};

/// `all` (or nothing) clears the filter.
pub(crate) fn parse_status_filter(input: &str) -> Result<Option<Status>, String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    input.parse::<Status>().map(Some).map_err(|_| {
        format!(
            "Unknown status {:?}. Use critical, warning, healthy, offline or all.",
            input
        )
    })
}

pub(crate) fn parse_group_filter(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(input.to_string())
    }
}

pub(crate) fn parse_rows(input: &str) -> Result<u16, String> {
    match input.trim().parse::<u16>() {
        Ok(rows) if (1..=MAX_ROWS).contains(&rows) => Ok(rows),
        _ => Err(format!("Rows must be a number between 1 and {}.", MAX_ROWS)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Toggle {
    Show,
    On,
    Off,
    Flip,
}

pub(crate) fn parse_toggle(input: &str) -> Result<Toggle, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "status" => Ok(Toggle::Show),
        "on" | "enable" => Ok(Toggle::On),
        "off" | "disable" => Ok(Toggle::Off),
        "toggle" => Ok(Toggle::Flip),
        other => Err(format!("Unknown option {:?}. Use on, off or toggle.", other)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ScrollAction {
    Show,
    Hold,
    Release,
    /// Pixels to move the track by; positive reveals cards further right.
    Nudge(f64),
}

pub(crate) fn parse_scroll(input: &str) -> Result<ScrollAction, String> {
    let input = input.trim().to_ascii_lowercase();
    match input.as_str() {
        "" | "status" => Ok(ScrollAction::Show),
        "hold" | "grab" => Ok(ScrollAction::Hold),
        "release" | "resume" => Ok(ScrollAction::Release),
        other => match other.parse::<f64>() {
            Ok(px) if px.is_finite() => Ok(ScrollAction::Nudge(px)),
            _ => Err(format!(
                "Unknown option {:?}. Use hold, release or a pixel offset such as 200 or -150.",
                other
            )),
        },
    }
}
