use crate::fleet::model::Uptime;

const TELEGRAM_TEXT_HARD_LIMIT: usize = 4096;
const TELEGRAM_TEXT_SAFE_LIMIT: usize = 3900;
const TRUNCATE_NOTICE: &str = "\n\n⚠️ (Output was truncated...)";
const MISSING: &str = "--";
const BAR_CELLS: usize = 10;

pub(crate) fn as_html_block(title: &str, body: &str) -> String {
    let escaped_title = html_escape::encode_text(title);
    let body_budget = TELEGRAM_TEXT_SAFE_LIMIT.saturating_sub(TRUNCATE_NOTICE.len());
    let mut escaped_body = sanitize_and_truncate(body, body_budget);
    let was_truncated = html_escape::encode_text(body).len() > escaped_body.len();

    if was_truncated {
        escaped_body.push_str(TRUNCATE_NOTICE);
    }

    let message = format!("<b>{}</b>\n<pre>{}</pre>", escaped_title, escaped_body);
    if message.len() > TELEGRAM_TEXT_HARD_LIMIT {
        log::warn!("formatted Telegram message is close to hard limit");
    }
    message
}

pub(crate) fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| format!("{:.1}%", value))
}

pub(crate) fn number(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| format!("{:.2}", value))
}

pub(crate) fn bytes(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), human_bytes)
}

pub(crate) fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |value| format!("{}/s", human_bytes(value)))
}

pub(crate) fn uptime(value: Option<Uptime>) -> String {
    value.map_or_else(
        || MISSING.to_string(),
        |uptime| format!("{}d {}h", uptime.days, uptime.hours),
    )
}

/// Ten-cell gauge; missing values draw an empty bar.
pub(crate) fn bar(value: Option<f64>) -> String {
    let filled = value
        .filter(|value| value.is_finite())
        .map_or(0, |value| {
            ((value.clamp(0.0, 100.0) / 100.0) * BAR_CELLS as f64).round() as usize
        });
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

fn human_bytes(value: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut scaled = value.max(0.0);
    let mut unit = 0;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.0} {}", scaled, UNITS[unit])
    } else {
        format!("{:.1} {}", scaled, UNITS[unit])
    }
}

fn sanitize_and_truncate(input: &str, max_escaped_len: usize) -> String {
    let escaped_full = html_escape::encode_text(input);
    if escaped_full.len() <= max_escaped_len {
        return escaped_full.into_owned();
    }

    let mut low = 0usize;
    let mut high = input.len();
    let mut best = "";

    while low <= high {
        let mid = (low + high) / 2;
        let candidate = truncate_to_char_boundary(input, mid);
        let escaped = html_escape::encode_text(candidate);

        if escaped.len() <= max_escaped_len {
            best = candidate;
            low = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            high = mid - 1;
        }
    }

    html_escape::encode_text(best).into_owned()
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }

    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }

    &input[..end]
}
