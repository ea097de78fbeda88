use teloxide::{prelude::*, types::ParseMode};

use crate::app_context::AppContext;
use crate::layout::{DragEvent, ScrollPhase, ScrollSnapshot};

use super::super::helpers::{
    ScrollAction, as_html_block, parse_group_filter, parse_rows, parse_scroll, parse_status_filter,
};

pub(crate) async fn handle_filter(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    input: &str,
) -> ResponseResult<()> {
    let (title, body) = match parse_status_filter(input) {
        Ok(filter) => {
            app_context.engine.state().lock().await.set_status_filter(filter);
            app_context.layout_notify.notify_one();
            let label = filter.map_or("all", |status| status.as_str());
            log::info!("view_changed field=status_filter value={}", label);
            ("Filter", format!("Status filter set to {}.", label))
        }
        Err(message) => ("Filter", message),
    };

    bot.send_message(msg.chat.id, as_html_block(title, &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_group(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    input: &str,
) -> ResponseResult<()> {
    let filter = parse_group_filter(input);
    let groups = {
        let mut state = app_context.engine.state().lock().await;
        state.set_group_filter(filter.clone());
        state.groups()
    };
    app_context.layout_notify.notify_one();

    let label = filter.as_deref().unwrap_or("all");
    log::info!("view_changed field=group_filter value={}", label);

    let mut body = format!("Group filter set to {}.", label);
    if let Some(group) = filter.as_deref()
        && !groups.iter().any(|known| known == group)
    {
        body.push_str("\nNo host currently belongs to this group.");
    }
    if !groups.is_empty() {
        body.push_str(&format!("\n\nKnown groups: {}", groups.join(", ")));
    }

    bot.send_message(msg.chat.id, as_html_block("Group", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_rows(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    input: &str,
) -> ResponseResult<()> {
    let body = match parse_rows(input) {
        Ok(rows) => {
            let applied = app_context.engine.state().lock().await.set_rows(rows);
            app_context.layout_notify.notify_one();
            log::info!("view_changed field=rows value={}", applied);
            format!("Showing {} rows.", applied)
        }
        Err(message) => message,
    };

    bot.send_message(msg.chat.id, as_html_block("Rows", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_scroll(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    input: &str,
) -> ResponseResult<()> {
    let body = match parse_scroll(input) {
        Ok(ScrollAction::Show) => describe_scroll(&app_context.scroll.lock().await.snapshot()),
        Ok(action) => {
            let held = app_context.scroll.lock().await.is_dragging();
            for event in drag_events_for(action, held) {
                if app_context.drag_events.send(event).is_err() {
                    log::warn!("scroll_drag_dropped reason=sweep_job_stopped");
                    break;
                }
            }
            log::info!("view_changed field=scroll action={:?} held={}", action, held);
            scroll_reply(action, held)
        }
        Err(message) => message,
    };

    bot.send_message(msg.chat.id, as_html_block("Scroll", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

/// Pointer events for one `/scroll` action.
///
/// The pointer is anchored at 0 when the hold starts, so while held an offset
/// is measured from where the hold began. A nudge without a hold is a full
/// press, move and release.
pub(crate) fn drag_events_for(action: ScrollAction, held: bool) -> Vec<DragEvent> {
    match action {
        ScrollAction::Show => Vec::new(),
        ScrollAction::Hold if held => Vec::new(),
        ScrollAction::Hold => vec![DragEvent::Start { pointer_x: 0.0 }],
        ScrollAction::Release => vec![DragEvent::Release],
        ScrollAction::Nudge(px) if held => vec![DragEvent::Move { pointer_x: -px }],
        ScrollAction::Nudge(px) => vec![
            DragEvent::Start { pointer_x: 0.0 },
            DragEvent::Move { pointer_x: -px },
            DragEvent::Release,
        ],
    }
}

fn scroll_reply(action: ScrollAction, held: bool) -> String {
    match action {
        ScrollAction::Show => String::new(),
        ScrollAction::Hold if held => "The track is already held.".to_string(),
        ScrollAction::Hold => {
            "Track held. Use /scroll <px> to move it and /scroll release to resume.".to_string()
        }
        ScrollAction::Release if held => "Auto-scroll resumed.".to_string(),
        ScrollAction::Release => "The track was not held.".to_string(),
        ScrollAction::Nudge(px) if held => format!("Track moved to {:+.0} px from the hold.", px),
        ScrollAction::Nudge(px) => format!("Track moved by {:+.0} px.", px),
    }
}

pub(crate) fn describe_scroll(snapshot: &ScrollSnapshot) -> String {
    let phase = match snapshot.phase {
        ScrollPhase::Idle => "idle",
        ScrollPhase::Sweeping => "sweeping",
        ScrollPhase::Paused => "paused",
        ScrollPhase::Dragging => "held",
    };
    let direction = snapshot
        .direction
        .map_or(String::new(), |direction| format!(" ({:?})", direction).to_lowercase());
    format!(
        "Track {}{} at {:.0} of {:.0} px.",
        phase, direction, snapshot.offset, snapshot.max_offset
    )
}

#[cfg(test)]
mod tests {
    use super::{describe_scroll, drag_events_for};
    use crate::commands::helpers::ScrollAction;
    use crate::layout::{AutoScroll, DragEvent, ScrollPhase, SweepSettings};

    fn track() -> AutoScroll {
        let mut scroll = AutoScroll::new(SweepSettings {
            speed_px_per_sec: 0.0,
            pause: std::time::Duration::from_secs(2),
        });
        scroll.set_bounds(400.0, std::time::Instant::now());
        scroll
    }

    #[test]
    fn nudge_without_hold_is_a_full_drag() {
        let events = drag_events_for(ScrollAction::Nudge(120.0), false);
        assert_eq!(
            events,
            vec![
                DragEvent::Start { pointer_x: 0.0 },
                DragEvent::Move { pointer_x: -120.0 },
                DragEvent::Release,
            ]
        );

        let now = std::time::Instant::now();
        let mut scroll = track();
        for event in events {
            scroll.apply(event, now);
        }
        let snapshot = scroll.snapshot();
        assert_eq!(snapshot.offset, 120.0);
        assert_eq!(snapshot.phase, ScrollPhase::Sweeping);
    }

    #[test]
    fn held_track_moves_from_the_hold_origin() {
        let now = std::time::Instant::now();
        let mut scroll = track();
        for event in drag_events_for(ScrollAction::Hold, scroll.is_dragging()) {
            scroll.apply(event, now);
        }
        assert!(drag_events_for(ScrollAction::Hold, scroll.is_dragging()).is_empty());

        for px in [300.0, 80.0] {
            for event in drag_events_for(ScrollAction::Nudge(px), scroll.is_dragging()) {
                scroll.apply(event, now);
            }
        }
        assert!(scroll.is_dragging());
        assert_eq!(scroll.snapshot().offset, 80.0);
        assert_eq!(
            describe_scroll(&scroll.snapshot()),
            "Track held (forward) at 80 of 400 px."
        );

        for event in drag_events_for(ScrollAction::Release, scroll.is_dragging()) {
            scroll.apply(event, now);
        }
        assert!(!scroll.is_dragging());
    }
}
