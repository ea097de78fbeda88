use std::time::Instant;

use tokio::time::{Duration, sleep};

use crate::app_context::AppContext;
use crate::layout::DragEvent;

#[cfg(test)]
mod tests;

pub(super) fn start_sweep_job(app_context: AppContext) {
    tokio::spawn(async move {
        let Some(mut drag_events) = app_context.drag_inbox.lock().await.take() else {
            log::warn!("sweep_job_skipped reason=already_running");
            return;
        };

        loop {
            let tick_ms = app_context
                .runtime_config
                .read()
                .await
                .layout
                .sweep_tick_ms
                .max(1);

            let offset = tokio::select! {
                _ = sleep(Duration::from_millis(tick_ms)) => {
                    app_context.scroll.lock().await.tick(Instant::now())
                }
                _ = app_context.runtime_update_notify.notified() => continue,
                Some(event) = drag_events.recv() => apply_drag_event(&app_context, event).await,
            };

            publish_offset(&app_context, offset);
        }
    });
}

async fn apply_drag_event(app_context: &AppContext, event: DragEvent) -> f64 {
    let offset = app_context.scroll.lock().await.apply(event, Instant::now());
    log::debug!("scroll_drag event={:?} offset={}", event, offset);

    // the frame snapshot carries the phase, so repaint when it flips
    if !matches!(event, DragEvent::Move { .. }) {
        app_context.layout_notify.notify_one();
    }
    offset
}

fn publish_offset(app_context: &AppContext, offset: f64) {
    app_context.scroll_offset.send_if_modified(|current| {
        if *current == offset {
            return false;
        }
        *current = offset;
        true
    });
}
