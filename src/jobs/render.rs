use std::sync::Arc;

use chrono::Utc;
use tokio::time::{Duration, sleep};

use crate::app_context::AppContext;
use crate::layout::{FleetFrame, compose_frame};
use crate::snapshot::write_frame;

/// Recomputes the layout, updates the scroll bound and publishes the frame.
pub(crate) async fn render_frame(app_context: &AppContext) -> Arc<FleetFrame> {
    let layout = app_context.runtime_config.read().await.layout.clone();
    let now = Utc::now();
    let toasts = app_context.toasts.active(now);

    let mut frame = {
        let state = app_context.engine.state().lock().await;
        compose_frame(&state, &layout.settings(), toasts, now)
    };

    {
        let mut scroll = app_context.scroll.lock().await;
        scroll.set_settings(layout.sweep());
        scroll.set_bounds(f64::from(frame.max_scroll), std::time::Instant::now());
        frame.scroll = scroll.snapshot();
    }

    if app_context.config.snapshot.enabled
        && let Err(error) = write_frame(&app_context.config.snapshot.path, &frame)
    {
        log::warn!("snapshot_write_failed error={}", error);
    }

    let frame = Arc::new(frame);
    app_context.frames.send_replace(Arc::clone(&frame));
    frame
}

pub(super) fn start_render_job(app_context: AppContext) {
    tokio::spawn(async move {
        let mut toasts_visible = false;

        loop {
            tokio::select! {
                _ = app_context.layout_notify.notified() => {
                    let debounce_ms = app_context.runtime_config.read().await.layout.resize_debounce_ms;
                    settle(&app_context, Duration::from_millis(debounce_ms)).await;
                }
                // re-render while toasts are on screen so expired ones disappear
                _ = sleep(Duration::from_secs(1)), if toasts_visible => {}
            }

            let frame = render_frame(&app_context).await;
            toasts_visible = !frame.toasts.is_empty();
            log::debug!(
                "frame_rendered pinned={} scrolling={} max_scroll={} toasts={}",
                frame.pinned.len(),
                frame.scrolling.len(),
                frame.max_scroll,
                frame.toasts.len()
            );
        }
    });
}

/// Waits until no further layout request arrives for `quiet`.
async fn settle(app_context: &AppContext, quiet: Duration) {
    loop {
        tokio::select! {
            _ = sleep(quiet) => return,
            _ = app_context.layout_notify.notified() => {}
        }
    }
}
