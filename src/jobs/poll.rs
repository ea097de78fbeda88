use chrono::Utc;
use tokio::time::{Duration, Instant, sleep};

use crate::app_context::AppContext;

pub(super) fn start_poll_job(app_context: AppContext) {
    tokio::spawn(async move {
        let mut previous_tick = None;

        loop {
            let runtime_config = app_context.runtime_config.read().await.clone();
            let now = Utc::now();

            if let Some(previous) = previous_tick {
                let elapsed_secs = now.signed_duration_since(previous).num_seconds().max(0);
                let threshold_secs = (runtime_config.poll_interval_secs * 2) as i64;
                if elapsed_secs > threshold_secs {
                    log::warn!(
                        "poll_loop_delayed elapsed_secs={} threshold_secs={}",
                        elapsed_secs,
                        threshold_secs
                    );
                }
            }

            previous_tick = Some(now);

            {
                let mut tick = app_context.last_poll_tick.lock().await;
                *tick = Some(now);
            }

            let started = Instant::now();
            let outcome = app_context.engine.poll_cycle().await;
            app_context.layout_notify.notify_one();

            // toasts land once delivery finishes, so lay out again then
            if let Some(delivery) = outcome.delivery {
                let layout_notify = app_context.layout_notify.clone();
                tokio::spawn(async move {
                    if delivery.await.is_ok() {
                        layout_notify.notify_one();
                    }
                });
            }

            tracing::info!(
                target: "fleet",
                module = "fleet",
                hosts = outcome.stats.total,
                critical = outcome.stats.critical,
                warning = outcome.stats.warning,
                healthy = outcome.stats.healthy,
                offline = outcome.stats.offline,
                events = outcome.events.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "fleet_cycle"
            );

            let sleep_duration = Duration::from_secs(runtime_config.poll_interval_secs);
            tokio::select! {
                _ = sleep(sleep_duration) => {}
                _ = app_context.runtime_update_notify.notified() => {
                    log::info!(
                        "poll_interval_change_interrupt_applied previous_sleep_secs={}",
                        runtime_config.poll_interval_secs
                    );
                }
            }
        }
    });
}
