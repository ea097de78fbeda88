use std::path::Path;

use notify::{Config as NotifyConfig, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::time::{Duration, sleep};

use crate::app_context::AppContext;
use crate::config::{RuntimeConfig, load_config};

async fn apply_runtime_reload_from_path(
    app_context: &AppContext,
    config_path: &str,
) -> Result<RuntimeConfig, String> {
    let new_config = load_config(config_path).map_err(|error| error.to_string())?;
    let runtime_config = RuntimeConfig::from_config(&new_config);
    app_context.update_runtime_config(runtime_config.clone()).await;
    Ok(runtime_config)
}

pub(super) fn start_config_hot_reload_job(app_context: AppContext) {
    tokio::spawn(async move {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let config_path = app_context.config_path.clone();
        let mut watcher = match RecommendedWatcher::new(
            move |result| {
                let _ = tx.send(result);
            },
            NotifyConfig::default(),
        ) {
            Ok(watcher) => watcher,
            Err(error) => {
                log::warn!("config hot-reload disabled: watcher init failed: {}", error);
                return;
            }
        };

        if let Err(error) = watcher.watch(Path::new(config_path.as_str()), RecursiveMode::NonRecursive)
        {
            log::warn!(
                "config hot-reload disabled: failed to watch {}: {}",
                config_path,
                error
            );
            return;
        }

        while let Some(event_result) = rx.recv().await {
            let event = match event_result {
                Ok(event) => event,
                Err(error) => {
                    log::warn!("config hot-reload event error: {}", error);
                    continue;
                }
            };

            let should_reload = matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
            );
            if !should_reload {
                continue;
            }

            // editors emit several events per save; reload once they go quiet
            let debounce_ms = app_context.runtime_config.read().await.layout.resize_debounce_ms;
            loop {
                tokio::select! {
                    _ = sleep(Duration::from_millis(debounce_ms)) => break,
                    next = rx.recv() => {
                        if next.is_none() {
                            return;
                        }
                    }
                }
            }

            match apply_runtime_reload_from_path(&app_context, config_path.as_str()).await {
                Ok(runtime_config) => {
                    let layout = runtime_config.layout;
                    log::info!(
                        "config_hot_reload_applied target=runtime poll_interval_secs={} rows={} viewport_width={} viewport_height={} sweep_speed_px_per_sec={} sweep_pause_ms={}",
                        runtime_config.poll_interval_secs,
                        layout.rows,
                        layout.viewport_width,
                        layout.viewport_height,
                        layout.sweep_speed_px_per_sec,
                        layout.sweep_pause_ms,
                    );
                }
                Err(error) => {
                    log::warn!("config hot-reload ignored invalid config: {}", error);
                }
            }
        }
    });
}
