mod alert_flag;
mod app_context;
mod commands;
mod config;
mod fleet;
mod inventory;
mod jobs;
mod layout;
mod snapshot;

use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::app_context::AppContext;
use crate::commands::{MyCommands, answer};
use crate::config::{Config, config_path, load_config};
use crate::inventory::load_inventory;
use crate::jobs::start_background_jobs;

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_json_logging();

    let config_path = config_path();
    let config: Config = match load_config(&config_path) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    let inventory = match load_inventory(&config.inventory_path) {
        Ok(inventory) => inventory,
        Err(error) => {
            log::error!("Inventory error: {}", error);
            return;
        }
    };

    log::info!(
        "fleetwatch_starting config={} hosts={} prometheus={}",
        config_path,
        inventory.hosts.len(),
        config.prometheus.url
    );

    let bot = config
        .telegram
        .as_ref()
        .map(|telegram| Bot::new(&telegram.bot_token));

    let app_context = match AppContext::new(config, inventory, config_path, bot.clone()) {
        Ok(app_context) => app_context,
        Err(error) => {
            log::error!("Startup error: {}", error);
            return;
        }
    };

    start_background_jobs(app_context.clone());

    match bot {
        Some(bot) => {
            MyCommands::repl(bot, move |bot, msg, cmd| {
                let app_context = app_context.clone();
                async move { answer(bot, msg, cmd, &app_context).await }
            })
            .await;
        }
        None => {
            log::info!("telegram_disabled reason=not_configured");
            if let Err(error) = tokio::signal::ctrl_c().await {
                log::error!("shutdown_signal_failed error={}", error);
            }
        }
    }

    log::info!("fleetwatch_stopped");
}
