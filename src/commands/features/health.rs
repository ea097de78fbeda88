use chrono::{DateTime, Utc};
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};

use crate::app_context::AppContext;

use super::super::{command_def::MyCommands, helpers::as_html_block};

pub(crate) async fn handle_help(bot: &Bot, msg: &Message) -> ResponseResult<()> {
    bot.send_message(
        msg.chat.id,
        as_html_block(
            "Available commands",
            &MyCommands::descriptions().to_string(),
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;

    Ok(())
}

pub(crate) async fn handle_health(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let poll_interval_secs = app_context.runtime_config.read().await.poll_interval_secs;
    let last_tick = *app_context.last_poll_tick.lock().await;
    let body = health_report(last_tick, Utc::now(), poll_interval_secs);

    bot.send_message(msg.chat.id, as_html_block("Health", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) fn health_report(
    last_tick: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    poll_interval_secs: u64,
) -> String {
    let threshold_secs = poll_interval_secs.saturating_mul(2) as i64;

    match last_tick {
        Some(tick) => {
            let lag_secs = now.signed_duration_since(tick).num_seconds().max(0);
            let status_line = if lag_secs > threshold_secs {
                format!(
                    "⚠️ CRITICAL: Poll loop is delayed. Last cycle: {}s ago (threshold: {}s)",
                    lag_secs, threshold_secs
                )
            } else {
                format!(
                    "✅ Healthy. Last poll cycle: {}s ago (threshold: {}s)",
                    lag_secs, threshold_secs
                )
            };

            format!(
                "{}\n\nPoll interval: {}s\nCurrent time: {}\nLast cycle: {}",
                status_line,
                poll_interval_secs,
                now.to_rfc3339(),
                tick.to_rfc3339()
            )
        }
        None => format!(
            "⏳ Warming up...\n\nThe poll loop has not finished its first cycle yet.\nPoll interval: {}s\nCurrent time: {}",
            poll_interval_secs,
            now.to_rfc3339()
        ),
    }
}
