use teloxide::{prelude::*, types::ParseMode};

use crate::app_context::AppContext;

use super::super::helpers::{Toggle, as_html_block, parse_toggle};

fn state_label(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub(crate) async fn handle_alerts(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    input: &str,
) -> ResponseResult<()> {
    let flag = &app_context.alert_flag;
    let outcome = match parse_toggle(input) {
        Ok(Toggle::Show) => Ok(flag.is_enabled()),
        Ok(Toggle::On) => flag.set(true).map(|()| true),
        Ok(Toggle::Off) => flag.set(false).map(|()| false),
        Ok(Toggle::Flip) => flag.toggle(),
        Err(message) => {
            bot.send_message(msg.chat.id, as_html_block("Remote alerts", &message))
                .parse_mode(ParseMode::Html)
                .await?;
            return Ok(());
        }
    };

    let body = match outcome {
        Ok(enabled) => {
            log::info!("remote_alerts_state enabled={}", enabled);
            format!(
                "Remote alerts are {}.\nAudible and on-screen notifications are unaffected.",
                state_label(enabled)
            )
        }
        Err(error) => {
            log::warn!("alert_flag_persist_failed error={}", error);
            format!(
                "Remote alerts are {} for this session, but the setting could not be saved:\n{}",
                state_label(flag.is_enabled()),
                error
            )
        }
    };

    bot.send_message(msg.chat.id, as_html_block("Remote alerts", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}
