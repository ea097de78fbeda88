use teloxide::prelude::*;

use crate::app_context::AppContext;

use super::command_def::MyCommands;
use super::features::{
    alerts::handle_alerts,
    fleet::{handle_fleet, handle_host, handle_refresh},
    health::{handle_health, handle_help},
    view::{handle_filter, handle_group, handle_rows, handle_scroll},
};

pub(super) async fn route_command(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: &AppContext,
) -> ResponseResult<()> {
    match cmd {
        MyCommands::Help => handle_help(&bot, &msg).await?,
        MyCommands::Fleet => handle_fleet(&bot, &msg, app_context).await?,
        MyCommands::Host(host_id) => handle_host(&bot, &msg, app_context, &host_id).await?,
        MyCommands::Filter(input) => handle_filter(&bot, &msg, app_context, &input).await?,
        MyCommands::Group(input) => handle_group(&bot, &msg, app_context, &input).await?,
        MyCommands::Rows(input) => handle_rows(&bot, &msg, app_context, &input).await?,
        MyCommands::Scroll(input) => handle_scroll(&bot, &msg, app_context, &input).await?,
        MyCommands::Alerts(input) => handle_alerts(&bot, &msg, app_context, &input).await?,
        MyCommands::Refresh => handle_refresh(&bot, &msg, app_context).await?,
        MyCommands::Health => handle_health(&bot, &msg, app_context).await?,
    }

    Ok(())
}
