use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum MyCommands {
    #[command(description = "Show help menu.")]
    Help,
    #[command(description = "Show fleet counts and every host in the current view.")]
    Fleet,
    #[command(description = "Show one host in detail, e.g. /host web-01")]
    Host(String),
    #[command(description = "Filter by status: critical, warning, healthy, offline or all.")]
    Filter(String),
    #[command(description = "Filter by group label, or all.")]
    Group(String),
    #[command(description = "Set the number of card rows (1-8).")]
    Rows(String),
    #[command(description = "Drag the scrolling track: hold, release, or a pixel offset, e.g. /scroll 200")]
    Scroll(String),
    #[command(description = "Show or change remote alerts: on, off or toggle.")]
    Alerts(String),
    #[command(description = "Reload the host inventory file.")]
    Refresh,
    #[command(description = "Show poll loop liveness.")]
    Health,
}
