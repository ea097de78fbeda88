mod auth;
mod formatting;
mod parsing;

pub(super) use auth::is_authorized;
pub(super) use formatting::{as_html_block, bar, bytes, number, percent, rate, uptime};
pub(super) use parsing::{
    ScrollAction, Toggle, parse_group_filter, parse_rows, parse_scroll, parse_status_filter,
    parse_toggle,
};
