use std::fmt::Write as _;

use teloxide::{prelude::*, types::ParseMode};

use crate::app_context::AppContext;
use crate::fleet::{engine::EngineError, model::Status, normalizer::CpuSummary};
use crate::jobs::render_frame;
use crate::layout::{FleetFrame, HostView};

use super::super::helpers::{as_html_block, bar, bytes, number, percent, rate, uptime};
use super::view::describe_scroll;

const HISTORY_WINDOW_SECS: u64 = 3_600;
const HISTORY_STEP_SECS: u64 = 60;

pub(crate) async fn handle_fleet(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let frame = render_frame(app_context).await;
    let body = fleet_summary(&frame, app_context.alert_flag.is_enabled());

    bot.send_message(msg.chat.id, as_html_block("Fleet", &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub(crate) async fn handle_host(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
    host_id: &str,
) -> ResponseResult<()> {
    let host_id = host_id.trim();
    if host_id.is_empty() {
        bot.send_message(
            msg.chat.id,
            as_html_block("Host", "Usage: /host <id>"),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    }

    let view = {
        let state = app_context.engine.state().lock().await;
        state
            .host(host_id)
            .map(|host| HostView::from_host(host, &state))
    };
    let Some(view) = view else {
        bot.send_message(
            msg.chat.id,
            as_html_block("Host not found", &format!("No host with id {:?}.", host_id)),
        )
        .parse_mode(ParseMode::Html)
        .await?;
        return Ok(());
    };

    let history = if view.status == Status::Offline {
        None
    } else {
        match app_context
            .engine
            .host_cpu_history(host_id, HISTORY_WINDOW_SECS, HISTORY_STEP_SECS)
            .await
        {
            Ok(points) => CpuSummary::from_points(&points),
            Err(EngineError::UnknownHost(_)) => None,
            Err(error) => {
                log::warn!("cpu_history_failed host={} error={}", host_id, error);
                None
            }
        }
    };

    bot.send_message(
        msg.chat.id,
        as_html_block(&format!("Host {}", view.name), &host_detail(&view, history)),
    )
    .parse_mode(ParseMode::Html)
    .await?;

    Ok(())
}

pub(crate) async fn handle_refresh(
    bot: &Bot,
    msg: &Message,
    app_context: &AppContext,
) -> ResponseResult<()> {
    let (title, body) = match app_context.refresh_inventory().await {
        Ok(count) => (
            "Inventory refreshed",
            format!("Loaded {} hosts. Metrics update on the next cycle.", count),
        ),
        Err(error) => {
            log::warn!("inventory_refresh_failed error={}", error);
            (
                "Inventory refresh failed",
                format!("{}\n\nThe previous inventory is still active.", error),
            )
        }
    };

    bot.send_message(msg.chat.id, as_html_block(title, &body))
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

fn marker(status: Status) -> &'static str {
    match status {
        Status::Critical => "🔴",
        Status::Warning => "🟠",
        Status::Healthy => "🟢",
        Status::Offline => "⚫",
    }
}

fn host_line(view: &HostView) -> String {
    let metrics = &view.metrics;
    format!(
        "{} {} [{}] cpu {} mem {} disk {}",
        marker(view.status),
        view.name,
        view.id,
        percent(metrics.cpu_percent),
        percent(metrics.memory_percent),
        percent(metrics.disk_percent)
    )
}

pub(crate) fn fleet_summary(frame: &FleetFrame, remote_alerts: bool) -> String {
    let stats = frame.stats;
    let mut body = format!(
        "Hosts: {} (critical {}, warning {}, healthy {}, offline {})\nView: rows={} status={} group={}\nRemote alerts: {}\n",
        stats.total,
        stats.critical,
        stats.warning,
        stats.healthy,
        stats.offline,
        frame.rows,
        frame.status_filter.map_or("all", Status::as_str),
        frame.group_filter.as_deref().unwrap_or("all"),
        if remote_alerts { "on" } else { "off" },
    );
    let _ = writeln!(body, "{}", describe_scroll(&frame.scroll));

    let pinned = frame.pinned.len();
    if pinned > 0 {
        body.push_str("\nNeeds attention:\n");
        for view in frame.hosts.iter().take(pinned) {
            let _ = writeln!(body, "{}", host_line(view));
        }
    }

    if !frame.scrolling.is_empty() {
        body.push_str(if pinned > 0 { "\nOthers:\n" } else { "\nHosts:\n" });
        for view in frame.hosts.iter().skip(pinned) {
            let _ = writeln!(body, "{}", host_line(view));
        }
    }

    if frame.hosts.is_empty() {
        body.push_str("\nNo hosts match the current view.\n");
    }

    if !frame.toasts.is_empty() {
        body.push_str("\nRecent:\n");
        for toast in &frame.toasts {
            let _ = writeln!(body, "{} {} ({})", toast.label, toast.host_name, toast.host_id);
        }
    }

    body
}

pub(crate) fn host_detail(view: &HostView, history: Option<CpuSummary>) -> String {
    let metrics = &view.metrics;
    let group = if view.group.is_empty() { "--" } else { view.group.as_str() };
    let mut body = format!(
        "Id: {}\nGroup: {}\nStatus: {} {}\n\nCPU    {} {}\nMemory {} {} ({} / {})\nDisk   {} {} ({} / {})\n\nNetwork in:  {}\nNetwork out: {}\nDisk read:   {}\nDisk write:  {}\nLoad: {} {} {}\nUptime: {}\n",
        view.id,
        group,
        marker(view.status),
        view.status,
        bar(metrics.cpu_percent),
        percent(metrics.cpu_percent),
        bar(metrics.memory_percent),
        percent(metrics.memory_percent),
        bytes(metrics.memory_used_bytes),
        bytes(metrics.memory_total_bytes),
        bar(metrics.disk_percent),
        percent(metrics.disk_percent),
        bytes(metrics.disk_used_bytes),
        bytes(metrics.disk_total_bytes),
        rate(metrics.network_in_bps),
        rate(metrics.network_out_bps),
        rate(metrics.disk_read_bps),
        rate(metrics.disk_write_bps),
        number(metrics.load1),
        number(metrics.load5),
        number(metrics.load15),
        uptime(view.uptime),
    );

    match history {
        Some(summary) => {
            let _ = write!(
                body,
                "\nCPU last hour: min {:.1}% avg {:.1}% max {:.1}% ({} points)",
                summary.min, summary.avg, summary.max, summary.points
            );
        }
        None => body.push_str("\nCPU last hour: --"),
    }

    body
}
