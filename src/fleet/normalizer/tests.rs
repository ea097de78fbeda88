use super::{CpuSummary, collect_host_metrics, cpu_history};
use crate::fleet::{
    clock::FixedClock,
    source::{FakeSource, QueryResult, RangePoint, sample},
};

const TARGET: &str = "10.0.0.7:9100";

fn alive() -> FakeSource {
    FakeSource::new().with_value("up{", 1.0)
}

#[tokio::test]
async fn dead_host_is_offline_without_further_queries() {
    let source = FakeSource::new()
        .with_value("up{", 0.0)
        .with_value("node_cpu_seconds_total", 99.0);
    let clock = FixedClock::at_unix(1_700_000_000);

    let metrics = collect_host_metrics(&source, &clock, TARGET).await;

    assert!(!metrics.online);
    assert_eq!(metrics.cpu_percent, None);
    assert_eq!(source.calls().len(), 1);
}

#[tokio::test]
async fn liveness_failure_fails_closed() {
    let source = FakeSource::new().failing("up{");
    let clock = FixedClock::at_unix(1_700_000_000);

    let metrics = collect_host_metrics(&source, &clock, TARGET).await;

    assert!(!metrics.online);
    assert_eq!(source.calls().len(), 1);
}

#[tokio::test]
async fn missing_liveness_result_is_offline() {
    let source = FakeSource::new().with_value("node_load1{", 0.5);
    let clock = FixedClock::at_unix(1_700_000_000);

    assert!(!collect_host_metrics(&source, &clock, TARGET).await.online);
}

#[tokio::test]
async fn alive_host_is_fully_normalized() {
    let source = alive()
        .with_value("node_cpu_seconds_total", 42.5)
        .with_value("node_memory_MemTotal_bytes", 8_000.0)
        .with_value("node_memory_MemAvailable_bytes", 2_000.0)
        .with(
            "node_filesystem_size_bytes",
            QueryResult::Vector(vec![
                sample(&[("mountpoint", "/"), ("device", "sda1")], 1_000.0),
                sample(&[("mountpoint", "/var"), ("device", "sda2")], 1_000.0),
            ]),
        )
        .with(
            "node_filesystem_avail_bytes",
            QueryResult::Vector(vec![
                sample(&[("mountpoint", "/"), ("device", "sda1")], 700.0),
                sample(&[("mountpoint", "/var"), ("device", "sda2")], 100.0),
            ]),
        )
        .with(
            "node_network_receive_bytes_total",
            QueryResult::Vector(vec![
                sample(&[("device", "eth0")], 300.0),
                sample(&[("device", "eth1")], 200.0),
            ]),
        )
        .with(
            "node_network_transmit_bytes_total",
            QueryResult::Vector(vec![sample(&[("device", "eth0")], 125.0)]),
        )
        .with(
            "node_disk_read_bytes_total",
            QueryResult::Vector(vec![sample(&[("device", "sda")], 64.0)]),
        )
        .with(
            "node_disk_written_bytes_total",
            QueryResult::Vector(vec![sample(&[("device", "sda")], 32.0)]),
        )
        .with_value("node_load1{", 0.5)
        .with_value("node_load5{", 0.25)
        .with_value("node_load15{", 0.125)
        .with_value("node_boot_time_seconds", 1_700_000_000.0 - 90_000.0);
    let clock = FixedClock::at_unix(1_700_000_000);

    let metrics = collect_host_metrics(&source, &clock, TARGET).await;

    assert!(metrics.online);
    assert_eq!(metrics.cpu_percent, Some(42.5));
    assert_eq!(metrics.memory_percent, Some(75.0));
    assert_eq!(metrics.memory_used_bytes, Some(6_000.0));
    assert_eq!(metrics.disk_percent, Some(90.0));
    assert_eq!(metrics.disk_used_bytes, Some(900.0));
    assert_eq!(metrics.network_in_bps, Some(500.0));
    assert_eq!(metrics.network_out_bps, Some(125.0));
    assert_eq!(metrics.disk_read_bps, Some(64.0));
    assert_eq!(metrics.disk_write_bps, Some(32.0));
    assert_eq!(metrics.load1, Some(0.5));
    assert_eq!(metrics.load15, Some(0.125));
    assert_eq!(metrics.uptime_seconds, Some(90_000.0));

    let uptime = metrics.uptime().expect("uptime");
    assert_eq!(uptime.days, 1);
    assert_eq!(uptime.hours, 1);
}

#[tokio::test]
async fn failed_sub_query_only_blanks_its_field() {
    let source = alive()
        .failing("node_cpu_seconds_total")
        .with_value("node_memory_MemTotal_bytes", 100.0)
        .with_value("node_memory_MemAvailable_bytes", 60.0);
    let clock = FixedClock::at_unix(1_700_000_000);

    let metrics = collect_host_metrics(&source, &clock, TARGET).await;

    assert!(metrics.online);
    assert_eq!(metrics.cpu_percent, None);
    assert_eq!(metrics.memory_percent, Some(40.0));
    assert_eq!(metrics.disk_percent, None);
    assert_eq!(metrics.network_in_bps, None);
}

#[tokio::test]
async fn partial_network_series_still_sum() {
    let source = alive().with(
        "node_network_receive_bytes_total",
        QueryResult::Vector(vec![
            sample(&[("device", "eth0")], f64::NAN),
            sample(&[("device", "eth1")], 80.0),
        ]),
    );
    let clock = FixedClock::at_unix(1_700_000_000);

    let metrics = collect_host_metrics(&source, &clock, TARGET).await;

    assert_eq!(metrics.network_in_bps, Some(80.0));
    assert_eq!(metrics.network_out_bps, None);
}

#[tokio::test]
async fn cpu_is_clamped_and_future_boot_gives_zero_uptime() {
    let source = alive()
        .with_value("node_cpu_seconds_total", 100.4)
        .with_value("node_boot_time_seconds", 1_700_000_100.0);
    let clock = FixedClock::at_unix(1_700_000_000);

    let metrics = collect_host_metrics(&source, &clock, TARGET).await;

    assert_eq!(metrics.cpu_percent, Some(100.0));
    assert_eq!(metrics.uptime_seconds, Some(0.0));
}

#[tokio::test]
async fn cpu_history_drops_non_finite_points() {
    let source = FakeSource::new().with_range(
        "node_cpu_seconds_total",
        vec![
            RangePoint {
                timestamp: 10.0,
                value: 20.0,
            },
            RangePoint {
                timestamp: 70.0,
                value: f64::NAN,
            },
            RangePoint {
                timestamp: 130.0,
                value: 40.0,
            },
        ],
    );
    let clock = FixedClock::at_unix(3_600);

    let points = cpu_history(&source, &clock, TARGET, 3_600, 60)
        .await
        .expect("history");

    assert_eq!(points.len(), 2);
    let summary = CpuSummary::from_points(&points).expect("summary");
    assert_eq!(summary.min, 20.0);
    assert_eq!(summary.max, 40.0);
    assert_eq!(summary.avg, 30.0);
    assert_eq!(summary.points, 2);
}

#[test]
fn empty_history_has_no_summary() {
    assert!(CpuSummary::from_points(&[]).is_none());
}
