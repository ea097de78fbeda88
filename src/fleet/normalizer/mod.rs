mod queries;
mod reduce;

#[cfg(test)]
mod tests;

use serde::Serialize;

use super::{
    clock::Clock,
    model::HostMetrics,
    source::{MetricSource, QueryResult, RangePoint, RangeWindow, SourceError},
};

use queries::{HostQueries, cpu_usage_query};
use reduce::{busiest_filesystem, finite, memory_usage, sum_rates};

/// Collects one normalized snapshot for `target`.
///
/// The liveness probe runs first and alone. Anything but a sample equal to 1
/// marks the host offline and skips every other query. Once alive, the
/// remaining queries run concurrently and a failed query only blanks its field.
pub async fn collect_host_metrics<S, C>(source: &S, clock: &C, target: &str) -> HostMetrics
where
    S: MetricSource + ?Sized,
    C: Clock + ?Sized,
{
    let queries = HostQueries::for_target(target);

    let alive = match source.instant(&queries.up).await {
        Ok(result) => result.first_value() == Some(1.0),
        Err(error) => {
            log::warn!("liveness_query_failed target={} error={}", target, error);
            false
        }
    };
    if !alive {
        return HostMetrics::offline();
    }

    let (
        cpu,
        memory_total,
        memory_available,
        filesystem_size,
        filesystem_avail,
        network_in,
        network_out,
        disk_read,
        disk_write,
        load1,
        load5,
        load15,
        boot_time,
    ) = tokio::join!(
        fetch(source, target, "cpu", &queries.cpu),
        fetch(source, target, "memory_total", &queries.memory_total),
        fetch(source, target, "memory_available", &queries.memory_available),
        fetch(source, target, "filesystem_size", &queries.filesystem_size),
        fetch(source, target, "filesystem_avail", &queries.filesystem_avail),
        fetch(source, target, "network_in", &queries.network_in),
        fetch(source, target, "network_out", &queries.network_out),
        fetch(source, target, "disk_read", &queries.disk_read),
        fetch(source, target, "disk_write", &queries.disk_write),
        fetch(source, target, "load1", &queries.load1),
        fetch(source, target, "load5", &queries.load5),
        fetch(source, target, "load15", &queries.load15),
        fetch(source, target, "boot_time", &queries.boot_time),
    );

    let memory = memory_usage(first(&memory_total), first(&memory_available));
    let disk = match (&filesystem_size, &filesystem_avail) {
        (Some(sizes), Some(available)) => busiest_filesystem(sizes.samples(), available.samples()),
        _ => None,
    };
    let now = clock.now_unix();

    HostMetrics {
        cpu_percent: first(&cpu).map(|value| value.clamp(0.0, 100.0)),
        memory_percent: memory.map(|usage| usage.percent),
        disk_percent: disk.map(|usage| usage.percent),
        memory_used_bytes: memory.map(|usage| usage.used_bytes),
        memory_total_bytes: memory.map(|usage| usage.total_bytes),
        disk_used_bytes: disk.map(|usage| usage.used_bytes),
        disk_total_bytes: disk.map(|usage| usage.total_bytes),
        network_in_bps: rates(&network_in),
        network_out_bps: rates(&network_out),
        disk_read_bps: rates(&disk_read),
        disk_write_bps: rates(&disk_write),
        load1: first(&load1),
        load5: first(&load5),
        load15: first(&load15),
        uptime_seconds: first(&boot_time).map(|boot| (now - boot).max(0.0)),
        online: true,
    }
}

async fn fetch<S>(source: &S, target: &str, field: &str, query: &str) -> Option<QueryResult>
where
    S: MetricSource + ?Sized,
{
    match source.instant(query).await {
        Ok(result) => Some(result),
        Err(error) => {
            log::warn!(
                "metric_query_failed target={} field={} error={}",
                target,
                field,
                error
            );
            None
        }
    }
}

fn first(result: &Option<QueryResult>) -> Option<f64> {
    finite(result.as_ref().and_then(QueryResult::first_value))
}

fn rates(result: &Option<QueryResult>) -> Option<f64> {
    result.as_ref().and_then(|result| match result {
        QueryResult::Scalar(value) => finite(Some(*value)),
        QueryResult::Vector(samples) => sum_rates(samples),
        QueryResult::Empty => None,
    })
}

/// CPU usage over the trailing `window_secs`, oldest first. Non-finite points are dropped.
pub async fn cpu_history<S, C>(
    source: &S,
    clock: &C,
    target: &str,
    window_secs: u64,
    step_secs: u64,
) -> Result<Vec<RangePoint>, SourceError>
where
    S: MetricSource + ?Sized,
    C: Clock + ?Sized,
{
    let end = clock.now_unix();
    let window = RangeWindow {
        start: end - window_secs as f64,
        end,
        step_secs: step_secs.max(1),
    };

    let points = source.range(&cpu_usage_query(target), window).await?;
    Ok(points
        .into_iter()
        .filter(|point| point.value.is_finite())
        .map(|point| RangePoint {
            value: point.value.clamp(0.0, 100.0),
            ..point
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub points: usize,
}

impl CpuSummary {
    pub fn from_points(points: &[RangePoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let (min, max, sum) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), point| (min.min(point.value), max.max(point.value), sum + point.value),
        );

        Some(Self {
            min,
            avg: sum / points.len() as f64,
            max,
            points: points.len(),
        })
    }
}
