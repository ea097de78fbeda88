use serde::Serialize;

use super::model::{HostMetrics, Status, ThresholdPair, Thresholds};

/// Per-metric severity, used to colour a single gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricLevel {
    Unknown,
    Normal,
    Warning,
    Critical,
}

pub fn classify(metrics: &HostMetrics, thresholds: &Thresholds) -> Status {
    if !metrics.online {
        return Status::Offline;
    }

    let readings = [
        (metrics.cpu_percent, thresholds.cpu),
        (metrics.memory_percent, thresholds.memory),
        (metrics.disk_percent, thresholds.disk),
    ];

    if readings
        .iter()
        .any(|(value, pair)| value.is_some_and(|value| value >= pair.critical))
    {
        return Status::Critical;
    }

    if readings
        .iter()
        .any(|(value, pair)| value.is_some_and(|value| value >= pair.warning))
    {
        return Status::Warning;
    }

    Status::Healthy
}

pub fn metric_level(value: Option<f64>, pair: ThresholdPair) -> MetricLevel {
    match value {
        None => MetricLevel::Unknown,
        Some(value) if value >= pair.critical => MetricLevel::Critical,
        Some(value) if value >= pair.warning => MetricLevel::Warning,
        Some(_) => MetricLevel::Normal,
    }
}
