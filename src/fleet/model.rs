use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::classifier::classify;

/// Discrete health state of a host.
///
/// Variant order is the display order: critical hosts sort first, offline last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Critical,
    Warning,
    Healthy,
    Offline,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Critical => "critical",
            Status::Warning => "warning",
            Status::Healthy => "healthy",
            Status::Offline => "offline",
        }
    }

    /// Statuses that keep a host pinned outside the scrolling track.
    pub fn needs_attention(self) -> bool {
        matches!(self, Status::Critical | Status::Warning)
    }

    /// Statuses whose entry raises an alert.
    pub fn is_alerting(self) -> bool {
        matches!(self, Status::Critical | Status::Warning | Status::Offline)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Status::Critical),
            "warning" => Ok(Status::Warning),
            "healthy" => Ok(Status::Healthy),
            "offline" => Ok(Status::Offline),
            other => Err(format!("unknown status {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cpu: ThresholdPair,
    pub memory: ThresholdPair,
    pub disk: ThresholdPair,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: ThresholdPair {
                warning: 80.0,
                critical: 90.0,
            },
            memory: ThresholdPair {
                warning: 80.0,
                critical: 90.0,
            },
            disk: ThresholdPair {
                warning: 80.0,
                critical: 90.0,
            },
        }
    }
}

/// One normalized snapshot of a host. `None` always means "no data", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMetrics {
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    pub memory_used_bytes: Option<f64>,
    pub memory_total_bytes: Option<f64>,
    pub disk_used_bytes: Option<f64>,
    pub disk_total_bytes: Option<f64>,
    pub network_in_bps: Option<f64>,
    pub network_out_bps: Option<f64>,
    pub disk_read_bps: Option<f64>,
    pub disk_write_bps: Option<f64>,
    pub load1: Option<f64>,
    pub load5: Option<f64>,
    pub load15: Option<f64>,
    pub uptime_seconds: Option<f64>,
    pub online: bool,
}

impl HostMetrics {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn uptime(&self) -> Option<Uptime> {
        self.uptime_seconds.and_then(Uptime::from_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Uptime {
    pub seconds: u64,
    pub days: u64,
    pub hours: u64,
}

impl Uptime {
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }

        let seconds = seconds.floor() as u64;
        Some(Self {
            seconds,
            days: seconds / 86_400,
            hours: (seconds % 86_400) / 3_600,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostIdentity {
    pub id: String,
    #[serde(default, alias = "name")]
    pub display_name: String,
    #[serde(default, alias = "project")]
    pub group_label: String,
    #[serde(alias = "instance")]
    pub query_target: String,
}

/// A fleet member: fixed identity plus the last observation and its derived status.
#[derive(Debug, Clone)]
pub struct Host {
    identity: HostIdentity,
    metrics: HostMetrics,
    status: Status,
}

impl Host {
    pub fn new(identity: HostIdentity) -> Self {
        Self {
            identity,
            metrics: HostMetrics::offline(),
            status: Status::Offline,
        }
    }

    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn display_name(&self) -> &str {
        &self.identity.display_name
    }

    pub fn group_label(&self) -> &str {
        &self.identity.group_label
    }

    pub fn query_target(&self) -> &str {
        &self.identity.query_target
    }

    pub fn metrics(&self) -> &HostMetrics {
        &self.metrics
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Stores a fresh observation; the status is always re-derived from it.
    pub fn observe(&mut self, metrics: HostMetrics, thresholds: &Thresholds) -> Status {
        self.status = classify(&metrics, thresholds);
        self.metrics = metrics;
        self.status
    }
}
