use std::{collections::BTreeMap, future::Future};

use thiserror::Error;

mod prometheus;

pub use prometheus::PrometheusSource;

/// One series of an instant-vector result.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}

impl Sample {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Scalar(f64),
    Vector(Vec<Sample>),
    Empty,
}

impl QueryResult {
    /// The scalar, or the value of the first series.
    pub fn first_value(&self) -> Option<f64> {
        match self {
            QueryResult::Scalar(value) => Some(*value),
            QueryResult::Vector(samples) => samples.first().map(|sample| sample.value),
            QueryResult::Empty => None,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        match self {
            QueryResult::Vector(samples) => samples,
            QueryResult::Scalar(_) | QueryResult::Empty => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangePoint {
    pub timestamp: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeWindow {
    pub start: f64,
    pub end: f64,
    pub step_secs: u64,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("metric source request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("metric source returned HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("metric query rejected ({error_type}): {message}")]
    Api { error_type: String, message: String },
    #[error("failed to decode metric response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected result type {0}")]
    UnexpectedResult(String),
    #[error("invalid sample value {0:?}")]
    InvalidValue(String),
}

/// Read side of a metrics backend. Implementations must be usable concurrently.
pub trait MetricSource: Send + Sync {
    fn instant(&self, query: &str)
    -> impl Future<Output = Result<QueryResult, SourceError>> + Send;

    fn range(
        &self,
        query: &str,
        window: RangeWindow,
    ) -> impl Future<Output = Result<Vec<RangePoint>, SourceError>> + Send;
}

#[cfg(test)]
#[derive(Debug, Clone)]
enum FakeReply {
    Value(QueryResult),
    Range(Vec<RangePoint>),
    Fail,
}

/// Canned responses keyed by a substring of the query; unmatched queries return `Empty`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    replies: Vec<(String, FakeReply)>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, needle: &str, result: QueryResult) -> Self {
        self.replies
            .push((needle.to_string(), FakeReply::Value(result)));
        self
    }

    pub(crate) fn with_value(self, needle: &str, value: f64) -> Self {
        self.with(needle, QueryResult::Scalar(value))
    }

    pub(crate) fn with_range(mut self, needle: &str, points: Vec<RangePoint>) -> Self {
        self.replies.push((needle.to_string(), FakeReply::Range(points)));
        self
    }

    pub(crate) fn failing(mut self, needle: &str) -> Self {
        self.replies.push((needle.to_string(), FakeReply::Fail));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn reply_for(&self, query: &str) -> Option<FakeReply> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.to_string());
        }
        self.replies
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
    }

    fn injected_failure() -> SourceError {
        SourceError::Api {
            error_type: "injected".to_string(),
            message: "fake source failure".to_string(),
        }
    }
}

#[cfg(test)]
impl MetricSource for FakeSource {
    async fn instant(&self, query: &str) -> Result<QueryResult, SourceError> {
        match self.reply_for(query) {
            Some(FakeReply::Value(result)) => Ok(result),
            Some(FakeReply::Fail) => Err(Self::injected_failure()),
            Some(FakeReply::Range(_)) | None => Ok(QueryResult::Empty),
        }
    }

    async fn range(&self, query: &str, _window: RangeWindow) -> Result<Vec<RangePoint>, SourceError> {
        match self.reply_for(query) {
            Some(FakeReply::Range(points)) => Ok(points),
            Some(FakeReply::Fail) => Err(Self::injected_failure()),
            Some(FakeReply::Value(_)) | None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(labels: &[(&str, &str)], value: f64) -> Sample {
    Sample {
        labels: labels
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        value,
    }
}
