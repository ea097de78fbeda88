use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;

use super::{MetricSource, QueryResult, RangePoint, RangeWindow, Sample, SourceError};

/// HTTP client for the Prometheus query API.
#[derive(Debug, Clone)]
pub struct PrometheusSource {
    http: reqwest::Client,
    base_url: String,
}

impl PrometheusSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<(u16, String), SourceError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl MetricSource for PrometheusSource {
    async fn instant(&self, query: &str) -> Result<QueryResult, SourceError> {
        let (status, body) = self
            .fetch("/api/v1/query", &[("query", query.to_string())])
            .await?;
        with_http_status(status, decode_instant(&body))
    }

    async fn range(&self, query: &str, window: RangeWindow) -> Result<Vec<RangePoint>, SourceError> {
        let params = [
            ("query", query.to_string()),
            ("start", window.start.to_string()),
            ("end", window.end.to_string()),
            ("step", window.step_secs.to_string()),
        ];
        let (status, body) = self.fetch("/api/v1/query_range", &params).await?;
        with_http_status(status, decode_range(&body))
    }
}

/// Error bodies carry an API message; anything else non-2xx reports the bare status.
fn with_http_status<T>(status: u16, decoded: Result<T, SourceError>) -> Result<T, SourceError> {
    match decoded {
        Err(SourceError::Decode(_)) if !(200..300).contains(&status) => {
            Err(SourceError::HttpStatus { status })
        }
        other => other,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    status: String,
    #[serde(default)]
    data: Option<ApiData>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
enum ApiData {
    Vector(Vec<VectorSeries>),
    Matrix(Vec<MatrixSeries>),
    Scalar((f64, String)),
    String((f64, String)),
}

#[derive(Debug, Deserialize)]
struct VectorSeries {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: (f64, String),
}

#[derive(Debug, Deserialize)]
struct MatrixSeries {
    #[serde(default)]
    values: Vec<(f64, String)>,
}

fn unwrap_data(body: &str) -> Result<Option<ApiData>, SourceError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.status != "success" {
        return Err(SourceError::Api {
            error_type: response.error_type.unwrap_or_else(|| "unknown".to_string()),
            message: response.error.unwrap_or_default(),
        });
    }
    Ok(response.data)
}

pub(crate) fn parse_value(raw: &str) -> Result<f64, SourceError> {
    match raw {
        "NaN" => Ok(f64::NAN),
        "+Inf" | "Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|_| SourceError::InvalidValue(other.to_string())),
    }
}

pub(crate) fn decode_instant(body: &str) -> Result<QueryResult, SourceError> {
    match unwrap_data(body)? {
        None => Ok(QueryResult::Empty),
        Some(ApiData::Scalar((_, raw))) => Ok(QueryResult::Scalar(parse_value(&raw)?)),
        Some(ApiData::Vector(series)) if series.is_empty() => Ok(QueryResult::Empty),
        Some(ApiData::Vector(series)) => {
            let samples = series
                .into_iter()
                .map(|entry| {
                    Ok(Sample {
                        labels: entry.metric,
                        value: parse_value(&entry.value.1)?,
                    })
                })
                .collect::<Result<Vec<_>, SourceError>>()?;
            Ok(QueryResult::Vector(samples))
        }
        Some(ApiData::Matrix(_)) => Err(SourceError::UnexpectedResult("matrix".to_string())),
        Some(ApiData::String(_)) => Err(SourceError::UnexpectedResult("string".to_string())),
    }
}

/// Only the first series is kept; range queries here are always aggregated.
pub(crate) fn decode_range(body: &str) -> Result<Vec<RangePoint>, SourceError> {
    match unwrap_data(body)? {
        None => Ok(Vec::new()),
        Some(ApiData::Matrix(series)) => match series.into_iter().next() {
            None => Ok(Vec::new()),
            Some(first) => first
                .values
                .into_iter()
                .map(|(timestamp, raw)| {
                    Ok(RangePoint {
                        timestamp,
                        value: parse_value(&raw)?,
                    })
                })
                .collect(),
        },
        Some(ApiData::Vector(_)) => Err(SourceError::UnexpectedResult("vector".to_string())),
        Some(ApiData::Scalar(_)) => Err(SourceError::UnexpectedResult("scalar".to_string())),
        Some(ApiData::String(_)) => Err(SourceError::UnexpectedResult("string".to_string())),
    }
}
