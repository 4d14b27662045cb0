use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    Location,
    error::{ParseError, Result},
    model::{Condition, ForecastPoint},
    provider::{ForecastProvider, ProviderId, fetch_body, http_client},
};

const METNO_API_BASE: &str = "https://api.met.no";

/// Norwegian Meteorological Institute Locationforecast 2.0 (compact).
///
/// No API key is needed, but every request must identify the client through its
/// `User-Agent`.
#[derive(Debug, Clone)]
pub struct MetNoProvider {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl MetNoProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(METNO_API_BASE, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(ProviderId::MetNo, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn query(location: &Location) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("lat", format!("{:.4}", location.latitude)),
            ("lon", format!("{:.4}", location.longitude)),
        ];
        if let Some(altitude) = location.altitude {
            query.push(("altitude", altitude.to_string()));
        }
        query
    }
}

#[derive(Debug, Deserialize)]
struct MetForecastResponse {
    properties: MetProperties,
}

#[derive(Debug, Deserialize)]
struct MetProperties {
    timeseries: Vec<MetTimestep>,
}

#[derive(Debug, Deserialize)]
struct MetTimestep {
    time: DateTime<Utc>,
    data: MetData,
}

#[derive(Debug, Deserialize)]
struct MetData {
    instant: MetInstant,
    next_12_hours: Option<MetPeriod>,
}

#[derive(Debug, Deserialize)]
struct MetInstant {
    details: MetInstantDetails,
}

#[derive(Debug, Deserialize)]
struct MetInstantDetails {
    air_temperature: f64,
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct MetPeriod {
    summary: MetSummary,
}

#[derive(Debug, Deserialize)]
struct MetSummary {
    symbol_code: String,
}

impl From<MetTimestep> for ForecastPoint {
    fn from(step: MetTimestep) -> Self {
        let condition = step
            .data
            .next_12_hours
            .map(|period| Condition::Symbol(period.summary.symbol_code))
            .unwrap_or(Condition::Unknown);

        ForecastPoint {
            time: step.time,
            air_temperature: step.data.instant.details.air_temperature,
            wind_speed: step.data.instant.details.wind_speed,
            condition,
        }
    }
}

fn parse_forecast(body: &str) -> Result<Vec<ForecastPoint>> {
    let parsed: MetForecastResponse =
        serde_json::from_str(body).map_err(|source| ParseError::Json {
            provider: ProviderId::MetNo,
            source,
        })?;

    Ok(parsed
        .properties
        .timeseries
        .into_iter()
        .map(ForecastPoint::from)
        .collect())
}

#[async_trait]
impl ForecastProvider for MetNoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::MetNo
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_forecast(&self, location: &Location) -> Result<Vec<ForecastPoint>> {
        let url = format!("{}/weatherapi/locationforecast/2.0/compact", self.base_url);
        tracing::debug!(%url, "requesting met.no forecast");

        let request = self.http.get(&url).query(&Self::query(location));
        let body = fetch_body(ProviderId::MetNo, self.timeout, request).await?;

        let points = parse_forecast(&body)?;
        tracing::debug!(points = points.len(), "parsed met.no timeseries");
        Ok(points)
    }
}
