use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::{
    Location,
    error::{ParseError, Result},
    model::{Condition, ForecastPoint},
    provider::{ForecastProvider, ProviderId, fetch_body, http_client},
};

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";

/// OpenWeather 5 day / 3 hour forecast.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_API_BASE, timeout)
    }

    pub fn with_base_url(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api_key,
            http: http_client(ProviderId::OpenWeather, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn parse_forecast(body: &str) -> Result<Vec<ForecastPoint>> {
    let parsed: OwForecastResponse =
        serde_json::from_str(body).map_err(|source| ParseError::Json {
            provider: ProviderId::OpenWeather,
            source,
        })?;

    parsed
        .list
        .into_iter()
        .map(|entry| -> Result<ForecastPoint> {
            let time = unix_to_utc(entry.dt).ok_or(ParseError::Timestamp {
                provider: ProviderId::OpenWeather,
                value: entry.dt,
            })?;

            let condition = match entry.weather.first() {
                Some(w) => Condition::Id(w.id),
                None => {
                    warn!(dt = entry.dt, "forecast entry without weather condition");
                    Condition::Unknown
                }
            };

            Ok(ForecastPoint {
                time,
                air_temperature: entry.main.temp,
                wind_speed: entry.wind.speed,
                condition,
            })
        })
        .collect()
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_forecast(&self, location: &Location) -> Result<Vec<ForecastPoint>> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        tracing::debug!(%url, "requesting OpenWeather forecast");

        let request = self.http.get(&url).query(&[
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]);
        let body = fetch_body(ProviderId::OpenWeather, self.timeout, request).await?;

        let points = parse_forecast(&body)?;
        tracing::debug!(points = points.len(), "parsed OpenWeather forecast list");
        Ok(points)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, NetworkError};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "cod": "200",
            "cnt": 2,
            "list": [
                {
                    "dt": 1792303200,
                    "main": {"temp": 11.2, "feels_like": 10.1, "humidity": 80},
                    "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
                    "wind": {"speed": 9.3, "deg": 240}
                },
                {
                    "dt": 1792314000,
                    "main": {"temp": 13.0, "feels_like": 12.4, "humidity": 71},
                    "weather": [],
                    "wind": {"speed": 4.0, "deg": 250}
                }
            ],
            "city": {"name": "Prague", "country": "CZ"}
        })
    }

    #[tokio::test]
    async fn fetches_and_maps_forecast_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .and(query_param("lat", "50.08"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&mock_server)
            .await;

        let provider = OpenWeatherProvider::with_base_url(
            "KEY".into(),
            &mock_server.uri(),
            Duration::from_secs(5),
        )
        .unwrap();
        let location = Location::new(50.08, 14.42, Some(235)).unwrap();
        let points = provider.fetch_forecast(&location).await.unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time.timestamp(), 1792303200);
        assert_eq!(points[0].air_temperature, 11.2);
        assert_eq!(points[0].wind_speed, 9.3);
        assert_eq!(points[0].condition, Condition::Id(500));
        assert_eq!(points[1].condition, Condition::Unknown);
    }

    #[tokio::test]
    async fn unauthorized_is_a_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&mock_server)
            .await;

        let provider = OpenWeatherProvider::with_base_url(
            "BAD".into(),
            &mock_server.uri(),
            Duration::from_secs(5),
        )
        .unwrap();
        let location = Location::new(50.08, 14.42, None).unwrap();
        let err = provider.fetch_forecast(&location).await.unwrap_err();

        assert!(matches!(err, Error::Network(NetworkError::Status { .. })));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn out_of_range_timestamp_is_a_parse_error() {
        let body = serde_json::json!({
            "list": [{
                "dt": i64::MAX,
                "main": {"temp": 1.0},
                "weather": [{"id": 800}],
                "wind": {"speed": 1.0}
            }]
        })
        .to_string();

        let err = parse_forecast(&body).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Timestamp { .. })));
    }

    #[test]
    fn missing_list_is_a_parse_error() {
        let err = parse_forecast(r#"{"cod": "200"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Json { .. })));
    }
}
