use crate::{
    Config, Location,
    decision::ClothingPolicy,
    error::{ConfigError, NetworkError, Result},
    model::ForecastPoint,
    provider::{metno::MetNoProvider, openweather::OpenWeatherProvider},
    rain::{ConditionIdClassifier, RainClassifier, SymbolCodeClassifier},
    selector::{SelectionPolicy, SlotMatch},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod metno;
pub mod openweather;

/// Request timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    MetNo,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::MetNo => "metno",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::MetNo, ProviderId::OpenWeather]
    }

    pub fn requires_api_key(&self) -> bool {
        match self {
            ProviderId::MetNo => false,
            ProviderId::OpenWeather => true,
        }
    }

    /// How forecasts from this provider are selected, classified and judged.
    pub fn profile(&self) -> ForecastProfile {
        match self {
            ProviderId::MetNo => ForecastProfile {
                selection: SelectionPolicy {
                    cutoff_hour: 7,
                    morning_hour: 7,
                    noon_hour: 12,
                    afternoon_hour: 15,
                    slot_match: SlotMatch::ExactHour,
                },
                rain: &SymbolCodeClassifier,
                clothing: ClothingPolicy::METNO,
            },
            // the 5 day feed is on a 3 hour UTC grid
            ProviderId::OpenWeather => ForecastProfile {
                selection: SelectionPolicy {
                    cutoff_hour: 6,
                    morning_hour: 6,
                    noon_hour: 12,
                    afternoon_hour: 15,
                    slot_match: SlotMatch::Nearest { within_minutes: 90 },
                },
                rain: &ConditionIdClassifier,
                clothing: ClothingPolicy::OPENWEATHER,
            },
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metno" | "met.no" => Ok(ProviderId::MetNo),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(ConfigError::UnknownProvider(value.to_string())),
        }
    }
}

/// Provider-specific policies applied to a fetched forecast.
#[derive(Debug, Clone, Copy)]
pub struct ForecastProfile {
    pub selection: SelectionPolicy,
    pub rain: &'static dyn RainClassifier,
    pub clothing: ClothingPolicy,
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    /// Fetch the provider's forecast timeseries for `location`, in provider order.
    async fn fetch_forecast(&self, location: &Location) -> Result<Vec<ForecastPoint>>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> Result<Box<dyn ForecastProvider>> {
    let timeout = config.timeout()?;

    let boxed: Box<dyn ForecastProvider> = match id {
        ProviderId::MetNo => Box::new(MetNoProvider::new(timeout)?),
        ProviderId::OpenWeather => {
            let api_key = config
                .provider_api_key(id)
                .ok_or(ConfigError::MissingApiKey(id))?;
            Box::new(OpenWeatherProvider::new(api_key.to_owned(), timeout)?)
        }
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

pub(crate) fn http_client(id: ProviderId, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("outfit/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(NetworkError::Client)?;

    tracing::debug!(provider = %id, ?timeout, "built HTTP client");
    Ok(client)
}

/// Send `request` and return the body of a successful response.
pub(crate) async fn fetch_body(
    id: ProviderId,
    timeout: Duration,
    request: reqwest::RequestBuilder,
) -> Result<String> {
    let res = request
        .send()
        .await
        .map_err(|e| NetworkError::from_reqwest(id, timeout, e))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| NetworkError::from_reqwest(id, timeout, e))?;

    if !status.is_success() {
        return Err(NetworkError::Status {
            provider: id,
            status,
            body: truncate_body(&body),
        }
        .into());
    }

    tracing::debug!(provider = %id, %status, bytes = body.len(), "received forecast");
    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
