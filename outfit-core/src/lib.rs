//! Core library for the `outfit` CLI.
//!
//! This crate defines:
//! - Configuration handling (location, provider credentials)
//! - Abstraction over forecast providers
//! - Selection of the representative forecast points of a day
//! - The rules that turn those points into a clothing recommendation
//!
//! It is used by `outfit-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod decision;
pub mod error;
pub mod model;
pub mod provider;
pub mod rain;
pub mod selector;
pub mod summary;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

pub use config::{Config, ProviderConfig};
pub use error::{ConfigError, Error, NetworkError, ParseError, Result};
pub use model::{
    ClothingSummary, Condition, DayPart, DaySelection, ForecastPoint, JacketLevel, Location,
    RainLevel, RainScale, TrouserWeight, WeatherSummary, WindLevel,
};
pub use provider::{ForecastProvider, ProviderId};

/// Everything the report needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub provider: ProviderId,
    pub day: NaiveDate,
    pub weather: WeatherSummary,
    pub rain_scale: RainScale,
    pub clothing: ClothingSummary,
}

/// Run the pipeline on an already fetched forecast.
pub fn recommend_from_points<Tz: TimeZone>(
    provider: ProviderId,
    points: &[ForecastPoint],
    now: &DateTime<Tz>,
) -> Result<Recommendation> {
    let profile = provider.profile();

    let selection = selector::select_day(points, now, &profile.selection)?;
    let weather = summary::summarize(&selection, profile.rain);
    let clothing = decision::decide(&weather, &profile.clothing);

    tracing::debug!(?weather, ?clothing, "decided clothing");

    Ok(Recommendation {
        provider,
        day: selection.day,
        weather,
        rain_scale: profile.rain.scale(),
        clothing,
    })
}

/// Fetch the forecast for `location` and turn it into a recommendation for the
/// next relevant day in the local time zone.
pub async fn recommend(
    provider: &dyn ForecastProvider,
    location: &Location,
) -> Result<Recommendation> {
    let points = provider.fetch_forecast(location).await?;
    recommend_from_points(provider.id(), &points, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    fn point(day: u32, hour: u32, temp: f64, wind: f64, condition: Condition) -> ForecastPoint {
        ForecastPoint {
            time: cet()
                .with_ymd_and_hms(2026, 10, day, hour, 0, 0)
                .single()
                .unwrap()
                .with_timezone(&Utc),
            air_temperature: temp,
            wind_speed: wind,
            condition,
        }
    }

    #[test]
    fn metno_feed_end_to_end() {
        let symbol = |s: &str| Condition::Symbol(s.to_string());
        let points: Vec<_> = (0..24)
            .map(|h| point(19, h, 5.0 + h as f64 / 2.0, 3.0, symbol("cloudy")))
            .chain(std::iter::once(point(20, 7, -3.0, 20.0, symbol("heavyrain"))))
            .collect();
        // evening: tomorrow's forecast
        let now = cet().with_ymd_and_hms(2026, 10, 18, 21, 30, 0).single().unwrap();

        let rec = recommend_from_points(ProviderId::MetNo, &points, &now).unwrap();

        assert_eq!(rec.day, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(rec.weather.temperatures, [8.5, 11.0, 12.5]);
        assert_eq!(rec.weather.rain, RainLevel::Cloudy);
        assert_eq!(rec.rain_scale, RainScale::FourLevel);
        assert_eq!(
            rec.clothing,
            ClothingSummary {
                hoodie: true,
                jacket: JacketLevel::Light,
                trousers: TrouserWeight::Regular,
            }
        );
    }

    /// OpenWeather's 3 hour grid: UTC 00, 03, ... over two days.
    fn utc_grid() -> Vec<ForecastPoint> {
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).single().unwrap();
        (0..16)
            .map(|slot| ForecastPoint {
                time: start + chrono::TimeDelta::hours(3 * slot),
                air_temperature: 10.0 + slot as f64,
                wind_speed: 10.0,
                condition: Condition::Id(500),
            })
            .collect()
    }

    #[test]
    fn openweather_feed_end_to_end() {
        let now = cet().with_ymd_and_hms(2026, 10, 18, 5, 0, 0).single().unwrap();

        let rec = recommend_from_points(ProviderId::OpenWeather, &utc_grid(), &now).unwrap();

        assert_eq!(rec.day, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        // local 07:00, 13:00 and 16:00
        assert_eq!(rec.weather.temperatures, [12.0, 14.0, 15.0]);
        assert_eq!(rec.weather.wind, WindLevel::Moderate);
        // 500 three times in a row: drizzle, reset, drizzle
        assert_eq!(rec.weather.rain, RainLevel::Drizzle);
        assert_eq!(rec.rain_scale, RainScale::ThreeLevel);
        assert_eq!(
            rec.clothing,
            ClothingSummary {
                hoodie: true,
                jacket: JacketLevel::Light,
                trousers: TrouserWeight::Regular,
            }
        );
    }

    #[test]
    fn openweather_grid_is_usable_in_any_offset() {
        let cases = [
            (0, [12.0, 14.0, 15.0]),
            (1, [12.0, 14.0, 15.0]),
            (2, [11.0, 13.0, 14.0]),
            (3, [11.0, 13.0, 14.0]),
            (-5, [14.0, 16.0, 17.0]),
        ];

        for (offset_hours, temperatures) in cases {
            let tz = FixedOffset::east_opt(offset_hours * 3600).unwrap();
            let now = tz.with_ymd_and_hms(2026, 10, 18, 3, 0, 0).single().unwrap();

            let rec = recommend_from_points(ProviderId::OpenWeather, &utc_grid(), &now)
                .unwrap_or_else(|e| panic!("UTC{offset_hours:+}: {e}"));

            assert_eq!(rec.day, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
            assert_eq!(
                rec.weather.temperatures, temperatures,
                "UTC{offset_hours:+}"
            );
        }
    }

    #[test]
    fn short_feed_fails_instead_of_guessing() {
        let points = vec![point(18, 7, 10.0, 1.0, Condition::Unknown)];
        let now = cet().with_ymd_and_hms(2026, 10, 18, 6, 0, 0).single().unwrap();

        let err = recommend_from_points(ProviderId::MetNo, &points, &now).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { .. }));
    }
}
