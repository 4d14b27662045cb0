//! Precipitation classification strategies.
//!
//! Providers describe precipitation differently, and the two schemes below also
//! escalate differently. They are kept apart on purpose; each provider profile
//! picks one.

use std::{collections::HashSet, fmt::Debug, sync::LazyLock};

use crate::model::{Condition, ForecastPoint, RainLevel, RainScale};

pub trait RainClassifier: Send + Sync + Debug {
    /// Scale the resulting level is reported on.
    fn scale(&self) -> RainScale;

    /// Classify the representative points, given in morning, noon, afternoon order.
    fn classify(&self, points: &[&ForecastPoint]) -> RainLevel;
}

/// Symbol codes of the met.no `next_12_hours` summary.
///
/// Only the first point is looked at, since its summary already covers the
/// following twelve hours.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolCodeClassifier;

static CLOUDY_SYMBOLS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "partlycloudy_day",
        "partlycloudy_night",
        "partlycloudy_polartwilight",
        "cloudy",
    ])
});

static DRIZZLE_SYMBOLS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "lightsnowshowers_day",
        "lightsnowshowers_night",
        "lightsnowshowers_polartwilight",
        "lightrainshowers_day",
        "lightrainshowers_night",
        "lightrainshowers_polartwilight",
        "lightsleet",
        "lightsleetshowers_day",
        "lightsleetshowers_night",
        "lightsleetshowers_polartwilight",
        "lightrain",
        "fog",
        "lightrainshowersandthunder_day",
        "lightrainshowersandthunder_night",
        "lightrainshowersandthunder_polartwilight",
        "lightsnowandthunder",
        // met.no spells these with a double "s"
        "lightssleetshowersandthunder_day",
        "lightssleetshowersandthunder_night",
        "lightssleetshowersandthunder_polartwilight",
        "lightsleetandthunder",
    ])
});

static RAIN_SYMBOLS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "heavyrainandthunder",
        "heavysnowandthunder",
        "rainandthunder",
        "heavysleetshowersandthunder_day",
        "heavysleetshowersandthunder_night",
        "heavysleetshowersandthunder_polartwilight",
        "heavysnow",
        "heavyrainshowers_day",
        "heavyrainshowers_night",
        "heavyrainshowers_polartwilight",
        "heavyrain",
        "heavysleetshowers_day",
        "heavysleetshowers_night",
        "heavysleetshowers_polartwilight",
        "snow",
        "heavyrainshowersandthunder_day",
        "heavyrainshowersandthunder_night",
        "heavyrainshowersandthunder_polartwilight",
        "snowshowers_day",
        "snowshowers_night",
        "snowshowers_polartwilight",
        "snowshowersandthunder_day",
        "snowshowersandthunder_night",
        "snowshowersandthunder_polartwilight",
        "heavysleetandthunder",
        "rainshowersandthunder_day",
        "rainshowersandthunder_night",
        "rainshowersandthunder_polartwilight",
        "rain",
        "rainshowers_day",
        "rainshowers_night",
        "rainshowers_polartwilight",
        "sleetandthunder",
        "sleet",
        "sleetshowersandthunder_day",
        "sleetshowersandthunder_night",
        "sleetshowersandthunder_polartwilight",
        "snowandthunder",
        "heavysnowshowersandthunder_day",
        "heavysnowshowersandthunder_night",
        "heavysnowshowersandthunder_polartwilight",
        "heavysnowshowers_day",
        "heavysnowshowers_night",
        "heavysnowshowers_polartwilight",
    ])
});

impl SymbolCodeClassifier {
    /// Apply one symbol on top of `level`. A rain match is never overridden.
    fn escalate(level: RainLevel, symbol: &str) -> RainLevel {
        if DRIZZLE_SYMBOLS.contains(symbol) && level != RainLevel::Rain {
            RainLevel::Drizzle
        } else if RAIN_SYMBOLS.contains(symbol) {
            RainLevel::Rain
        } else if CLOUDY_SYMBOLS.contains(symbol) && level == RainLevel::Clear {
            RainLevel::Cloudy
        } else {
            level
        }
    }
}

impl RainClassifier for SymbolCodeClassifier {
    fn scale(&self) -> RainScale {
        RainScale::FourLevel
    }

    fn classify(&self, points: &[&ForecastPoint]) -> RainLevel {
        match points.first().map(|p| &p.condition) {
            Some(Condition::Symbol(symbol)) => Self::escalate(RainLevel::Clear, symbol),
            _ => RainLevel::Clear,
        }
    }
}

/// OpenWeather numeric condition ids (`weather[0].id`).
///
/// Every point is re-evaluated: a rain id raises the level, a drizzle id only
/// lifts it from clear, anything else resets it to clear. The result therefore
/// reflects the last points of the day more than the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionIdClassifier;

static DRIZZLE_IDS: LazyLock<HashSet<u32>> = LazyLock::new(|| {
    HashSet::from([
        // drizzle
        300, 301, 302, 310, 311, 312, 313, 314, 321, //
        // light rain
        500, 520, //
        // light snow and sleet
        600, 612, 615, 620, //
        // mist and fog
        701, 741,
    ])
});

static RAIN_IDS: LazyLock<HashSet<u32>> = LazyLock::new(|| {
    HashSet::from([
        // thunderstorm
        200, 201, 202, 210, 211, 212, 221, 230, 231, 232, //
        // rain
        501, 502, 503, 504, 511, 521, 522, 531, //
        // snow and sleet
        601, 602, 611, 613, 616, 621, 622,
    ])
});

impl ConditionIdClassifier {
    fn step(level: RainLevel, id: Option<u32>) -> RainLevel {
        match id {
            Some(id) if RAIN_IDS.contains(&id) => RainLevel::Rain,
            Some(id) if level == RainLevel::Clear && DRIZZLE_IDS.contains(&id) => {
                RainLevel::Drizzle
            }
            _ => RainLevel::Clear,
        }
    }
}

impl RainClassifier for ConditionIdClassifier {
    fn scale(&self) -> RainScale {
        RainScale::ThreeLevel
    }

    fn classify(&self, points: &[&ForecastPoint]) -> RainLevel {
        points.iter().fold(RainLevel::Clear, |level, point| {
            let id = match point.condition {
                Condition::Id(id) => Some(id),
                _ => None,
            };
            Self::step(level, id)
        })
    }
}
