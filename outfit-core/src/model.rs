use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Where to fetch the forecast for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level; `None` leaves it out of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<i32>,
}

impl Location {
    /// Build a location, rejecting coordinates outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64, altitude: Option<i32>) -> Result<Self, ConfigError> {
        check_range("latitude", latitude, 90.0)?;
        check_range("longitude", longitude, 180.0)?;

        Ok(Self {
            latitude,
            longitude,
            altitude,
        })
    }
}

fn check_range(name: &'static str, value: f64, limit: f64) -> Result<(), ConfigError> {
    // `contains` is false for NaN as well
    if (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::CoordinateOutOfRange {
            name,
            value,
            min: -limit,
            max: limit,
        })
    }
}

/// Precipitation/cloud classification as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// Categorical code such as `lightrain` or `partlycloudy_day`.
    Symbol(String),
    /// Numeric condition id such as `500`.
    Id(u32),
    Unknown,
}

/// One provider observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub air_temperature: f64,
    pub wind_speed: f64,
    pub condition: Condition,
}

/// The three representative slots of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayPart {
    Morning,
    Noon,
    Afternoon,
}

impl DayPart {
    pub const fn all() -> [DayPart; 3] {
        [DayPart::Morning, DayPart::Noon, DayPart::Afternoon]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Noon => "noon",
            DayPart::Afternoon => "afternoon",
        }
    }
}

/// Representative points of the target day, keyed by the slot they matched.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySelection {
    pub day: NaiveDate,
    pub morning: ForecastPoint,
    pub noon: ForecastPoint,
    pub afternoon: ForecastPoint,
}

impl DaySelection {
    pub fn get(&self, part: DayPart) -> &ForecastPoint {
        match part {
            DayPart::Morning => &self.morning,
            DayPart::Noon => &self.noon,
            DayPart::Afternoon => &self.afternoon,
        }
    }

    /// Points in morning, noon, afternoon order.
    pub fn points(&self) -> [&ForecastPoint; 3] {
        DayPart::all().map(|part| self.get(part))
    }
}

/// Wind severity derived from fixed m/s breakpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WindLevel {
    #[default]
    Calm,
    Moderate,
    Strong,
}

impl WindLevel {
    pub const MODERATE_ABOVE: f64 = 8.0;
    pub const STRONG_ABOVE: f64 = 12.0;

    pub fn classify(speed: f64) -> Self {
        if speed > Self::STRONG_ABOVE {
            WindLevel::Strong
        } else if speed > Self::MODERATE_ABOVE {
            WindLevel::Moderate
        } else {
            WindLevel::Calm
        }
    }

    /// Raise the level for another observation; never lowers it.
    pub fn escalate(self, speed: f64) -> Self {
        self.max(Self::classify(speed))
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// Which rain scale a provider reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainScale {
    /// none, drizzle, rain
    ThreeLevel,
    /// sunny, cloudy, drizzle, heavy rain
    FourLevel,
}

/// Discretized precipitation severity.
///
/// The three-level scale never produces [`RainLevel::Cloudy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RainLevel {
    #[default]
    Clear,
    Cloudy,
    Drizzle,
    Rain,
}

impl RainLevel {
    /// At least light rain.
    pub fn is_wet(&self) -> bool {
        *self >= RainLevel::Drizzle
    }

    /// Position on the given scale.
    pub fn index(&self, scale: RainScale) -> u8 {
        match scale {
            RainScale::FourLevel => *self as u8,
            RainScale::ThreeLevel => match self {
                RainLevel::Clear | RainLevel::Cloudy => 0,
                RainLevel::Drizzle => 1,
                RainLevel::Rain => 2,
            },
        }
    }
}

/// What the forecast for the target day looks like, reduced to a few numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Morning, noon, afternoon.
    pub temperatures: [f64; 3],
    pub peak_wind_speed: f64,
    pub wind: WindLevel,
    pub rain: RainLevel,
}

impl WeatherSummary {
    pub fn min_temperature(&self) -> f64 {
        self.temperatures.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_temperature(&self) -> f64 {
        self.temperatures
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JacketLevel {
    #[default]
    None,
    Light,
    Insulated,
}

impl JacketLevel {
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrouserWeight {
    #[default]
    Shorts,
    Regular,
    Insulated,
}

impl TrouserWeight {
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// The recommendation itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingSummary {
    pub hoodie: bool,
    pub jacket: JacketLevel,
    pub trousers: TrouserWeight,
}
