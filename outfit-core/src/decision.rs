//! Threshold rules that turn a [`WeatherSummary`] into clothing.

use crate::model::{
    ClothingSummary, JacketLevel, RainLevel, TrouserWeight, WeatherSummary, WindLevel,
};

const HOODIE_BELOW: f64 = 21.0;
const HOODIE_IN_RAIN_BELOW: f64 = 26.0;
const INSULATED_JACKET_BELOW: f64 = 10.0;
const MILD_MINIMUM: f64 = 10.0;
const SHORTS_ABOVE: f64 = 25.0;
const REGULAR_TROUSERS_ABOVE: f64 = 5.0;

/// Per-provider knobs of the decision rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClothingPolicy {
    /// Maximum temperature under which a light jacket is worn.
    pub light_jacket_below: f64,
}

impl ClothingPolicy {
    pub const METNO: ClothingPolicy = ClothingPolicy {
        light_jacket_below: 15.0,
    };

    pub const OPENWEATHER: ClothingPolicy = ClothingPolicy {
        light_jacket_below: 19.0,
    };
}

/// Decide what to wear. Min and max are taken over the three representative
/// temperatures only.
pub fn decide(weather: &WeatherSummary, policy: &ClothingPolicy) -> ClothingSummary {
    let min = weather.min_temperature();
    let max = weather.max_temperature();

    let hoodie = max < HOODIE_BELOW || (max < HOODIE_IN_RAIN_BELOW && weather.rain.is_wet());

    let mut jacket = if max < INSULATED_JACKET_BELOW {
        JacketLevel::Insulated
    } else if max < policy.light_jacket_below
        || (weather.rain == RainLevel::Rain && min >= MILD_MINIMUM)
    {
        JacketLevel::Light
    } else {
        JacketLevel::None
    };

    // wind on a mild day
    if weather.wind >= WindLevel::Moderate && min >= MILD_MINIMUM {
        jacket = JacketLevel::Light;
    }

    let trousers = if max > SHORTS_ABOVE {
        TrouserWeight::Shorts
    } else if max > REGULAR_TROUSERS_ABOVE {
        TrouserWeight::Regular
    } else {
        TrouserWeight::Insulated
    };

    ClothingSummary {
        hoodie,
        jacket,
        trousers,
    }
}
