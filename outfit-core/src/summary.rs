use crate::{
    model::{DaySelection, WeatherSummary, WindLevel},
    rain::RainClassifier,
};

/// Reduce the selected points to a [`WeatherSummary`].
///
/// Wind and rain look at the same three representative points the
/// temperatures come from.
pub fn summarize(selection: &DaySelection, rain: &dyn RainClassifier) -> WeatherSummary {
    let points = selection.points();

    let (peak_wind_speed, wind) = points
        .iter()
        .fold((0.0_f64, WindLevel::Calm), |(peak, level), point| {
            (peak.max(point.wind_speed), level.escalate(point.wind_speed))
        });

    WeatherSummary {
        temperatures: points.map(|p| p.air_temperature),
        peak_wind_speed,
        wind,
        rain: rain.classify(&points),
    }
}
