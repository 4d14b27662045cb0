//! Terminal report for a [`Recommendation`].

use std::{
    fmt::{Display, Write},
    io::IsTerminal,
};

use outfit_core::{JacketLevel, RainLevel, RainScale, Recommendation, TrouserWeight};

const RESET: &str = "\u{1b}[0m";
const BOLD: &str = "\u{1b}[1m";
const INVERTED: &str = "\u{1b}[30;47m";
const HI_RED: &str = "\u{1b}[91m";
const HI_GREEN: &str = "\u{1b}[92m";
const HI_YELLOW: &str = "\u{1b}[93m";
const HI_BLUE: &str = "\u{1b}[94m";
const HI_MAGENTA: &str = "\u{1b}[95m";
const HI_CYAN: &str = "\u{1b}[96m";
const HI_WHITE: &str = "\u{1b}[97m";

/// Whether to emit ANSI escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Ansi,
    Plain,
}

impl Palette {
    /// Colors only for an interactive stdout, and never with `NO_COLOR` set.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if !no_color && std::io::stdout().is_terminal() {
            Palette::Ansi
        } else {
            Palette::Plain
        }
    }

    fn paint(&self, codes: &[&str], text: impl Display) -> String {
        match self {
            Palette::Plain => text.to_string(),
            Palette::Ansi => format!("{}{text}{RESET}", codes.concat()),
        }
    }
}

/// The three level scale has no cloud cover, so its lowest level only means dry.
fn rain_label(rain: RainLevel, scale: RainScale) -> (&'static str, &'static str) {
    match rain {
        RainLevel::Clear if scale == RainScale::ThreeLevel => (HI_WHITE, "no rain"),
        RainLevel::Clear => (HI_YELLOW, "sunny"),
        RainLevel::Cloudy => (HI_WHITE, "cloudy"),
        RainLevel::Drizzle => (HI_CYAN, "light rain"),
        RainLevel::Rain => (HI_BLUE, "heavy rain"),
    }
}

/// Render the full report, ending with a newline.
pub fn render(rec: &Recommendation, palette: Palette) -> String {
    let weather = &rec.weather;
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(
        out,
        "Forecast for {} ({})\n",
        rec.day.format("%d. %m. %Y"),
        rec.provider
    );

    let wind = if weather.peak_wind_speed > 0.0 {
        format!(
            "wind up to {} m/s",
            palette.paint(&[HI_CYAN, BOLD], format_args!("{:.1}", weather.peak_wind_speed))
        )
    } else {
        palette.paint(&[HI_CYAN, BOLD], "calm")
    };
    let (rain_color, rain_text) = rain_label(weather.rain, rec.rain_scale);

    let _ = writeln!(
        out,
        "Temperatures from {} °C to {} °C, {wind}, {}",
        palette.paint(&[HI_BLUE, BOLD], format_args!("{:.1}", weather.min_temperature())),
        palette.paint(&[HI_RED, BOLD], format_args!("{:.1}", weather.max_temperature())),
        palette.paint(&[rain_color], rain_text),
    );

    let _ = writeln!(out, "\n{}", palette.paint(&[INVERTED], "Clothing:"));

    let clothing = &rec.clothing;
    let top = if clothing.hoodie {
        palette.paint(&[HI_RED], "Hoodie")
    } else {
        palette.paint(&[HI_GREEN], "T-shirt")
    };
    let _ = writeln!(out, "{top}");

    match clothing.jacket {
        JacketLevel::None => {}
        JacketLevel::Light => {
            let _ = writeln!(out, "{}", palette.paint(&[HI_CYAN], "Light jacket"));
        }
        JacketLevel::Insulated => {
            let _ = writeln!(out, "{}", palette.paint(&[HI_BLUE], "Insulated jacket"));
        }
    }

    let trousers = match clothing.trousers {
        TrouserWeight::Shorts => palette.paint(&[HI_YELLOW], "Shorts"),
        TrouserWeight::Regular => palette.paint(&[HI_WHITE], "Trousers"),
        TrouserWeight::Insulated => palette.paint(&[HI_MAGENTA], "Insulated trousers"),
    };
    let _ = writeln!(out, "{trousers}");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use outfit_core::{ClothingSummary, ProviderId, WeatherSummary, WindLevel};

    fn recommendation(
        peak_wind_speed: f64,
        rain: RainLevel,
        clothing: ClothingSummary,
    ) -> Recommendation {
        Recommendation {
            provider: ProviderId::MetNo,
            day: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            weather: WeatherSummary {
                temperatures: [4.0, 11.5, 9.25],
                peak_wind_speed,
                wind: WindLevel::classify(peak_wind_speed),
                rain,
            },
            rain_scale: RainScale::FourLevel,
            clothing,
        }
    }

    #[test]
    fn plain_report_lists_weather_and_clothes() {
        let rec = recommendation(
            6.2,
            RainLevel::Cloudy,
            ClothingSummary {
                hoodie: true,
                jacket: JacketLevel::Light,
                trousers: TrouserWeight::Regular,
            },
        );

        assert_eq!(
            render(&rec, Palette::Plain),
            "Forecast for 18. 10. 2026 (metno)\n\
             \n\
             Temperatures from 4.0 °C to 11.5 °C, wind up to 6.2 m/s, cloudy\n\
             \n\
             Clothing:\n\
             Hoodie\n\
             Light jacket\n\
             Trousers\n"
        );
    }

    #[test]
    fn no_jacket_line_when_not_needed() {
        let rec = recommendation(
            0.0,
            RainLevel::Clear,
            ClothingSummary {
                hoodie: false,
                jacket: JacketLevel::None,
                trousers: TrouserWeight::Shorts,
            },
        );

        let report = render(&rec, Palette::Plain);
        assert!(report.contains(", calm, sunny\n"));
        assert!(report.ends_with("Clothing:\nT-shirt\nShorts\n"));
        assert!(!report.contains("jacket"));
    }

    #[test]
    fn dry_day_on_the_three_level_scale_is_not_called_sunny() {
        let mut rec = recommendation(
            3.0,
            RainLevel::Clear,
            ClothingSummary {
                hoodie: true,
                jacket: JacketLevel::Light,
                trousers: TrouserWeight::Regular,
            },
        );
        rec.provider = ProviderId::OpenWeather;
        rec.rain_scale = RainScale::ThreeLevel;

        let report = render(&rec, Palette::Plain);
        assert!(report.contains("wind up to 3.0 m/s, no rain\n"));
        assert!(!report.contains("sunny"));
    }

    #[test]
    fn ansi_palette_wraps_in_escapes() {
        let rec = recommendation(
            13.0,
            RainLevel::Rain,
            ClothingSummary {
                hoodie: true,
                jacket: JacketLevel::Insulated,
                trousers: TrouserWeight::Insulated,
            },
        );

        let report = render(&rec, Palette::Ansi);
        assert!(report.contains("\u{1b}[94mheavy rain\u{1b}[0m"));
        assert!(report.contains("\u{1b}[94mInsulated jacket\u{1b}[0m"));
        assert!(report.contains("\u{1b}[95mInsulated trousers\u{1b}[0m"));
    }
}
