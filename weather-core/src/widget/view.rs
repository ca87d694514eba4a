use chrono::NaiveDate;
use std::fmt;

use crate::model::WeatherReport;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";
pub const NO_DATA_MESSAGE: &str = "No weather data available";

/// Icon used for categories missing from the table.
pub const DEFAULT_ICON: &str = "wi-day-cloudy";

const ABSOLUTE_ZERO_C: f64 = 273.15;

/// Weather-icons class for a provider condition category.
pub fn icon_for(category: &str) -> &'static str {
    match category {
        "Rain" | "Drizzle" => "wi-day-rain",
        "Clouds" => "wi-day-cloudy",
        "Clear" => "wi-day-sunny",
        "Snow" => "wi-day-snow",
        "Thunderstorm" => "wi-day-thunderstorm",
        "Fog" | "Mist" => "wi-day-fog",
        _ => DEFAULT_ICON,
    }
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - ABSOLUTE_ZERO_C
}

/// Celsius with two decimals and a degree sign, e.g. `27.00°`.
pub fn format_temperature(kelvin: f64) -> String {
    format!("{:.2}\u{b0}", round_half_away(kelvin_to_celsius(kelvin)))
}

/// `{:.2}` breaks exact ties towards the even digit; these go away from zero instead.
fn round_half_away(value: f64) -> f64 {
    // Wide enough to hold the exact expansion of any value that can be a tie.
    let digits = format!("{:.64}", value.abs());
    let is_tie = digits.split_once('.').is_some_and(|(_, frac)| {
        let frac = frac.as_bytes();
        frac[2] == b'5' && frac[3..].iter().all(|&b| b == b'0')
    });

    if is_tie {
        value.signum() * (value.abs() * 100.0).ceil() / 100.0
    } else {
        value
    }
}

/// Long weekday, long month, numeric day: `Friday, October 16`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Everything the success view shows, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub icon: &'static str,
    pub temperature: String,
    pub condition: String,
    pub place: String,
    pub date: String,
    pub humidity: String,
    pub wind: String,
}

impl ReportView {
    /// `None` unless the report has a first condition plus its main and wind blocks.
    pub fn from_report(report: &WeatherReport, today: NaiveDate) -> Option<Self> {
        let condition = report.primary_condition()?;
        let main = report.main.as_ref()?;
        let wind = report.wind.as_ref()?;

        Some(Self {
            icon: icon_for(&condition.main),
            temperature: format_temperature(main.temp),
            condition: condition.description.to_uppercase(),
            place: report.name.clone(),
            date: format_date(today),
            humidity: format!("{}%", main.humidity),
            wind: format!("{} m/s", wind.speed),
        })
    }
}

/// The four mutually exclusive render states.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    Loading,
    Error(String),
    Report(ReportView),
    Empty,
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetView::Loading => writeln!(f, "Loading..."),
            WidgetView::Error(message) => writeln!(f, "{message}"),
            WidgetView::Empty => writeln!(f, "{NO_DATA_MESSAGE}"),
            WidgetView::Report(view) => {
                writeln!(f, "[{}]  {}", view.icon, view.temperature)?;
                writeln!(f, "{}", view.condition)?;
                writeln!(f)?;
                writeln!(f, "{}", view.place)?;
                writeln!(f, "{}", view.date)?;
                writeln!(f)?;
                writeln!(f, "Humidity: {}", view.humidity)?;
                writeln!(f, "Wind: {}", view.wind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, MainBlock, Wind};

    fn paris() -> WeatherReport {
        WeatherReport {
            weather: vec![Condition {
                main: "Clear".into(),
                description: "clear sky".into(),
            }],
            main: Some(MainBlock { temp: 300.15, humidity: 40.0 }),
            wind: Some(Wind { speed: 3.0 }),
            name: "Paris".into(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    #[test]
    fn known_categories_map_to_icons() {
        assert_eq!(icon_for("Rain"), "wi-day-rain");
        assert_eq!(icon_for("Drizzle"), "wi-day-rain");
        assert_eq!(icon_for("Clear"), "wi-day-sunny");
        assert_eq!(icon_for("Snow"), "wi-day-snow");
        assert_eq!(icon_for("Thunderstorm"), "wi-day-thunderstorm");
        assert_eq!(icon_for("Mist"), "wi-day-fog");
    }

    #[test]
    fn unknown_categories_fall_back_to_cloudy() {
        for category in ["Smoke", "Haze", "Tornado", "", "rain"] {
            assert_eq!(icon_for(category), DEFAULT_ICON, "category {category:?}");
        }
    }

    #[test]
    fn temperature_is_celsius_with_two_decimals() {
        assert_eq!(format_temperature(273.15), "0.00\u{b0}");
        assert_eq!(format_temperature(300.15), "27.00\u{b0}");
        assert_eq!(format_temperature(263.0), "-10.15\u{b0}");
        assert_eq!(format_temperature(288.716), "15.57\u{b0}");
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(format_temperature(290.275), "17.13\u{b0}");
        assert_eq!(format_temperature(256.025), "-17.13\u{b0}");
        // near misses keep their nearest rounding
        assert_eq!(format_temperature(290.274), "17.12\u{b0}");
        assert_eq!(format_temperature(273.155), "0.00\u{b0}");
    }

    #[test]
    fn date_uses_long_weekday_and_month() {
        assert_eq!(format_date(day()), "Friday, October 16");
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
        assert_eq!(format_date(first), "Sunday, March 1");
    }

    #[test]
    fn report_view_formats_every_field() {
        let view = ReportView::from_report(&paris(), day()).expect("renderable");

        assert_eq!(view.icon, "wi-day-sunny");
        assert_eq!(view.temperature, "27.00\u{b0}");
        assert_eq!(view.condition, "CLEAR SKY");
        assert_eq!(view.place, "Paris");
        assert_eq!(view.date, "Friday, October 16");
        assert_eq!(view.humidity, "40%");
        assert_eq!(view.wind, "3 m/s");
    }

    #[test]
    fn only_the_first_condition_is_used() {
        let mut report = paris();
        report.weather.push(Condition {
            main: "Rain".into(),
            description: "light rain".into(),
        });

        let view = ReportView::from_report(&report, day()).expect("renderable");
        assert_eq!(view.icon, "wi-day-sunny");
        assert_eq!(view.condition, "CLEAR SKY");
    }

    #[test]
    fn incomplete_reports_are_not_renderable() {
        let mut report = paris();
        report.weather.clear();
        assert!(ReportView::from_report(&report, day()).is_none());

        let mut report = paris();
        report.main = None;
        assert!(ReportView::from_report(&report, day()).is_none());
    }

    #[test]
    fn display_renders_text_panel() {
        let view = WidgetView::Report(ReportView::from_report(&paris(), day()).expect("renderable"));
        let text = view.to_string();

        assert!(text.starts_with("[wi-day-sunny]  27.00\u{b0}\n"));
        assert!(text.contains("Humidity: 40%"));
        assert!(text.contains("Wind: 3 m/s"));
        assert_eq!(WidgetView::Empty.to_string().trim(), NO_DATA_MESSAGE);
        assert_eq!(WidgetView::Loading.to_string().trim(), "Loading...");
    }
}
