use std::fmt::Write;

use weather_core::{SearchHistory, Units, WeatherReport};

/// Text block for one successful lookup.
pub fn report(report: &WeatherReport, units: Units) -> String {
    let c = &report.current;
    let deg = units.temperature_suffix();
    let mut out = String::new();

    let _ = writeln!(out, "{}, {}", c.city, c.country);
    let _ = writeln!(out, "{}  {}{deg}  {}", c.category.emoji(), c.temperature, c.description);
    let _ = writeln!(
        out,
        "Feels like {}{deg} · Humidity {}% · Wind {:.1} {}",
        c.feels_like,
        c.humidity_pct,
        c.wind_speed,
        units.speed_suffix(),
    );
    let _ = writeln!(
        out,
        "Pressure {} hPa · Visibility {} km",
        c.pressure,
        trim_float(c.visibility_km),
    );

    if !report.forecast.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}-Day Forecast", report.forecast.len());
        for day in &report.forecast {
            let _ = writeln!(
                out,
                "  {}  {}  {:>4}{deg}  {}",
                day.label.format("%a %d"),
                day.category.emoji(),
                day.rounded_temperature(),
                day.description,
            );
        }
    }

    out
}

pub fn history(history: &SearchHistory) -> String {
    if history.is_empty() {
        return "No recent searches.\n".to_string();
    }

    let mut out = String::from("Recent:\n");
    for (i, city) in history.entries().iter().enumerate() {
        let _ = writeln!(out, "  {}. {city}", i + 1);
    }
    out
}

/// `8.0` -> `8`, `9.5` -> `9.5`
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
