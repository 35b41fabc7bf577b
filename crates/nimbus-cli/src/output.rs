//! Human-friendly rendering of weather records.
//!
//! Stored temperatures are Kelvin; everything printed here is converted to the
//! configured display unit at this boundary.

use chrono::DateTime;
use nimbus_core::TemperatureUnit;
use nimbus_weather::types::{
    compass_direction, kelvin_to_celsius, kelvin_to_fahrenheit, WeatherLocation, WeatherRecord,
};

pub fn format_temperature(kelvin: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{:.1}\u{b0}C", kelvin_to_celsius(kelvin)),
        TemperatureUnit::Fahrenheit => format!("{:.1}\u{b0}F", kelvin_to_fahrenheit(kelvin)),
    }
}

pub fn format_location(location: &WeatherLocation) -> String {
    let mut parts = vec![location.name.clone()];
    if let Some(state) = &location.state {
        parts.push(state.clone());
    }
    if let Some(country) = &location.country {
        parts.push(country.clone());
    }
    parts.join(", ")
}

fn format_epoch(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One-line summary, used by `list` and `history`.
pub fn print_summary(record: &WeatherRecord, unit: TemperatureUnit) {
    let id = record.id.as_deref().unwrap_or("-");
    let condition = record
        .primary_condition()
        .map(|c| c.description.as_str())
        .unwrap_or("-");

    println!(
        "{}  {}  {}  {}  {}",
        id,
        record.observed_at.format("%Y-%m-%d %H:%M"),
        format_location(&record.location),
        format_temperature(record.temp, unit),
        condition,
    );
}

/// Full record detail, used by `current` and `show`.
pub fn print_detail(record: &WeatherRecord, unit: TemperatureUnit) {
    println!(
        "{} ({:.2}, {:.2})",
        format_location(&record.location),
        record.location.lat,
        record.location.lon
    );
    if let Some(id) = &record.id {
        println!("Id: {id}");
    }
    println!(
        "Observed: {} UTC (searched {} UTC)",
        record.observed_at.format("%Y-%m-%d %H:%M"),
        record.search_time.format("%Y-%m-%d %H:%M")
    );
    println!(
        "Temperature: {} (feels like {}, min {}, max {})",
        format_temperature(record.temp, unit),
        format_temperature(record.feels_like, unit),
        format_temperature(record.temp_min, unit),
        format_temperature(record.temp_max, unit)
    );
    println!(
        "Humidity: {}%   Pressure: {} hPa   Visibility: {} m",
        record.humidity, record.pressure, record.visibility
    );
    println!(
        "Wind: {:.1} m/s, {}\u{b0} ({})   Clouds: {}%",
        record.wind_speed,
        record.wind_deg,
        compass_direction(record.wind_deg),
        record.clouds
    );

    let descriptions: Vec<&str> = record
        .conditions
        .iter()
        .map(|c| c.description.as_str())
        .collect();
    println!("Conditions: {}", descriptions.join(", "));

    if let Some(rain) = &record.rain {
        if let Some(volume) = rain.one_hour {
            println!("Rain: {volume} mm (1h)");
        }
        if let Some(volume) = rain.three_hours {
            println!("Rain: {volume} mm (3h)");
        }
    }
    if let Some(snow) = &record.snow {
        if let Some(volume) = snow.one_hour {
            println!("Snow: {volume} mm (1h)");
        }
        if let Some(volume) = snow.three_hours {
            println!("Snow: {volume} mm (3h)");
        }
    }

    if let (Some(sunrise), Some(sunset)) = (record.sunrise, record.sunset) {
        println!(
            "Sunrise: {}   Sunset: {}",
            format_epoch(sunrise),
            format_epoch(sunset)
        );
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn temperature_formats_per_unit() {
        assert_eq!(format_temperature(300.15, TemperatureUnit::Celsius), "27.0\u{b0}C");
        assert_eq!(
            format_temperature(300.15, TemperatureUnit::Fahrenheit),
            "80.6\u{b0}F"
        );
    }

    #[test]
    fn location_joins_present_parts() {
        let location = WeatherLocation {
            name: "Springfield".to_string(),
            lat: 39.78,
            lon: -89.65,
            country: Some("US".to_string()),
            state: Some("Illinois".to_string()),
        };
        assert_eq!(format_location(&location), "Springfield, Illinois, US");

        let bare = WeatherLocation {
            name: "Atlantis".to_string(),
            lat: 0.0,
            lon: 0.0,
            country: None,
            state: None,
        };
        assert_eq!(format_location(&bare), "Atlantis");
    }
}
