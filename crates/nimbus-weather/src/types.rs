use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic place a weather record is tied to.
///
/// Coordinates are WGS84 degrees. Immutable once attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// One classified weather condition.
///
/// A record carries one or more of these; the first entry is the primary
/// condition (provider convention).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub code: u16,
    pub category: String,
    pub description: String,
    pub icon: String,
}

/// Precipitation accumulation, keyed by accumulation window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h", skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

/// One observed-or-historical weather reading tied to a location.
///
/// Temperature fields are stored in Kelvin (the canonical unit); conversion to
/// Celsius/Fahrenheit happens only at presentation and export boundaries.
/// `id` is absent until the record is persisted, after which it is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub location: WeatherLocation,
    /// When the lookup was made
    pub search_time: DateTime<Utc>,
    /// When the reading was observed
    pub observed_at: DateTime<Utc>,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Atmospheric pressure, hPa
    pub pressure: u32,
    /// Relative humidity, percent
    pub humidity: u8,
    /// Visibility, meters
    pub visibility: u32,
    /// Wind speed, m/s
    pub wind_speed: f64,
    /// Wind bearing, degrees
    pub wind_deg: u16,
    /// Cloud cover, percent
    pub clouds: u8,
    pub conditions: Vec<WeatherCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    /// Sunrise, epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    /// Sunset, epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

impl WeatherRecord {
    /// The primary condition (first entry, provider convention).
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.conditions.first()
    }

    /// Whether this record has been persisted (id assigned).
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// Partial-merge carrier for record updates.
///
/// Temperature fields are Kelvin; callers converting from a display unit do so
/// before building the patch. Merged-field consistency (e.g. min <= max) is the
/// caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<u32>,
    pub humidity: Option<u8>,
    pub visibility: Option<u32>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<u16>,
    pub clouds: Option<u8>,
}

impl RecordPatch {
    /// True if no field is set.
    pub fn is_empty(&self) -> bool {
        self.temp.is_none()
            && self.feels_like.is_none()
            && self.temp_min.is_none()
            && self.temp_max.is_none()
            && self.pressure.is_none()
            && self.humidity.is_none()
            && self.visibility.is_none()
            && self.wind_speed.is_none()
            && self.wind_deg.is_none()
            && self.clouds.is_none()
    }

    /// Merge the set fields into `record`, leaving the rest untouched.
    pub fn apply(&self, record: &mut WeatherRecord) {
        if let Some(temp) = self.temp {
            record.temp = temp;
        }
        if let Some(feels_like) = self.feels_like {
            record.feels_like = feels_like;
        }
        if let Some(temp_min) = self.temp_min {
            record.temp_min = temp_min;
        }
        if let Some(temp_max) = self.temp_max {
            record.temp_max = temp_max;
        }
        if let Some(pressure) = self.pressure {
            record.pressure = pressure;
        }
        if let Some(humidity) = self.humidity {
            record.humidity = humidity;
        }
        if let Some(visibility) = self.visibility {
            record.visibility = visibility;
        }
        if let Some(wind_speed) = self.wind_speed {
            record.wind_speed = wind_speed;
        }
        if let Some(wind_deg) = self.wind_deg {
            record.wind_deg = wind_deg;
        }
        if let Some(clouds) = self.clouds {
            record.clouds = clouds;
        }
    }
}

/// Convert a Kelvin temperature to Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

/// Convert a Kelvin temperature to Fahrenheit.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - 273.15) * 9.0 / 5.0 + 32.0
}

/// Convert a Celsius temperature to Kelvin.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass direction for a wind bearing in degrees.
pub fn compass_direction(degrees: u16) -> &'static str {
    let index = (f64::from(degrees) / 22.5).round() as usize % 16;
    COMPASS_POINTS[index]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> WeatherRecord {
        WeatherRecord {
            id: None,
            location: WeatherLocation {
                name: "Springfield".to_string(),
                lat: 39.7817,
                lon: -89.6501,
                country: Some("US".to_string()),
                state: Some("Illinois".to_string()),
            },
            search_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            observed_at: Utc.with_ymd_and_hms(2024, 5, 1, 11, 55, 0).unwrap(),
            temp: 293.15,
            feels_like: 292.0,
            temp_min: 290.15,
            temp_max: 296.15,
            pressure: 1013,
            humidity: 56,
            visibility: 10000,
            wind_speed: 3.6,
            wind_deg: 200,
            clouds: 20,
            conditions: vec![WeatherCondition {
                code: 801,
                category: "Clouds".to_string(),
                description: "few clouds".to_string(),
                icon: "02d".to_string(),
            }],
            rain: None,
            snow: None,
            sunrise: Some(1_714_550_000),
            sunset: Some(1_714_600_000),
        }
    }

    #[test]
    fn kelvin_to_celsius_freezing_point() {
        assert!((kelvin_to_celsius(273.15)).abs() < 1e-9);
    }

    #[test]
    fn kelvin_to_celsius_room_temperature() {
        assert!((kelvin_to_celsius(300.15) - 27.0).abs() < 1e-9);
    }

    #[test]
    fn kelvin_to_fahrenheit_boiling_point() {
        assert!((kelvin_to_fahrenheit(373.15) - 212.0).abs() < 1e-9);
    }

    #[test]
    fn celsius_to_kelvin_round_trip() {
        let kelvin = 287.65;
        let back = celsius_to_kelvin(kelvin_to_celsius(kelvin));
        assert!((back - kelvin).abs() < 1e-9);
    }

    #[test]
    fn compass_cardinal_points() {
        assert_eq!(compass_direction(0), "N");
        assert_eq!(compass_direction(90), "E");
        assert_eq!(compass_direction(180), "S");
        assert_eq!(compass_direction(270), "W");
    }

    #[test]
    fn compass_wraps_past_north() {
        assert_eq!(compass_direction(359), "N");
        assert_eq!(compass_direction(340), "NNW");
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut record = sample_record();
        let patch = RecordPatch {
            temp: Some(295.15),
            humidity: Some(70),
            ..RecordPatch::default()
        };

        patch.apply(&mut record);

        assert!((record.temp - 295.15).abs() < 1e-9);
        assert_eq!(record.humidity, 70);
        // Untouched fields survive the merge
        assert!((record.feels_like - 292.0).abs() < 1e-9);
        assert_eq!(record.pressure, 1013);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(RecordPatch::default().is_empty());
        let patch = RecordPatch {
            wind_speed: Some(5.0),
            ..RecordPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn record_json_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: WeatherRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn precipitation_uses_window_keys() {
        let precipitation = Precipitation {
            one_hour: Some(0.5),
            three_hours: None,
        };
        let json = serde_json::to_string(&precipitation).unwrap();
        assert_eq!(json, r#"{"1h":0.5}"#);
    }

    #[test]
    fn primary_condition_is_first() {
        let record = sample_record();
        assert_eq!(record.primary_condition().unwrap().code, 801);
    }
}
