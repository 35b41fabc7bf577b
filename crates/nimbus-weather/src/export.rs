//! Pure serializers from the saved record collection to exportable text.
//!
//! Stored temperatures are Kelvin; every exporter converts at this boundary
//! and leaves the records untouched.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::types::{
    compass_direction, kelvin_to_celsius, kelvin_to_fahrenheit, Precipitation, WeatherCondition,
    WeatherLocation, WeatherRecord,
};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
    Markdown,
}

impl ExportFormat {
    /// Parse a format name; unknown names raise `UnsupportedFormat`.
    pub fn parse(name: &str) -> Result<Self, ExportError> {
        match name.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(ExportError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Markdown => "text/markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Markdown => "md",
        }
    }
}

/// Default export filename: ISO-8601 timestamp with `:`/`.` replaced by `-`.
pub fn default_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("weather-data-{}.{}", timestamp, format.extension())
}

/// Serialize the collection in the given format.
///
/// Pure and deterministic given identical input order.
pub fn serialize(records: &[WeatherRecord], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => to_json(records),
        ExportFormat::Xml => Ok(to_xml(records)),
        ExportFormat::Markdown => Ok(to_markdown(records)),
    }
}

const CSV_HEADERS: [&str; 16] = [
    "ID",
    "Location Name",
    "Latitude",
    "Longitude",
    "Date",
    "Temperature",
    "Feels Like",
    "Min Temp",
    "Max Temp",
    "Pressure",
    "Humidity",
    "Visibility",
    "Wind Speed",
    "Wind Direction",
    "Clouds",
    "Weather Condition",
];

fn to_csv(records: &[WeatherRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for record in records {
        let row = [
            record.id.clone().unwrap_or_default(),
            record.location.name.clone(),
            record.location.lat.to_string(),
            record.location.lon.to_string(),
            record
                .observed_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            format!("{:.1}", kelvin_to_celsius(record.temp)),
            format!("{:.1}", kelvin_to_celsius(record.feels_like)),
            format!("{:.1}", kelvin_to_celsius(record.temp_min)),
            format!("{:.1}", kelvin_to_celsius(record.temp_max)),
            record.pressure.to_string(),
            record.humidity.to_string(),
            record.visibility.to_string(),
            record.wind_speed.to_string(),
            record.wind_deg.to_string(),
            record.clouds.to_string(),
            record
                .primary_condition()
                .map(|c| c.description.clone())
                .unwrap_or_default(),
        ];
        writer
            .write_record(&row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

/// JSON export shape: the canonical record with temperatures in Celsius and a
/// unit tag. Field order here is the exported key order.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonExportRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub location: WeatherLocation,
    pub search_time: DateTime<Utc>,
    pub observed_at: DateTime<Utc>,
    pub temperature_unit: String,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
    pub visibility: u32,
    pub wind_speed: f64,
    pub wind_deg: u16,
    pub clouds: u8,
    pub conditions: Vec<WeatherCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain: Option<Precipitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow: Option<Precipitation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
}

impl From<&WeatherRecord> for JsonExportRecord {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            id: record.id.clone(),
            location: record.location.clone(),
            search_time: record.search_time,
            observed_at: record.observed_at,
            temperature_unit: "celsius".to_string(),
            temp: kelvin_to_celsius(record.temp),
            feels_like: kelvin_to_celsius(record.feels_like),
            temp_min: kelvin_to_celsius(record.temp_min),
            temp_max: kelvin_to_celsius(record.temp_max),
            pressure: record.pressure,
            humidity: record.humidity,
            visibility: record.visibility,
            wind_speed: record.wind_speed,
            wind_deg: record.wind_deg,
            clouds: record.clouds,
            conditions: record.conditions.clone(),
            rain: record.rain,
            snow: record.snow,
            sunrise: record.sunrise,
            sunset: record.sunset,
        }
    }
}

fn to_json(records: &[WeatherRecord]) -> Result<String, ExportError> {
    let exported: Vec<JsonExportRecord> = records.iter().map(Into::into).collect();
    serde_json::to_string_pretty(&exported).map_err(|e| ExportError::Json(e.to_string()))
}

fn to_xml(records: &[WeatherRecord]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<WeatherData>\n");

    for record in records {
        xml.push_str("  <WeatherRecord>\n");
        xml.push_str(&format!(
            "    <ID>{}</ID>\n",
            escape_xml(record.id.as_deref().unwrap_or(""))
        ));
        xml.push_str("    <Location>\n");
        xml.push_str(&format!(
            "      <Name>{}</Name>\n",
            escape_xml(&record.location.name)
        ));
        xml.push_str(&format!(
            "      <Latitude>{}</Latitude>\n",
            record.location.lat
        ));
        xml.push_str(&format!(
            "      <Longitude>{}</Longitude>\n",
            record.location.lon
        ));
        xml.push_str(&format!(
            "      <Country>{}</Country>\n",
            escape_xml(record.location.country.as_deref().unwrap_or(""))
        ));
        if let Some(state) = &record.location.state {
            xml.push_str(&format!("      <State>{}</State>\n", escape_xml(state)));
        }
        xml.push_str("    </Location>\n");
        xml.push_str(&format!(
            "    <Date>{}</Date>\n",
            record.observed_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str("    <Units>metric</Units>\n");
        xml.push_str(&format!(
            "    <Temperature>{:.1}</Temperature>\n",
            kelvin_to_celsius(record.temp)
        ));
        xml.push_str(&format!(
            "    <FeelsLike>{:.1}</FeelsLike>\n",
            kelvin_to_celsius(record.feels_like)
        ));
        xml.push_str(&format!(
            "    <MinTemp>{:.1}</MinTemp>\n",
            kelvin_to_celsius(record.temp_min)
        ));
        xml.push_str(&format!(
            "    <MaxTemp>{:.1}</MaxTemp>\n",
            kelvin_to_celsius(record.temp_max)
        ));
        xml.push_str(&format!(
            "    <Pressure>{}</Pressure>\n",
            record.pressure
        ));
        xml.push_str(&format!(
            "    <Humidity>{}</Humidity>\n",
            record.humidity
        ));
        xml.push_str(&format!(
            "    <Visibility>{}</Visibility>\n",
            record.visibility
        ));
        xml.push_str("    <Wind>\n");
        xml.push_str(&format!("      <Speed>{}</Speed>\n", record.wind_speed));
        xml.push_str(&format!(
            "      <Direction>{}</Direction>\n",
            record.wind_deg
        ));
        xml.push_str("    </Wind>\n");
        xml.push_str(&format!("    <Clouds>{}</Clouds>\n", record.clouds));
        xml.push_str("    <WeatherConditions>\n");
        for condition in &record.conditions {
            xml.push_str("      <Condition>\n");
            xml.push_str(&format!("        <ID>{}</ID>\n", condition.code));
            xml.push_str(&format!(
                "        <Category>{}</Category>\n",
                escape_xml(&condition.category)
            ));
            xml.push_str(&format!(
                "        <Description>{}</Description>\n",
                escape_xml(&condition.description)
            ));
            xml.push_str(&format!(
                "        <Icon>{}</Icon>\n",
                escape_xml(&condition.icon)
            ));
            xml.push_str("      </Condition>\n");
        }
        xml.push_str("    </WeatherConditions>\n");
        xml.push_str("  </WeatherRecord>\n");
    }

    xml.push_str("</WeatherData>");
    xml
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

fn to_markdown(records: &[WeatherRecord]) -> String {
    let mut md = String::from("# Weather Data Export\n\n");

    for (index, record) in records.iter().enumerate() {
        md.push_str(&format!(
            "## Record {}: {}\n\n",
            index + 1,
            record.location.name
        ));
        md.push_str(&format!(
            "- **Date**: {}\n",
            record.observed_at.format("%Y-%m-%d")
        ));

        let mut location_line = record.location.name.clone();
        if let Some(country) = &record.location.country {
            location_line.push_str(&format!(", {country}"));
        }
        if let Some(state) = &record.location.state {
            location_line.push_str(&format!(" ({state})"));
        }
        md.push_str(&format!("- **Location**: {location_line}\n"));

        md.push_str(&format!(
            "- **Coordinates**: {:.2}, {:.2}\n",
            record.location.lat, record.location.lon
        ));
        md.push_str(&format!(
            "- **Temperature**: {:.1}\u{b0}C / {:.1}\u{b0}F\n",
            kelvin_to_celsius(record.temp),
            kelvin_to_fahrenheit(record.temp)
        ));
        md.push_str(&format!(
            "- **Feels Like**: {:.1}\u{b0}C\n",
            kelvin_to_celsius(record.feels_like)
        ));
        md.push_str(&format!(
            "- **Min/Max**: {:.1}\u{b0}C / {:.1}\u{b0}C\n",
            kelvin_to_celsius(record.temp_min),
            kelvin_to_celsius(record.temp_max)
        ));
        md.push_str(&format!("- **Humidity**: {}%\n", record.humidity));
        md.push_str(&format!("- **Pressure**: {} hPa\n", record.pressure));
        md.push_str(&format!(
            "- **Wind**: {:.1} m/s, {}\u{b0} ({})\n",
            record.wind_speed,
            record.wind_deg,
            compass_direction(record.wind_deg)
        ));

        let descriptions: Vec<&str> = record
            .conditions
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        md.push_str(&format!("- **Conditions**: {}\n\n", descriptions.join(", ")));
    }

    md
}
