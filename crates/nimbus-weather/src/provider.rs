//! OpenWeather API client.
//!
//! Requests are made without a `units` parameter, so temperatures arrive in
//! Kelvin — the canonical stored unit. Condition codes are normalized through
//! the static classification table rather than trusting provider text.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::conditions;
use crate::error::WeatherError;
use crate::types::{Precipitation, WeatherLocation, WeatherRecord};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    pub fn new_with_base_url(api_key: &str, base_url: &str) -> Result<Self, WeatherError> {
        let mut client = Self::new(api_key)?;
        client.base_url = base_url.to_string();
        Ok(client)
    }

    /// Geocode a free-form query to candidate locations.
    #[instrument(skip(self), level = "info")]
    pub async fn search_locations(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<WeatherLocation>, WeatherError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let limit = limit.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let entries: Vec<GeoEntry> = self.handle_response(response).await?;

        Ok(entries
            .into_iter()
            .map(|entry| WeatherLocation {
                name: entry.name,
                lat: entry.lat,
                lon: entry.lon,
                country: entry.country,
                state: entry.state,
            })
            .collect())
    }

    /// Current conditions at a location.
    #[instrument(skip(self, location), fields(location = %location.name), level = "info")]
    pub async fn current_weather(
        &self,
        location: &WeatherLocation,
    ) -> Result<WeatherRecord, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = location.lat.to_string();
        let lon = location.lon.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let observation: ApiObservation = self.handle_response(response).await?;
        Ok(observation.into_record(location, Utc::now()))
    }

    /// Historical observations for a location over a time range.
    #[instrument(skip(self, location), fields(location = %location.name), level = "info")]
    pub async fn historical_weather(
        &self,
        location: &WeatherLocation,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherRecord>, WeatherError> {
        let url = format!("{}/data/2.5/history/city", self.base_url);
        let lat = location.lat.to_string();
        let lon = location.lon.to_string();
        let start = start.timestamp().to_string();
        let end = end.timestamp().to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("type", "hour"),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let history: HistoryResponse = self.handle_response(response).await?;
        let search_time = Utc::now();

        Ok(history
            .list
            .into_iter()
            .map(|observation| observation.into_record(location, search_time))
            .collect())
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(e.to_string()))
        } else if status.as_u16() == 401 {
            Err(WeatherError::InvalidApiKey)
        } else if status.as_u16() == 404 {
            let text = response.text().await.unwrap_or_default();
            Err(WeatherError::LocationNotFound(text))
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(WeatherError::RateLimited(retry_after))
        } else if status.is_server_error() {
            Err(WeatherError::ServiceUnavailable)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(WeatherError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ApiWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct ApiClouds {
    all: u8,
}

#[derive(Debug, Deserialize)]
struct ApiConditionTag {
    id: u16,
}

#[derive(Debug, Deserialize)]
struct ApiPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

/// One observation as the provider reports it, shared by the current-weather
/// response body and the entries of the historical response.
#[derive(Debug, Deserialize)]
struct ApiObservation {
    dt: i64,
    main: ApiMain,
    visibility: Option<u32>,
    wind: Option<ApiWind>,
    clouds: Option<ApiClouds>,
    #[serde(default)]
    weather: Vec<ApiConditionTag>,
    rain: Option<ApiPrecipitation>,
    snow: Option<ApiPrecipitation>,
    sys: Option<ApiSys>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    list: Vec<ApiObservation>,
}

impl ApiPrecipitation {
    fn into_precipitation(self) -> Precipitation {
        Precipitation {
            one_hour: self.one_hour,
            three_hours: self.three_hours,
        }
    }
}

impl ApiObservation {
    fn into_record(self, location: &WeatherLocation, search_time: DateTime<Utc>) -> WeatherRecord {
        let observed_at = DateTime::from_timestamp(self.dt, 0).unwrap_or(search_time);

        let mut normalized: Vec<_> = self
            .weather
            .iter()
            .map(|tag| conditions::classify(tag.id))
            .collect();
        if normalized.is_empty() {
            normalized.push(conditions::default_condition());
        }

        let wind = self.wind.unwrap_or(ApiWind { speed: 0.0, deg: 0 });
        let (sunrise, sunset) = match self.sys {
            Some(sys) => (sys.sunrise, sys.sunset),
            None => (None, None),
        };

        WeatherRecord {
            id: None,
            location: location.clone(),
            search_time,
            observed_at,
            temp: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            pressure: self.main.pressure,
            humidity: self.main.humidity,
            visibility: self.visibility.unwrap_or_default(),
            wind_speed: wind.speed,
            wind_deg: wind.deg,
            clouds: self.clouds.map(|c| c.all).unwrap_or_default(),
            conditions: normalized,
            rain: self.rain.map(ApiPrecipitation::into_precipitation),
            snow: self.snow.map(ApiPrecipitation::into_precipitation),
            sunrise,
            sunset,
        }
    }
}
