//! Static classification table for OpenWeather condition codes.
//!
//! Provider responses are normalized through this table rather than trusting
//! the provider's own text fields; unrecognized codes fall back to the clear
//! classification.

use crate::types::WeatherCondition;

struct ConditionEntry {
    code: u16,
    category: &'static str,
    description: &'static str,
    icon: &'static str,
}

const CLEAR: ConditionEntry = ConditionEntry {
    code: 800,
    category: "Clear",
    description: "clear sky",
    icon: "01d",
};

// Sorted by code; `classify` relies on the ordering.
const CONDITIONS: &[ConditionEntry] = &[
    ConditionEntry { code: 200, category: "Thunderstorm", description: "thunderstorm with light rain", icon: "11d" },
    ConditionEntry { code: 201, category: "Thunderstorm", description: "thunderstorm with rain", icon: "11d" },
    ConditionEntry { code: 202, category: "Thunderstorm", description: "thunderstorm with heavy rain", icon: "11d" },
    ConditionEntry { code: 210, category: "Thunderstorm", description: "light thunderstorm", icon: "11d" },
    ConditionEntry { code: 211, category: "Thunderstorm", description: "thunderstorm", icon: "11d" },
    ConditionEntry { code: 212, category: "Thunderstorm", description: "heavy thunderstorm", icon: "11d" },
    ConditionEntry { code: 221, category: "Thunderstorm", description: "ragged thunderstorm", icon: "11d" },
    ConditionEntry { code: 230, category: "Thunderstorm", description: "thunderstorm with light drizzle", icon: "11d" },
    ConditionEntry { code: 231, category: "Thunderstorm", description: "thunderstorm with drizzle", icon: "11d" },
    ConditionEntry { code: 232, category: "Thunderstorm", description: "thunderstorm with heavy drizzle", icon: "11d" },
    ConditionEntry { code: 300, category: "Drizzle", description: "light intensity drizzle", icon: "09d" },
    ConditionEntry { code: 301, category: "Drizzle", description: "drizzle", icon: "09d" },
    ConditionEntry { code: 302, category: "Drizzle", description: "heavy intensity drizzle", icon: "09d" },
    ConditionEntry { code: 310, category: "Drizzle", description: "light intensity drizzle rain", icon: "09d" },
    ConditionEntry { code: 311, category: "Drizzle", description: "drizzle rain", icon: "09d" },
    ConditionEntry { code: 312, category: "Drizzle", description: "heavy intensity drizzle rain", icon: "09d" },
    ConditionEntry { code: 313, category: "Drizzle", description: "shower rain and drizzle", icon: "09d" },
    ConditionEntry { code: 314, category: "Drizzle", description: "heavy shower rain and drizzle", icon: "09d" },
    ConditionEntry { code: 321, category: "Drizzle", description: "shower drizzle", icon: "09d" },
    ConditionEntry { code: 500, category: "Rain", description: "light rain", icon: "10d" },
    ConditionEntry { code: 501, category: "Rain", description: "moderate rain", icon: "10d" },
    ConditionEntry { code: 502, category: "Rain", description: "heavy intensity rain", icon: "10d" },
    ConditionEntry { code: 503, category: "Rain", description: "very heavy rain", icon: "10d" },
    ConditionEntry { code: 504, category: "Rain", description: "extreme rain", icon: "10d" },
    ConditionEntry { code: 511, category: "Rain", description: "freezing rain", icon: "13d" },
    ConditionEntry { code: 520, category: "Rain", description: "light intensity shower rain", icon: "09d" },
    ConditionEntry { code: 521, category: "Rain", description: "shower rain", icon: "09d" },
    ConditionEntry { code: 522, category: "Rain", description: "heavy intensity shower rain", icon: "09d" },
    ConditionEntry { code: 531, category: "Rain", description: "ragged shower rain", icon: "09d" },
    ConditionEntry { code: 600, category: "Snow", description: "light snow", icon: "13d" },
    ConditionEntry { code: 601, category: "Snow", description: "snow", icon: "13d" },
    ConditionEntry { code: 602, category: "Snow", description: "heavy snow", icon: "13d" },
    ConditionEntry { code: 611, category: "Snow", description: "sleet", icon: "13d" },
    ConditionEntry { code: 612, category: "Snow", description: "light shower sleet", icon: "13d" },
    ConditionEntry { code: 613, category: "Snow", description: "shower sleet", icon: "13d" },
    ConditionEntry { code: 615, category: "Snow", description: "light rain and snow", icon: "13d" },
    ConditionEntry { code: 616, category: "Snow", description: "rain and snow", icon: "13d" },
    ConditionEntry { code: 620, category: "Snow", description: "light shower snow", icon: "13d" },
    ConditionEntry { code: 621, category: "Snow", description: "shower snow", icon: "13d" },
    ConditionEntry { code: 622, category: "Snow", description: "heavy shower snow", icon: "13d" },
    ConditionEntry { code: 701, category: "Mist", description: "mist", icon: "50d" },
    ConditionEntry { code: 711, category: "Smoke", description: "smoke", icon: "50d" },
    ConditionEntry { code: 721, category: "Haze", description: "haze", icon: "50d" },
    ConditionEntry { code: 731, category: "Dust", description: "sand/dust whirls", icon: "50d" },
    ConditionEntry { code: 741, category: "Fog", description: "fog", icon: "50d" },
    ConditionEntry { code: 751, category: "Sand", description: "sand", icon: "50d" },
    ConditionEntry { code: 761, category: "Dust", description: "dust", icon: "50d" },
    ConditionEntry { code: 762, category: "Ash", description: "volcanic ash", icon: "50d" },
    ConditionEntry { code: 771, category: "Squall", description: "squalls", icon: "50d" },
    ConditionEntry { code: 781, category: "Tornado", description: "tornado", icon: "50d" },
    ConditionEntry { code: 800, category: "Clear", description: "clear sky", icon: "01d" },
    ConditionEntry { code: 801, category: "Clouds", description: "few clouds", icon: "02d" },
    ConditionEntry { code: 802, category: "Clouds", description: "scattered clouds", icon: "03d" },
    ConditionEntry { code: 803, category: "Clouds", description: "broken clouds", icon: "04d" },
    ConditionEntry { code: 804, category: "Clouds", description: "overcast clouds", icon: "04d" },
];

impl ConditionEntry {
    fn to_condition(&self) -> WeatherCondition {
        WeatherCondition {
            code: self.code,
            category: self.category.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
        }
    }
}

/// Classify a provider condition code; unrecognized codes default to clear.
pub fn classify(code: u16) -> WeatherCondition {
    match CONDITIONS.binary_search_by_key(&code, |entry| entry.code) {
        Ok(index) => CONDITIONS[index].to_condition(),
        Err(_) => CLEAR.to_condition(),
    }
}

/// The fallback condition used when a provider reports no conditions at all.
pub fn default_condition() -> WeatherCondition {
    CLEAR.to_condition()
}

/// Provider image URL for a condition icon code.
pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@4x.png")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn table_is_sorted_by_code() {
        for pair in CONDITIONS.windows(2) {
            assert!(pair[0].code < pair[1].code);
        }
    }

    #[test]
    fn classify_thunderstorm() {
        let condition = classify(200);
        assert_eq!(condition.category, "Thunderstorm");
        assert_eq!(condition.icon, "11d");
    }

    #[test]
    fn classify_drizzle() {
        assert_eq!(classify(301).category, "Drizzle");
    }

    #[test]
    fn classify_rain() {
        let condition = classify(500);
        assert_eq!(condition.category, "Rain");
        assert_eq!(condition.description, "light rain");
        assert_eq!(condition.icon, "10d");
    }

    #[test]
    fn classify_freezing_rain_uses_snow_icon() {
        assert_eq!(classify(511).icon, "13d");
    }

    #[test]
    fn classify_snow() {
        assert_eq!(classify(600).category, "Snow");
    }

    #[test]
    fn classify_atmosphere_group() {
        assert_eq!(classify(701).description, "mist");
        assert_eq!(classify(741).category, "Fog");
        assert_eq!(classify(781).category, "Tornado");
    }

    #[test]
    fn classify_clear_and_clouds() {
        assert_eq!(classify(800).description, "clear sky");
        assert_eq!(classify(801).description, "few clouds");
        assert_eq!(classify(804).description, "overcast clouds");
    }

    #[test]
    fn unknown_code_defaults_to_clear() {
        assert_eq!(classify(999).code, 800);
        assert_eq!(classify(0).category, "Clear");
    }

    #[test]
    fn default_condition_is_clear() {
        let condition = default_condition();
        assert_eq!(condition.code, 800);
        assert_eq!(condition.description, "clear sky");
    }

    #[test]
    fn icon_url_embeds_code() {
        assert_eq!(
            icon_url("10d"),
            "https://openweathermap.org/img/wn/10d@4x.png"
        );
    }
}
