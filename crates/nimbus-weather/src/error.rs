//! Error types for the weather engine.

use thiserror::Error;

/// Provider client errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Weather service unavailable")]
    ServiceUnavailable,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// User-friendly error message for presentation output.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::InvalidApiKey => "Weather API key is invalid. Check your configuration.".to_string(),
            Self::LocationNotFound(_) => "Location not found. Check and try again.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::ServiceUnavailable => {
                "Weather service unavailable. Please try again later.".to_string()
            }
            Self::Api { .. } => "Weather service error. Please try again.".to_string(),
            Self::Parse(_) => "Received an unexpected response. Please try again.".to_string(),
        }
    }

    /// Whether this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited(_) | Self::ServiceUnavailable
        )
    }
}

/// Record store errors.
///
/// An unreadable persisted collection is not an error here; it reads as an
/// empty collection. These variants cover the storage medium itself failing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record collection: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// User-friendly error message for presentation output.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(_) => "Unable to access saved records. Please try again.".to_string(),
            Self::Encode(_) => "Failed to write saved records.".to_string(),
        }
    }
}

/// Export errors.
///
/// `UnsupportedFormat` raises to the caller: asking for an unknown format is a
/// programming or configuration mistake, not a transient condition.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV export failed: {0}")]
    Csv(String),

    #[error("JSON export failed: {0}")]
    Json(String),
}

impl ExportError {
    /// User-friendly error message for presentation output.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat(format) => {
                format!("Export format '{}' is not supported.", format)
            }
            Self::Csv(_) | Self::Json(_) => "Failed to export data.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn rate_limited_message_includes_wait() {
        let err = WeatherError::RateLimited(30);
        assert!(err.user_message().contains("30"));
    }

    #[test]
    fn unsupported_format_names_the_format() {
        let err = ExportError::UnsupportedFormat("pdf".to_string());
        assert!(err.to_string().contains("pdf"));
        assert!(err.user_message().contains("pdf"));
    }

    #[test]
    fn retryable_classification() {
        assert!(WeatherError::ServiceUnavailable.is_retryable());
        assert!(WeatherError::RateLimited(10).is_retryable());
        assert!(!WeatherError::InvalidApiKey.is_retryable());
    }
}
