//! Weather engine for Nimbus
//!
//! Provides the canonical weather record model, the OpenWeather provider
//! client, local record persistence with CRUD, and multi-format export.

pub mod conditions;
pub mod error;
pub mod export;
pub mod provider;
pub mod store;
pub mod types;

pub use error::{ExportError, StoreError, WeatherError};
pub use export::ExportFormat;
pub use provider::OpenWeatherClient;
pub use store::{FileStorage, MemoryStorage, RecordStore, StorageBackend};
pub use types::{RecordPatch, WeatherCondition, WeatherLocation, WeatherRecord};
