use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use nimbus_core::{Config, TemperatureUnit};
use nimbus_weather::export::{self, ExportFormat};
use nimbus_weather::store::{FileStorage, RecordStore};
use nimbus_weather::types::{celsius_to_kelvin, kelvin_to_celsius, RecordPatch, WeatherLocation};
use nimbus_weather::{OpenWeatherClient, WeatherError};

use crate::output;

const SEARCH_LIMIT: u8 = 5;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nimbus", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Celsius,
    Fahrenheit,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display preferences.
    Configure {
        /// OpenWeather API key.
        #[arg(long)]
        api_key: Option<String>,

        /// Temperature unit for display output.
        #[arg(long, value_enum)]
        units: Option<UnitArg>,
    },

    /// Search for locations matching a query.
    Search {
        /// City, zip code, or landmark.
        query: String,
    },

    /// Fetch current weather for the best match of a query.
    Current {
        query: String,

        /// Persist the fetched record.
        #[arg(long)]
        save: bool,
    },

    /// Fetch historical weather for a query over a date range.
    History {
        query: String,

        /// Range start, YYYY-MM-DD.
        #[arg(long)]
        from: NaiveDate,

        /// Range end, YYYY-MM-DD.
        #[arg(long)]
        to: NaiveDate,

        /// Persist every fetched record.
        #[arg(long)]
        save: bool,
    },

    /// List saved weather records.
    List,

    /// Show a saved record in full.
    Show { id: String },

    /// Edit a saved record. Temperatures are given in Celsius.
    Edit {
        id: String,

        #[arg(long, allow_negative_numbers = true)]
        temp: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        feels_like: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        temp_min: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        temp_max: Option<f64>,

        /// Relative humidity, percent.
        #[arg(long)]
        humidity: Option<u8>,

        /// Wind speed, m/s.
        #[arg(long)]
        wind_speed: Option<f64>,
    },

    /// Delete a saved record.
    Delete { id: String },

    /// Export saved records to a file (csv, json, xml, md).
    Export {
        format: String,

        /// Output path; defaults to a timestamped filename.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { api_key, units } => configure(api_key, units),
            Command::Search { query } => search(&query).await,
            Command::Current { query, save } => current(&query, save).await,
            Command::History {
                query,
                from,
                to,
                save,
            } => history(&query, from, to, save).await,
            Command::List => list(),
            Command::Show { id } => show(&id),
            Command::Edit {
                id,
                temp,
                feels_like,
                temp_min,
                temp_max,
                humidity,
                wind_speed,
            } => edit(&id, temp, feels_like, temp_min, temp_max, humidity, wind_speed),
            Command::Delete { id } => delete(&id),
            Command::Export { format, output } => export_records(&format, output),
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load()?;
    let report = config.validate();

    if !report.is_valid() {
        bail!(
            "Configuration validation failed: {}",
            report.errors.join("; ")
        );
    }
    for warning in &report.warnings {
        tracing::warn!("Config warning: {warning}");
    }

    Ok(config)
}

fn open_store(config: &Config) -> RecordStore<FileStorage> {
    RecordStore::at_path(config.records_path())
}

fn build_client(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    if !config.provider.is_configured() {
        bail!(
            "No API key configured.\n\
             Hint: run `nimbus configure --api-key <key>` first."
        );
    }

    Ok(OpenWeatherClient::new(config.provider.api_key.clone())?)
}

/// Degrade a provider failure to a user-facing message instead of crashing.
fn degrade<T>(result: Result<T, WeatherError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Provider request failed: {err}");
            eprintln!("{}", err.user_message());
            None
        }
    }
}

async fn resolve_location(
    client: &OpenWeatherClient,
    query: &str,
) -> anyhow::Result<Option<WeatherLocation>> {
    let Some(mut results) = degrade(client.search_locations(query, SEARCH_LIMIT).await) else {
        return Ok(None);
    };

    if results.is_empty() {
        println!("No locations found. Try a different search term.");
        return Ok(None);
    }

    Ok(Some(results.remove(0)))
}

fn configure(api_key: Option<String>, units: Option<UnitArg>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if api_key.is_none() && units.is_none() {
        println!("Config file: {}", Config::config_path().display());
        println!(
            "API key configured: {}",
            if config.provider.is_configured() { "yes" } else { "no" }
        );
        return Ok(());
    }

    if let Some(key) = api_key {
        config.provider.api_key = key;
    }
    if let Some(unit) = units {
        config.display.temperature_unit = unit.into();
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_path().display());
    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let Some(results) = degrade(client.search_locations(query, SEARCH_LIMIT).await) else {
        return Ok(());
    };

    if results.is_empty() {
        println!("No locations found. Try a different search term.");
        return Ok(());
    }

    for (index, location) in results.iter().enumerate() {
        println!(
            "{}. {} ({:.2}, {:.2})",
            index + 1,
            output::format_location(location),
            location.lat,
            location.lon
        );
    }
    Ok(())
}

async fn current(query: &str, save: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = build_client(&config)?;

    let Some(location) = resolve_location(&client, query).await? else {
        return Ok(());
    };
    println!("Location set to {}\n", output::format_location(&location));

    let Some(record) = degrade(client.current_weather(&location).await) else {
        return Ok(());
    };
    output::print_detail(&record, config.display.temperature_unit);

    if save {
        let store = open_store(&config);
        let id = store.save(&record)?;
        println!("\nSaved weather record {id}");
    }
    Ok(())
}

async fn history(query: &str, from: NaiveDate, to: NaiveDate, save: bool) -> anyhow::Result<()> {
    if from > to {
        bail!("--from must not be after --to");
    }
    let today = Utc::now().date_naive();
    if from > today || to > today {
        bail!("Cannot search for future dates. Please select dates in the past.");
    }

    let config = load_config()?;
    let client = build_client(&config)?;

    let Some(location) = resolve_location(&client, query).await? else {
        return Ok(());
    };

    let start = from.and_time(NaiveTime::MIN).and_utc();
    let end = to.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::days(1);

    let Some(records) = degrade(client.historical_weather(&location, start, end).await) else {
        return Ok(());
    };

    if records.is_empty() {
        println!("No historical weather data available for the selected period.");
        return Ok(());
    }

    for record in &records {
        output::print_summary(record, config.display.temperature_unit);
    }

    if save {
        let store = open_store(&config);
        let mut saved = 0;
        for record in &records {
            // Records that already carry an id are persisted already.
            if record.is_saved() {
                continue;
            }
            store.save(record)?;
            saved += 1;
        }
        if saved > 0 {
            println!("\nSaved {saved} historical weather records");
        } else {
            println!("\nNo new records to save");
        }
    }
    Ok(())
}

fn list() -> anyhow::Result<()> {
    let config = load_config()?;
    let store = open_store(&config);

    let records = store.list()?;
    if records.is_empty() {
        println!("No saved records.");
        return Ok(());
    }

    for record in &records {
        output::print_summary(record, config.display.temperature_unit);
    }
    Ok(())
}

fn show(id: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let store = open_store(&config);

    match store.get_by_id(id)? {
        Some(record) => output::print_detail(&record, config.display.temperature_unit),
        None => println!("No record with id {id}."),
    }
    Ok(())
}

fn edit(
    id: &str,
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<u8>,
    wind_speed: Option<f64>,
) -> anyhow::Result<()> {
    let patch = RecordPatch {
        temp: temp.map(celsius_to_kelvin),
        feels_like: feels_like.map(celsius_to_kelvin),
        temp_min: temp_min.map(celsius_to_kelvin),
        temp_max: temp_max.map(celsius_to_kelvin),
        humidity,
        wind_speed,
        ..RecordPatch::default()
    };
    if patch.is_empty() {
        bail!("Nothing to update. Pass at least one field to change.");
    }

    let config = load_config()?;
    let store = open_store(&config);

    let Some(record) = store.get_by_id(id)? else {
        bail!("No record with id {id}.");
    };

    // Validate min <= max against the merged state, in Celsius at the boundary.
    let merged_min = temp_min.unwrap_or_else(|| kelvin_to_celsius(record.temp_min));
    let merged_max = temp_max.unwrap_or_else(|| kelvin_to_celsius(record.temp_max));
    if merged_min > merged_max {
        bail!("Minimum temperature cannot be higher than maximum temperature");
    }

    if store.update(id, &patch)? {
        println!("Weather record updated.");
    } else {
        bail!("No record with id {id}.");
    }
    Ok(())
}

fn delete(id: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let store = open_store(&config);

    if store.delete(id)? {
        println!("Weather record deleted.");
    } else {
        println!("No record with id {id}.");
    }
    Ok(())
}

fn export_records(format_name: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    // Unknown formats raise before anything is written.
    let format = ExportFormat::parse(format_name)?;

    let config = load_config()?;
    let store = open_store(&config);

    let records = store.list()?;
    if records.is_empty() {
        println!("No saved records to export.");
        return Ok(());
    }

    let content = export::serialize(&records, format)?;
    let path =
        output.unwrap_or_else(|| PathBuf::from(export::default_filename(format, Utc::now())));

    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    println!(
        "Exported {} records to {} ({})",
        records.len(),
        path.display(),
        format.mime_type()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_history_date_range() {
        let cli = Cli::parse_from([
            "nimbus", "history", "Springfield", "--from", "2024-04-01", "--to", "2024-04-05",
        ]);
        match cli.command {
            Command::History { from, to, save, .. } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
                assert!(!save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_edit_temperatures() {
        let cli = Cli::parse_from([
            "nimbus", "edit", "abc123", "--temp", "21.5", "--temp-max", "25.0",
        ]);
        match cli.command {
            Command::Edit { id, temp, temp_max, temp_min, .. } => {
                assert_eq!(id, "abc123");
                assert_eq!(temp, Some(21.5));
                assert_eq!(temp_max, Some(25.0));
                assert!(temp_min.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unit_arg_maps_to_config_unit() {
        assert_eq!(
            TemperatureUnit::from(UnitArg::Fahrenheit),
            TemperatureUnit::Fahrenheit
        );
    }
}
