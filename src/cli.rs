use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::{styling::AnsiColor, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::ingest::{API_KEY_PLACEHOLDER, FORECAST_API_URL};
use crate::jma::{area::AREA_LIST_URL, forecast::FORECAST_BASE_URL};
use crate::units::Units;

const ABOUT: &str = "JMA weather forecast viewer";

const LONG_ABOUT: &str = "
Browse regional forecasts published by the Japan Meteorological Agency, and keep a local SQLite
history of forecasts and observed weather.

With no subcommand, `wx` opens the region browser. Use the arrow keys (or j/k) to pick a forecast
office, PageUp/PageDown to scroll the forecast, and q to quit.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(long, global = true, help = "Write diagnostics to this file")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse forecasts by region (default)
    View(ViewArgs),
    /// Fetch forecasts for an area into the database and print the stored history
    Store(StoreArgs),
    /// Save an observed day of weather for an area
    Record(RecordArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ViewArgs {
    #[arg(long, default_value = AREA_LIST_URL, help = "Area list endpoint")]
    pub area_url: String,

    #[arg(long, default_value = FORECAST_BASE_URL, help = "Base URL for <region>.json forecasts")]
    pub forecast_url: String,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            area_url: AREA_LIST_URL.to_string(),
            forecast_url: FORECAST_BASE_URL.to_string(),
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct StoreArgs {
    #[arg(long, default_value = "weather.db", help = "SQLite database file")]
    pub db: PathBuf,

    #[arg(long, default_value = "Tokyo", help = "Area to fetch and report on")]
    pub area: String,

    #[arg(long, default_value = "2023-10-01", help = "Date of past records to print (YYYY-MM-DD)")]
    pub date: NaiveDate,

    #[arg(long, default_value = FORECAST_API_URL, help = "Forecast API endpoint")]
    pub api_url: String,

    #[arg(long, env = "WX_API_KEY", default_value = API_KEY_PLACEHOLDER, hide_env_values = true)]
    pub api_key: String,

    #[arg(long, value_enum, default_value_t = Units::Metric)]
    pub units: Units,
}

#[derive(ClapArgs, Debug)]
pub struct RecordArgs {
    #[arg(long, default_value = "weather.db", help = "SQLite database file")]
    pub db: PathBuf,

    #[arg(long)]
    pub area: String,

    #[arg(long, help = "Observation date (YYYY-MM-DD)")]
    pub date: NaiveDate,

    #[arg(long)]
    pub weather: String,

    #[arg(long, help = "Maximum temperature in Celsius")]
    pub max_temp: Option<f64>,

    #[arg(long, help = "Minimum temperature in Celsius")]
    pub min_temp: Option<f64>,
}
