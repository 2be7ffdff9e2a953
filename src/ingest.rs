use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::WxError;
use crate::jma::get_json_with_query;
use crate::store::{DailyWeather, Store};

pub const FORECAST_API_URL: &str = "https://api.weather.com/v1/forecast";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize, Debug)]
pub struct ForecastResponse {
    pub forecasts: Vec<ForecastItem>,
}

#[derive(Deserialize, Debug)]
pub struct ForecastItem {
    pub date: String,
    pub weather: String,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
}

impl ForecastItem {
    pub fn to_daily(&self) -> Result<DailyWeather, WxError> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|source| {
            WxError::Date {
                value: self.date.clone(),
                source,
            }
        })?;
        Ok(DailyWeather {
            date,
            weather: self.weather.clone(),
            max_temp: self.max_temp,
            min_temp: self.min_temp,
        })
    }
}

pub fn fetch_forecasts(api_url: &str, area_name: &str, api_key: &str) -> Result<ForecastResponse, WxError> {
    tracing::info!(area = area_name, "fetching forecasts");
    get_json_with_query(api_url, &[("area", area_name), ("apikey", api_key)])
}

/// Stores every forecast in `response` for `area_name`. Stops at the first
/// date that fails to parse; rows before it are kept.
pub fn store_forecasts(store: &Store, area_name: &str, response: &ForecastResponse) -> Result<usize> {
    let rows = response
        .forecasts
        .iter()
        .map(|item| item.to_daily().map_err(anyhow::Error::from));
    store.append_forecasts(area_name, rows)
}

pub fn ingest_area(store: &Store, api_url: &str, area_name: &str, api_key: &str) -> Result<usize> {
    let response = fetch_forecasts(api_url, area_name, api_key)
        .with_context(|| format!("failed to fetch forecasts for {area_name}"))?;
    store_forecasts(store, area_name, &response)
        .with_context(|| format!("failed to store forecasts for {area_name}"))
}
