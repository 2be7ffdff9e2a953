use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::Store;
use crate::units::Units;

/// A forecast or record row joined with its area name.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub area_name: String,
    pub date: NaiveDate,
    pub weather: String,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
}

impl ReportRow {
    pub fn line(&self, units: Units) -> String {
        format!(
            "Date: {}, Area: {}, Weather: {}, Max Temp: {}, Min Temp: {}",
            self.date,
            self.area_name,
            self.weather,
            units.format_temp(self.max_temp),
            units.format_temp(self.min_temp),
        )
    }
}

fn row_to_report(row: &Row) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        area_name: row.get("area_name")?,
        date: row.get("day")?,
        weather: row.get("weather")?,
        max_temp: row.get("max_temp")?,
        min_temp: row.get("min_temp")?,
    })
}

impl Store {
    /// Stored forecasts for an area, oldest date first. Dates written with a
    /// time part (`2023-10-01 00:00:00`) are read back as the bare date.
    pub fn forecasts_for_area(&self, area_name: &str) -> Result<Vec<ReportRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT a.area_name, date(f.forecast_date) AS day, f.weather, f.max_temp, f.min_temp
                 FROM weather_forecast f
                 JOIN area a ON f.area_id = a.area_id
                 WHERE a.area_name = ?1
                 ORDER BY day",
            )?;
            let mut rows = stmt.query(params![area_name])?;
            let mut report = Vec::new();
            while let Some(row) = rows.next()? {
                report.push(row_to_report(row).context("failed to read forecast row")?);
            }
            Ok(report)
        })
    }

    /// Observed weather for an area on exactly `date`.
    pub fn records_for_area_on(&self, area_name: &str, date: NaiveDate) -> Result<Vec<ReportRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT a.area_name, date(r.record_date) AS day, r.weather, r.max_temp, r.min_temp
                 FROM weather_records r
                 JOIN area a ON r.area_id = a.area_id
                 WHERE a.area_name = ?1 AND date(r.record_date) = ?2
                 ORDER BY day",
            )?;
            let mut rows = stmt.query(params![area_name, date])?;
            let mut report = Vec::new();
            while let Some(row) = rows.next()? {
                report.push(row_to_report(row).context("failed to read record row")?);
            }
            Ok(report)
        })
    }
}

pub fn print_report(rows: &[ReportRow], units: Units) {
    for row in rows {
        println!("{}", row.line(units));
    }
}
