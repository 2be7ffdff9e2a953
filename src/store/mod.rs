//! SQLite persistence for forecasts and observed weather.
//!
//! Every operation opens its own connection and drops it before returning,
//! so nothing holds the database file between calls.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

mod reports;

pub use reports::{print_report, ReportRow};

const SCHEMA: &str = include_str!("schema.sql");

/// One day of weather for an area, predicted or observed.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub weather: String,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    fn with_connection<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = Connection::open(&self.db_path).with_context(|| {
            format!("failed to open SQLite database {}", self.db_path.display())
        })?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .context("failed to enable foreign keys")?;
        task(&conn)
    }

    /// Creates the area, forecast and record tables when missing. Existing
    /// tables and rows are left alone.
    pub fn create_tables(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)
                .context("failed to execute schema.sql")?;
            tracing::info!(path = %self.path().display(), "tables ready");
            Ok(())
        })
    }

    /// Appends forecasts for `area_name`, creating the area on first use.
    ///
    /// Rows are written one at a time outside a transaction. If `rows` yields
    /// an error, the rows before it stay in the table.
    pub fn append_forecasts<I>(&self, area_name: &str, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<DailyWeather>>,
    {
        self.with_connection(|conn| {
            let area_id = ensure_area(conn, area_name)?;
            let mut inserted = 0;
            for row in rows {
                let row = row?;
                conn.execute(
                    "INSERT INTO weather_forecast (area_id, forecast_date, weather, max_temp, min_temp)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![area_id, row.date, row.weather, row.max_temp, row.min_temp],
                )
                .with_context(|| format!("failed to insert forecast for {}", row.date))?;
                inserted += 1;
            }
            tracing::info!(area = area_name, inserted, "forecasts stored");
            Ok(inserted)
        })
    }

    pub fn insert_record(&self, area_name: &str, row: &DailyWeather) -> Result<i64> {
        self.with_connection(|conn| {
            let area_id = ensure_area(conn, area_name)?;
            conn.execute(
                "INSERT INTO weather_records (area_id, record_date, weather, max_temp, min_temp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![area_id, row.date, row.weather, row.max_temp, row.min_temp],
            )
            .with_context(|| format!("failed to insert record for {}", row.date))?;
            Ok(conn.last_insert_rowid())
        })
    }
}

fn ensure_area(conn: &Connection, area_name: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO area (area_name) VALUES (?1)",
        params![area_name],
    )
    .with_context(|| format!("failed to insert area {area_name}"))?;
    conn.query_row(
        "SELECT area_id FROM area WHERE area_name = ?1",
        params![area_name],
        |row| row.get(0),
    )
    .with_context(|| format!("failed to look up area {area_name}"))
}
