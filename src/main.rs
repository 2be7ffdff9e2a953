use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, io, path::Path, sync::Mutex};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

mod app;
mod cli;
mod error;
mod ingest;
mod jma;
mod store;
mod units;
mod weather;

use crate::app::{run_app, App};
use crate::cli::{Args, Command, RecordArgs, StoreArgs, ViewArgs};
use crate::jma::area::AreaList;
use crate::store::{print_report, DailyWeather, Store};

fn init_tracing(log_file: Option<&Path>, tui: bool) -> Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        // the TUI owns the terminal, so without a file there is nowhere to log
        None if tui => return Ok(()),
        None => BoxMakeWriter::new(io::stderr),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .init();
    Ok(())
}

/// Leaves raw mode and the alternate screen when dropped, so every exit from
/// the browser restores the terminal, including failed setup.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        Self::enter_with(enter_terminal, restore_terminal)
    }

    fn enter_with(setup: impl FnOnce() -> io::Result<()>, restore: fn()) -> io::Result<Self> {
        let guard = Self { restore };
        setup()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)()
    }
}

fn enter_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)
}

fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        tracing::warn!("failed to disable raw mode: {err}");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        tracing::warn!("failed to leave alternate screen: {err}");
    }
}

fn view(args: &ViewArgs) -> Result<()> {
    let regions = AreaList::from_jma(&args.area_url)
        .and_then(|list| list.regions())
        .context("failed to fetch area list")?;
    let mut app = App::new(regions, args.forecast_url.as_str());

    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    run_app(&mut terminal, &mut app)?;
    Ok(())
}

fn store(args: &StoreArgs) -> Result<()> {
    let store = Store::new(&args.db);
    store.create_tables()?;

    ingest::ingest_area(&store, &args.api_url, &args.area, &args.api_key)?;

    print_report(&store.forecasts_for_area(&args.area)?, args.units);
    print_report(&store.records_for_area_on(&args.area, args.date)?, args.units);
    Ok(())
}

fn record(args: &RecordArgs) -> Result<()> {
    let store = Store::new(&args.db);
    store.create_tables()?;
    let id = store.insert_record(
        &args.area,
        &DailyWeather {
            date: args.date,
            weather: args.weather.clone(),
            max_temp: args.max_temp,
            min_temp: args.min_temp,
        },
    )?;
    tracing::info!(record_id = id, area = %args.area, date = %args.date, "record saved");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let command = args
        .command
        .unwrap_or_else(|| Command::View(ViewArgs::default()));
    init_tracing(
        args.log_file.as_deref(),
        matches!(command, Command::View(_)),
    )?;

    match command {
        Command::View(view_args) => view(&view_args),
        Command::Store(store_args) => store(&store_args),
        Command::Record(record_args) => record(&record_args),
    }
}
