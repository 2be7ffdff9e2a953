use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

use crate::error::WxError;
use crate::jma::forecast;
use crate::weather::{render_forecast, DisplayItem, RegionEntry};

const TITLE: &str = "天気予報アプリ";
const UNAVAILABLE: &str = "天気予報が利用できません";
const SCROLL_STEP: u16 = 10;

pub struct App {
    regions: Vec<RegionEntry>,
    forecast_url: String,
    nav: ListState,
    items: Vec<DisplayItem>,
    scroll: u16,
}

impl App {
    pub fn new(regions: Vec<RegionEntry>, forecast_url: impl Into<String>) -> Self {
        let mut nav = ListState::default();
        if !regions.is_empty() {
            nav.select(Some(0));
        }
        Self {
            regions,
            forecast_url: forecast_url.into(),
            nav,
            items: Vec::new(),
            scroll: 0,
        }
    }

    /// Fetches the selected region and replaces the forecast pane. On failure
    /// the previous forecast stays on screen.
    pub fn refresh(&mut self) {
        let index = self.nav.selected().unwrap_or(0);
        if let Err(err) = self.try_refresh(index) {
            tracing::warn!(index, "failed to fetch weather data: {err}");
        }
    }

    fn try_refresh(&mut self, index: usize) -> Result<(), WxError> {
        if self.regions.is_empty() {
            tracing::warn!("no region codes available");
            return Ok(());
        }
        let doc = forecast::from_jma(&self.forecast_url, &self.regions, index)?;
        tracing::debug!(?doc, "retrieved weather data");
        self.show(render_forecast(&doc)?);
        Ok(())
    }

    fn show(&mut self, items: Vec<DisplayItem>) {
        self.items = items;
        self.scroll = 0;
    }

    fn select_next(&mut self) -> bool {
        match self.nav.selected() {
            Some(i) if i + 1 < self.regions.len() => {
                self.nav.select(Some(i + 1));
                true
            }
            _ => false,
        }
    }

    fn select_previous(&mut self) -> bool {
        match self.nav.selected() {
            Some(i) if i > 0 => {
                self.nav.select(Some(i - 1));
                true
            }
            _ => false,
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    app.refresh();
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let changed = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::PageDown => {
                app.scroll = app.scroll.saturating_add(SCROLL_STEP);
                false
            }
            KeyCode::PageUp => {
                app.scroll = app.scroll.saturating_sub(SCROLL_STEP);
                false
            }
            _ => false,
        };
        if changed {
            // the fetch blocks the loop until the server answers
            app.refresh();
        }
    }
}

fn display_item(item: &DisplayItem) -> Vec<Line<'_>> {
    match item {
        DisplayItem::AreaHeader(name) => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{name}の天気予報:"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ],
        DisplayItem::Entry(entry) => vec![
            Line::from(vec![
                Span::raw("  日時: "),
                Span::styled(entry.timestamp.as_str(), Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::raw("  天気: "),
                Span::styled(
                    entry.weather_description.as_str(),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(""),
        ],
        DisplayItem::Unavailable => vec![Line::from(UNAVAILABLE)],
    }
}

fn pane(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn ui(f: &mut Frame, app: &mut App) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    );
    f.render_widget(header, vert_layout[0]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)])
        .split(vert_layout[1]);

    let nav_items: Vec<ListItem> = app
        .regions
        .iter()
        .map(|r| ListItem::new(r.office_name.as_str()))
        .collect();
    let nav = List::new(nav_items)
        .block(pane("Regions"))
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(nav, chunks[0], &mut app.nav);

    let lines: Vec<Line> = app.items.iter().flat_map(display_item).collect();
    let forecast = Paragraph::new(lines)
        .block(pane("Forecast"))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(forecast, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::ForecastDisplayEntry;
    use ratatui::backend::TestBackend;

    fn regions() -> Vec<RegionEntry> {
        ["Sapporo", "Sendai", "Tokyo"]
            .iter()
            .enumerate()
            .map(|(i, name)| RegionEntry {
                region_code: format!("{i}00000"),
                office_name: name.to_string(),
            })
            .collect()
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = App::new(regions(), "http://127.0.0.1:9/");
        assert_eq!(app.nav.selected(), Some(0));
        assert!(!app.select_previous());
        assert!(app.select_next());
        assert!(app.select_next());
        assert!(!app.select_next());
        assert_eq!(app.nav.selected(), Some(2));
    }

    #[test]
    fn test_empty_regions_select_nothing() {
        let mut app = App::new(Vec::new(), "http://127.0.0.1:9/");
        assert_eq!(app.nav.selected(), None);
        assert!(!app.select_next());
        app.refresh();
        assert!(app.items.is_empty());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_items() {
        let mut app = App::new(regions(), "http://127.0.0.1:9/");
        let previous = vec![DisplayItem::Unavailable];
        app.show(previous.clone());
        app.refresh();
        assert_eq!(app.items, previous);
    }

    #[test]
    fn test_ui_shows_regions_and_cards() {
        let mut app = App::new(regions(), "http://127.0.0.1:9/");
        app.show(vec![
            DisplayItem::AreaHeader("Tokyo".to_string()),
            DisplayItem::Entry(ForecastDisplayEntry {
                area_name: "Tokyo".to_string(),
                timestamp: "2023-10-01T00:00:00+09:00".to_string(),
                weather_description: "Sunny".to_string(),
            }),
        ]);
        let text = screen(&mut app);
        assert!(text.contains("Sapporo"));
        assert!(text.contains("Sendai"));
        assert!(text.contains("2023-10-01T00:00:00+09:00"));
        assert!(text.contains("Sunny"));
    }
}
