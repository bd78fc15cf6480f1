//! Live matching dashboard (TUI).
//!
//! Two pollers feed the matrix and stats slots over one channel. Results are
//! committed through [`LatestSlot`], so a slow response never replaces a
//! newer one and a failed refresh leaves the last data on screen marked stale.

use std::io::{stdout, Stdout};
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use tokio::sync::mpsc;

use udm_dash::config::Settings;
use udm_dash::filter::{conversion_rate, progress_width, status_counts};
use udm_dash::models::{MatchingItem, MatchingMatrix, MatchingStats, MatchingStatus, UdmStatus};
use udm_dash::{
    ApiClient, ApiError, DashboardState, LatestSlot, Poller, RequestTicket, SortKey,
};

use crate::cli::helpers::{format_duration, format_number, text_bar, truncate_string};

enum LiveMessage {
    Matrix(RequestTicket, Result<MatchingMatrix, ApiError>),
    Stats(RequestTicket, Result<MatchingStats, ApiError>),
}

/// Everything the draw function needs.
struct LiveView {
    state: DashboardState,
    matrix: LatestSlot<MatchingMatrix>,
    stats: LatestSlot<MatchingStats>,
    /// Search text being typed, while in search mode.
    search_input: Option<String>,
    last_updated: String,
}

impl LiveView {
    fn new() -> Self {
        Self {
            state: DashboardState::new(),
            matrix: LatestSlot::new(),
            stats: LatestSlot::new(),
            search_input: None,
            last_updated: "-".to_string(),
        }
    }

    fn items(&self) -> &[MatchingItem] {
        self.matrix
            .value()
            .map(|m| m.items.as_slice())
            .unwrap_or_default()
    }

    fn visible(&self) -> Vec<MatchingItem> {
        self.state.visible(self.items())
    }

    fn apply(&mut self, message: LiveMessage) {
        let accepted = match message {
            LiveMessage::Matrix(ticket, result) => {
                if let Err(ref e) = result {
                    tracing::debug!("Matrix refresh failed: {}", e);
                }
                self.matrix.commit(ticket, result)
            }
            LiveMessage::Stats(ticket, result) => {
                if let Err(ref e) = result {
                    tracing::debug!("Stats refresh failed: {}", e);
                }
                self.stats.commit(ticket, result)
            }
        };
        if accepted {
            self.last_updated = Local::now().format("%H:%M:%S").to_string();
        }
    }

    /// Handle a key press. Returns `false` to quit.
    fn handle_key(&mut self, key: KeyEvent, pollers: &[Poller]) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        if let Some(ref mut input) = self.search_input {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.search_input = None,
                KeyCode::Backspace => {
                    input.pop();
                    self.state.filters.search_query = input.clone();
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.state.filters.search_query = input.clone();
                }
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('r') => pollers.iter().for_each(Poller::refresh),
            KeyCode::Char('/') => {
                self.search_input = Some(self.state.filters.search_query.clone());
            }
            KeyCode::Char('s') => {
                let mut filters = self.state.filters.clone();
                filters.status = filters.status.next();
                self.state.set_filters(filters);
            }
            KeyCode::Char('o') => {
                let mut filters = self.state.filters.clone();
                filters.sort_by = match filters.sort_by {
                    Some(SortKey::FileName) => Some(SortKey::SegmentCount),
                    Some(SortKey::SegmentCount) => Some(SortKey::Status),
                    Some(SortKey::Status) | None => Some(SortKey::FileName),
                };
                self.state.set_filters(filters);
            }
            KeyCode::Char('d') => {
                let mut filters = self.state.filters.clone();
                filters.sort_order = filters.sort_order.reversed();
                self.state.set_filters(filters);
            }
            KeyCode::Char('c') => self.state.reset_filters(),
            KeyCode::Down | KeyCode::Char('j') => {
                let visible = self.visible();
                self.state.move_selection(&visible, 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let visible = self.visible();
                self.state.move_selection(&visible, -1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(selected) = self.state.selected.clone() {
                    self.state.toggle_expanded(&selected);
                }
            }
            _ => {}
        }
        true
    }
}

/// Run the live dashboard until the user quits.
pub async fn cmd_live(api: &ApiClient, settings: &Settings) -> anyhow::Result<()> {
    let mut view = LiveView::new();
    let period = Duration::from_secs(settings.matching_poll_secs);
    let (tx, mut rx) = mpsc::channel(16);

    let matrix_api = api.clone();
    let stats_api = api.clone();
    let pollers = vec![
        Poller::spawn(period, view.matrix.issuer(), tx.clone(), move |ticket| {
            let api = matrix_api.clone();
            async move { LiveMessage::Matrix(ticket, api.matching_matrix(None, None).await) }
        }),
        Poller::spawn(period, view.stats.issuer(), tx, move |ticket| {
            let api = stats_api.clone();
            async move { LiveMessage::Stats(ticket, api.matching_stats().await) }
        }),
    ];

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_tui_loop(&mut terminal, &mut view, &mut rx, &pollers);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    for poller in pollers {
        poller.shutdown().await;
    }

    result
}

/// Main TUI event loop.
fn run_tui_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    view: &mut LiveView,
    rx: &mut mpsc::Receiver<LiveMessage>,
    pollers: &[Poller],
) -> anyhow::Result<()> {
    let poll_duration = Duration::from_millis(100);

    loop {
        while let Ok(message) = rx.try_recv() {
            view.apply(message);
        }

        terminal.draw(|frame| draw_dashboard(frame, view))?;

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !view.handle_key(key, pollers) {
                    return Ok(());
                }
            }
        }
    }
}

fn status_color(status: MatchingStatus) -> Color {
    match status {
        MatchingStatus::Complete => Color::Green,
        MatchingStatus::Partial => Color::Blue,
        MatchingStatus::Warning => Color::Yellow,
        MatchingStatus::Pending => Color::Cyan,
        MatchingStatus::NoMetadata => Color::DarkGray,
        MatchingStatus::Orphan => Color::Red,
    }
}

fn udm_color(status: UdmStatus) -> Color {
    match status {
        UdmStatus::Complete => Color::Green,
        UdmStatus::Pending => Color::DarkGray,
        UdmStatus::Warning => Color::Yellow,
        UdmStatus::Error => Color::Red,
    }
}

/// Draw the dashboard.
fn draw_dashboard(frame: &mut Frame, view: &LiveView) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(5), // Stats
            Constraint::Length(1), // Filters
            Constraint::Min(5),    // Matrix table
            Constraint::Length(1), // Footer
        ])
        .split(area);

    // Header
    let mut header_spans = vec![
        Span::styled("udm-dash live", Style::default().bold()),
        Span::raw(format!("   Last updated: {}", view.last_updated)),
    ];
    if view.matrix.is_loading() && view.matrix.value().is_none() {
        header_spans.push(Span::styled("   loading...", Style::default().fg(Color::DarkGray)));
    }
    if let Some(err) = view.matrix.error().or(view.stats.error()) {
        let label = if view.matrix.is_stale() || view.stats.is_stale() {
            "   STALE: "
        } else {
            "   ERROR: "
        };
        header_spans.push(Span::styled(
            format!("{}{}", label, truncate_string(err, 80)),
            Style::default().fg(Color::Red).bold(),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    // Stats
    let stats_text = match view.stats.value() {
        Some(stats) => {
            let files = &stats.matching.files;
            let segs = &stats.matching.segments;
            let cov = &stats.coverage;
            format!(
                "  Files:    {:>8} complete  {:>8} partial  {:>8} warning  {:>8} unmatched\n  Segments: {:>8} total     {:>8} converted {:>7} pending  {:>8} orphans\n  Coverage: archive→NAS {:.1}%   iconik→NAS {:.1}%   NAS→sheet {:.1}%   segment→UDM {:.1}%",
                format_number(files.complete),
                format_number(files.partial),
                format_number(files.warning),
                format_number(files.unmatched),
                format_number(segs.total),
                format_number(segs.complete),
                format_number(segs.pending),
                format_number(stats.matching.orphan_records),
                cov.archive_to_nas,
                cov.iconik_to_nas,
                cov.nas_to_any_sheet,
                cov.segment_conversion_rate,
            )
        }
        None => "  Waiting for stats...".to_string(),
    };
    let stats = Paragraph::new(stats_text).block(
        Block::default()
            .title(" STATS ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::TOP),
    );
    frame.render_widget(stats, chunks[1]);

    // Filters
    let visible = view.visible();
    let counts = status_counts(&visible);
    let filters = &view.state.filters;
    let search = match view.search_input {
        Some(ref input) => format!("/{}_", input),
        None if filters.search_query.is_empty() => "-".to_string(),
        None => filters.search_query.clone(),
    };
    let mut filter_spans = vec![Span::raw(format!(
        " status: {}  search: {}  sort: {} {}  showing {}/{}   ",
        filters.status.as_str(),
        search,
        filters.sort_by.map(|k| k.as_str()).unwrap_or("none"),
        filters.sort_order.as_str(),
        visible.len(),
        view.items().len(),
    ))];
    for status in MatchingStatus::ALL {
        filter_spans.push(Span::styled(
            format!("{} {}  ", status.as_str(), counts.get(status.as_str()).copied().unwrap_or(0)),
            Style::default().fg(status_color(status)),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(filter_spans)), chunks[2]);

    // Matrix table
    let header_cells = ["File", "Status", "Segments", "UDM", "Rate", "", "Detail"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().bold()));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = Vec::new();
    let mut selected_row = 0usize;
    for item in &visible {
        let is_selected = view.state.selected.as_deref() == Some(item.file_name.as_str());
        if is_selected {
            selected_row = rows.len();
        }
        let marker = if view.state.is_expanded(&item.file_name) {
            "▾ "
        } else {
            "▸ "
        };
        let mut row = Row::new([
            Cell::from(format!("{}{}", marker, truncate_string(&item.file_name, 48))),
            Cell::from(item.status.as_str()).style(Style::default().fg(status_color(item.status))),
            Cell::from(format_number(item.segment_count)),
            Cell::from(format_number(item.udm_count)),
            Cell::from(format!("{:.0}%", conversion_rate(item))),
            Cell::from(text_bar(progress_width(item), 10)),
            Cell::from(truncate_string(&item.status_detail, 40))
                .style(Style::default().fg(Color::DarkGray)),
        ]);
        if is_selected {
            row = row.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        rows.push(row);

        if view.state.is_expanded(&item.file_name) {
            for seg in &item.segments {
                rows.push(Row::new([
                    Cell::from(format!(
                        "    #{} {}",
                        seg.row_number,
                        seg.source.map(|s| s.as_str()).unwrap_or("")
                    )),
                    Cell::from(seg.udm.status.as_str())
                        .style(Style::default().fg(udm_color(seg.udm.status))),
                    Cell::from(seg.time_in.clone().unwrap_or_default()),
                    Cell::from(seg.time_out.clone().unwrap_or_default()),
                    Cell::from(format_duration(seg.duration())),
                    Cell::from(seg.rating.map(|r| "★".repeat(r as usize)).unwrap_or_default()),
                    Cell::from(truncate_string(seg.winner.as_deref().unwrap_or(""), 40)),
                ]));
            }
        }
    }

    // Keep the selected row on screen
    let table_height = chunks[3].height.saturating_sub(2) as usize;
    let offset = if table_height > 0 && selected_row >= table_height {
        selected_row + 1 - table_height
    } else {
        0
    };
    let rows: Vec<Row> = rows.into_iter().skip(offset).collect();

    let title = if view.matrix.is_stale() {
        " MATCHING (stale) "
    } else {
        " MATCHING "
    };
    let table = Table::new(
        rows,
        [
            Constraint::Min(40),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::TOP),
    );
    frame.render_widget(table, chunks[3]);

    // Footer
    let footer = Paragraph::new(
        "q quit  r refresh  / search  s status  o sort  d direction  c clear  ↑↓ select  enter expand",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);
}
