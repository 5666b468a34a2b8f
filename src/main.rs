use std::io;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use cricket_owners::charts::ChartSpec;
use cricket_owners::dataset;
use cricket_owners::error::DashboardError;
use cricket_owners::export;
use cricket_owners::persist;
use cricket_owners::report::render_table;
use cricket_owners::selection::SelectionController;
use cricket_owners::settings::Settings;
use cricket_owners::state::{self, AppState, Dashboard, DataState, Screen, apply_delta};
use cricket_owners::views::TableModel;

const USAGE: &str = "usage: cricket_owners [--data FILE] [--teams CSV --stats JSON] [--demo N] \
[--owner NAME] [--top N] [--export XLSX] [--no-fallback] [--no-cache]";

// Header, footer, console and the table's own border and header row.
const PLAYERS_CHROME_ROWS: u16 = 3 + 2 + 5 + 3;

struct App {
    state: AppState,
    should_quit: bool,
    settings: Settings,
    selection: Option<SelectionController>,
    tx: mpsc::Sender<state::Delta>,
    players_visible: usize,
}

impl App {
    fn new(settings: Settings, tx: mpsc::Sender<state::Delta>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            settings,
            selection: None,
            tx,
            players_visible: 10,
        }
    }

    fn reload(&mut self) {
        let primary = self.settings.primary_source();
        let loaded = match dataset::load_with_fallback(primary.as_ref(), self.settings.fallback) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.selection = None;
                self.state.set_unavailable(err);
                return;
            }
        };

        let report = &loaded.report;
        self.state.push_log(format!(
            "[INFO] Loaded {} players for {} owners from {}",
            report.records, report.owners, report.source
        ));
        for warning in &report.warnings {
            self.state.push_log(format!("[WARN] {warning}"));
        }
        if !report.skipped.is_empty() {
            self.state.push_log(format!(
                "[WARN] {} stats entries matched no roster player: {}",
                report.skipped.len(),
                report.skipped.join(", ")
            ));
        }

        let dashboard = Dashboard::build(&loaded.store, report.source.clone(), self.settings.top_n);
        self.state.set_dashboard(dashboard);

        let previous = self.selection.as_ref().map(|s| s.current().to_string());
        let mut selection = SelectionController::new(Rc::new(loaded.store), self.tx.clone());
        if let Some(err) = selection.restore(
            previous.as_deref(),
            self.settings.initial_owner.as_deref(),
        ) {
            self.state.push_log(format!("[WARN] {err}"));
        }
        self.selection = Some(selection);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Overview,
            KeyCode::Char('2') => self.state.screen = Screen::Players,
            KeyCode::Char('3') => self.state.screen = Screen::ByOwner,
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('r') => {
                self.state.push_log("[INFO] Reloading data");
                self.reload();
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('s') => self.save_cache(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn move_down(&mut self) {
        match self.state.screen {
            Screen::Players => self.state.scroll_players_down(self.players_visible),
            Screen::ByOwner => {
                if let Some(selection) = self.selection.as_mut() {
                    selection.select_next();
                }
            }
            Screen::Overview => {}
        }
    }

    fn move_up(&mut self) {
        match self.state.screen {
            Screen::Players => self.state.scroll_players_up(),
            Screen::ByOwner => {
                if let Some(selection) = self.selection.as_mut() {
                    selection.select_prev();
                }
            }
            Screen::Overview => {}
        }
    }

    fn export(&mut self) {
        let Some(selection) = &self.selection else {
            self.state.push_log("[INFO] Nothing to export");
            return;
        };
        let path = self.settings.export_path.clone();
        match export::export_workbook(&path, selection.store(), self.settings.top_n) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} owners, {} players to {}",
                report.owners,
                report.players,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn save_cache(&mut self) {
        let Some(selection) = &self.selection else {
            self.state.push_log("[INFO] Nothing to save");
            return;
        };
        match persist::save_cache(selection.store()) {
            Ok(path) => self
                .state
                .push_log(format!("[INFO] Saved league to {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] Save failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err:#}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(settings, tx);
    app.reload();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        let size = terminal.size()?;
        app.players_visible = usize::from(size.height.saturating_sub(PLAYERS_CHROME_ROWS)).max(1);

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.data {
        DataState::Ready(dashboard) => match app.state.screen {
            Screen::Overview => render_overview(frame, chunks[1], dashboard),
            Screen::Players => render_players(frame, chunks[1], &app.state, dashboard),
            Screen::ByOwner => render_by_owner(frame, chunks[1], &app.state, dashboard),
        },
        DataState::Unavailable(err) => render_no_data(frame, chunks[1], err),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.dashboard() {
        Some(d) => format!(
            "CRICKET OWNERS | {} | {} owners, {} players | {} runs, {} wickets",
            state::screen_label(state.screen),
            d.roster.len(),
            d.totals.players,
            d.totals.runs,
            d.totals.wickets
        ),
        None => format!("CRICKET OWNERS | {} | no data", state::screen_label(state.screen)),
    };
    let source = match state.dashboard() {
        Some(d) => format!("source: {} (loaded {})", d.source, d.loaded_at),
        None => "source: none".to_string(),
    };
    format!("  {title}\n  {source}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Overview => "1 Overview | 2 Players | 3 By owner | Tab Next | r Reload | e Export | s Save | ? Help | q Quit".to_string(),
        Screen::Players => "1 Overview | 2 Players | 3 By owner | j/k/↑/↓ Scroll | e Export | ? Help | q Quit".to_string(),
        Screen::ByOwner => "1 Overview | 2 Players | 3 By owner | j/k/↑/↓ Owner | e Export | ? Help | q Quit".to_string(),
    }
}

fn render_no_data(frame: &mut Frame, area: Rect, err: &DashboardError) {
    let text = format!(
        "No data available.\n\n{err}\n\nPass --data, --teams with --stats, or --demo N, then press r to retry."
    );
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .title(format!("No data ({})", err.kind_label()))
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_overview(frame: &mut Frame, area: Rect, dashboard: &Dashboard) {
    let table_height = (dashboard.owner_table.nrows() as u16 + 3).min(area.height / 2);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(6)])
        .split(area);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    render_table_panel(frame, tables[0], "Owner Summary", &dashboard.owner_table, 0, usize::MAX);
    render_table_panel(frame, tables[1], "Top Players", &dashboard.top_table, 0, usize::MAX);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_chart(frame, charts[0], &dashboard.runs_chart, Color::Green);
    render_chart(frame, charts[1], &dashboard.wickets_chart, Color::Yellow);
}

fn render_players(frame: &mut Frame, area: Rect, state: &AppState, dashboard: &Dashboard) {
    let total = dashboard.players_table.nrows();
    let visible = usize::from(area.height.saturating_sub(3)).max(1);
    let start = state.players_scroll.min(total.saturating_sub(1));
    let end = (start + visible).min(total);
    let title = if total == 0 {
        "All Players".to_string()
    } else {
        format!("All Players {}-{} of {}", start + 1, end, total)
    };
    render_table_panel(frame, area, &title, &dashboard.players_table, start, visible);
}

fn render_by_owner(frame: &mut Frame, area: Rect, state: &AppState, dashboard: &Dashboard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(10)])
        .split(area);

    let owner_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            std::iter::once(Constraint::Length(1))
                .chain(dashboard.roster.iter().map(|_| Constraint::Length(1)))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(columns[0]);
    render_cell_text(
        frame,
        owner_rows[0],
        "Owners",
        Style::default().add_modifier(Modifier::BOLD),
    );
    for (idx, owner) in dashboard.roster.iter().enumerate() {
        let selected = state.selected_owner.as_deref() == Some(owner);
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        let marker = if selected { ">" } else { " " };
        render_cell_text(frame, owner_rows[idx + 1], &format!("{marker} {owner}"), style);
    }

    let Some(owner) = state.selected_owner.as_deref() else {
        let waiting = Paragraph::new("Select an owner with j/k")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(waiting, columns[1]);
        return;
    };
    match &state.owner_chart {
        Some(chart) if !chart.series.is_empty() => {
            render_chart(frame, columns[1], chart, Color::Cyan)
        }
        _ => {
            let empty = Paragraph::new(format!("No players for {owner}"))
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(owner.to_string()).borders(Borders::ALL));
            frame.render_widget(empty, columns[1]);
        }
    }
}

fn render_table_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    table: &TableModel,
    start: usize,
    visible: usize,
) {
    let window = TableModel {
        columns: table.columns.clone(),
        rows: table.rows.iter().skip(start).take(visible).cloned().collect(),
    };
    let text = if window.is_empty() {
        "No rows".to_string()
    } else {
        render_table(&window)
    };
    let paragraph = Paragraph::new(text)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartSpec, color: Color) {
    let block = Block::default()
        .title(format!("{} ({} by {})", chart.title, chart.y_label, chart.x_label))
        .borders(Borders::ALL);
    if chart.series.is_empty() {
        let empty = Paragraph::new("No data")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = chart
        .series
        .points()
        .map(|(label, value)| {
            Bar::default()
                .label(label.to_string().into())
                .value(value)
                .style(Style::default().fg(color))
        })
        .collect();
    let count = chart.series.len() as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / count.max(1)).saturating_sub(1).clamp(1, 12);

    let widget = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(color))
        .max(chart.series.max_value().max(1));
    frame.render_widget(widget, area);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    if area.height == 0 {
        return;
    }
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, text_area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Cricket Owners - Help",
        "",
        "Screens:",
        "  1            Overview",
        "  2            All players",
        "  3            By owner",
        "  Tab          Next screen",
        "",
        "Actions:",
        "  j/k or ↑/↓   Scroll players / change owner",
        "  r            Reload data",
        "  e            Export workbook",
        "  s            Save league cache",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
