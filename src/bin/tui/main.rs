mod app;

use std::io;
use std::time::Duration;

use app::{format_rate, AppState, LoadStatus, Theme};
use cricket_analytics::config::Config;
use cricket_analytics::display::{title_case, truncate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

const THEME: Theme = Theme::dark();

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> io::Result<()> {
    let cfg = match Config::from_env() {
        Ok(c) => c.with_data_path(std::env::args_os().nth(1).map(Into::into)),
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    let mut app = AppState::new(&cfg);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut player_state = TableState::default();
    player_state.select(app.selected);

    let result = run_loop(&mut terminal, &mut app, &mut player_state);

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    player_state: &mut TableState,
) -> io::Result<()> {
    let poll_interval = Duration::from_millis(250);

    loop {
        terminal.draw(|f| render(f, app, &THEME, player_state))?;

        if !event::poll(poll_interval)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') | KeyCode::Char('R') => app.reload(),
                KeyCode::Char('f') | KeyCode::Char('F') => app.cycle_format(),
                KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
                _ => {}
            }
            player_state.select(app.selected);
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, theme: &Theme, player_state: &mut TableState) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, theme, chunks[0]);
    render_body(f, app, theme, player_state, chunks[1]);
    render_footer(f, theme, chunks[2]);
}

fn block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            title,
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
}

fn render_header(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let (status_text, status_color) = match &app.status {
        LoadStatus::Loaded { rows, removed } => (
            format!("● {rows} innings ({removed} rows cleaned out)"),
            theme.good,
        ),
        LoadStatus::Error(e) => (format!("✗ {}", truncate(e, 60)), theme.poor),
    };

    let spans = vec![
        Span::styled(
            " Cricket Analytics  ",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} players", app.players.len()),
            Style::default().fg(theme.text),
        ),
        Span::raw("  │  "),
        Span::styled(app.format_filter.label(), Style::default().fg(theme.header)),
    ];

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.border)));
    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, theme: &Theme, player_state: &mut TableState, area: Rect) {
    // Horizontal split: players (35%) | detail (65%)
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_players_table(f, app, theme, player_state, halves[0]);

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // metrics
            Constraint::Length(6),  // formats
            Constraint::Min(5),     // recent innings
        ])
        .split(halves[1]);

    render_metrics(f, app, theme, detail[0]);
    render_formats(f, app, theme, detail[1]);
    render_recent(f, app, theme, detail[2]);
}

fn render_players_table(f: &mut Frame, app: &AppState, theme: &Theme, state: &mut TableState, area: Rect) {
    let header_cells = ["#", "Player", "Inns"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(theme.header).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .players
        .iter()
        .enumerate()
        .map(|(i, (name, innings))| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)).style(Style::default().fg(theme.muted)),
                Cell::from(truncate(&title_case(name), 24)),
                Cell::from(innings.to_string()).style(Style::default().fg(theme.title)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(3), Constraint::Min(10), Constraint::Length(5)],
    )
    .header(header)
    .block(block(" PLAYERS ", theme))
    .row_highlight_style(
        Style::default()
            .bg(theme.highlight_bg)
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(table, area, state);
}

fn render_metrics(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let Some(report) = &app.report else {
        let empty = Paragraph::new(Span::styled("no player selected", Style::default().fg(theme.muted)))
            .block(block(" METRICS ", theme));
        f.render_widget(empty, area);
        return;
    };
    let m = &report.metrics;

    let label = |s: &'static str| Span::styled(format!("{s:<20}"), Style::default().fg(theme.muted));
    let value = |s: String| Span::styled(s, Style::default().fg(theme.text).add_modifier(Modifier::BOLD));

    let lines = vec![
        Line::from(vec![
            label("Player"),
            Span::styled(title_case(&m.player_name), Style::default().fg(theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![label("Matches"), value(m.matches_played.to_string())]),
        Line::from(vec![label("Total runs"), value(m.total_runs.to_string())]),
        Line::from(vec![
            label("Batting average"),
            Span::styled(
                format_rate(m.batting_average),
                Style::default().fg(theme.average_color(m.batting_average)).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![label("Strike rate"), value(format_rate(m.strike_rate))]),
        Line::from(vec![label("Consistency index"), value(format_rate(m.consistency_index))]),
        Line::from(vec![
            label("100s / 50s"),
            value(format!("{} / {}", m.centuries, m.half_centuries)),
        ]),
        Line::from(vec![label("Highest score"), value(m.highest_score.to_string())]),
        Line::from(vec![
            label("Mean per innings"),
            value(format_rate(report.distribution.mean_runs)),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).block(block(" METRICS ", theme)), area);
}

fn render_formats(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let header_cells = ["Format", "M", "Runs", "Avg", "SR", "100s"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(theme.header).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .report
        .iter()
        .flat_map(|r| r.formats.iter())
        .map(|b| {
            let style = if b.is_zero() {
                Style::default().fg(theme.muted)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Cell::from(b.format.to_string()),
                Cell::from(b.matches.to_string()),
                Cell::from(b.runs.to_string()),
                Cell::from(format_rate(b.average)),
                Cell::from(format_rate(b.strike_rate)),
                Cell::from(b.centuries.to_string()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block(" BY FORMAT ", theme));

    f.render_widget(table, area);
}

fn render_recent(f: &mut Frame, app: &AppState, theme: &Theme, area: Rect) {
    let bars: Vec<Bar> = app
        .report
        .iter()
        .flat_map(|r| r.recent.iter())
        .map(|p| {
            let color = if p.is_century { theme.century } else { theme.bar };
            Bar::default()
                .value(u64::from(p.runs))
                .label(Line::from(p.match_number.to_string()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme.text).bg(color))
        })
        .collect();

    let title = format!(" LAST {} INNINGS ", app.recent_n);
    let chart = BarChart::default()
        .block(block(&title, theme))
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1);

    f.render_widget(chart, area);
}

fn render_footer(f: &mut Frame, theme: &Theme, area: Rect) {
    let key = |s: &'static str| Span::styled(s, Style::default().fg(theme.header));
    let line = Line::from(vec![
        key(" [q] "),
        Span::raw("quit  "),
        key("[r] "),
        Span::raw("reload  "),
        key("[f] "),
        Span::raw("format  "),
        key("[↑↓ / j k] "),
        Span::raw("select player"),
    ]);
    f.render_widget(Paragraph::new(line).style(Style::default().fg(theme.text)), area);
}
