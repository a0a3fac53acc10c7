mod app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dotenv::dotenv;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use app::{line_text, status_display, AppState};
use pattern_whisper::config::{Config, KeyRole};
use pattern_whisper::smoke::LineLevel;
use pattern_whisper::store::{PostgrestClient, RemoteStore};
use pattern_whisper::types::ConnectionStatus;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    let cfg = match Config::from_env(KeyRole::Anon) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };
    let store = match PostgrestClient::new(&cfg) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to build store client: {e}");
            std::process::exit(1);
        }
    };

    let mut app = AppState::new(cfg.store_url.clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &store).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    store: &dyn RemoteStore,
) -> io::Result<()> {
    // Show the pending state before the first probe settles.
    terminal.draw(|f| render(f, app))?;
    app.probe(store).await;

    loop {
        terminal.draw(|f| render(f, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                app.begin_sweep();
                terminal.draw(|f| render(f, app))?;
                app.run_sweep(store).await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.status = ConnectionStatus::Pending;
                terminal.draw(|f| render(f, app))?;
                app.probe(store).await;
            }
            KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState) {
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

    render_header(f, app, chunks[0]);
    render_report(f, app, chunks[1]);
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = status_display(&app.status);

    let sweep_str = match (app.running, app.last_failures) {
        (true, _) => "sweep running".to_string(),
        (false, Some(0)) => "last sweep: all probes passed".to_string(),
        (false, Some(n)) => format!("last sweep: {n} failed"),
        (false, None) => "no sweep yet".to_string(),
    };

    let title_spans = vec![
        Span::styled(
            " Pattern Whisper  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(sweep_str, Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(app.store_url.clone(), Style::default().fg(Color::DarkGray)),
    ];

    let paragraph = Paragraph::new(Line::from(title_spans))
        .block(Block::default().borders(Borders::ALL).border_style(
            Style::default().fg(Color::DarkGray),
        ));

    f.render_widget(paragraph, area);
}

fn render_report(f: &mut Frame, app: &AppState, area: Rect) {
    let lines: Vec<Line> = if app.report.is_empty() {
        vec![Line::from(Span::styled(
            "Press [t] to run the full API test sweep.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.report
            .iter()
            .map(|l| {
                let color = match l.level {
                    LineLevel::Info => Color::Green,
                    LineLevel::Error => Color::Red,
                };
                Line::from(Span::styled(line_text(l), Style::default().fg(color)))
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " TEST RESULTS ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[t] ", Style::default().fg(Color::Yellow)),
        Span::raw("run tests  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("re-probe  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("scroll"),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
