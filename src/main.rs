use jhw::app::{self, AppState};
use jhw::browser;
use jhw::cli::Cli;
use jhw::events::{AppEvent, EventHandler};
use jhw::input::{self, Action, InputContext, ScreenKind};
use jhw::jenkins::{fetcher, JenkinsClient};
use jhw::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!("jhw v{} starting with verbose logging", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn state_dir() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("jhw")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("jhw")
    } else {
        std::path::PathBuf::from("/tmp/jhw")
    }
}

fn restore_terminal() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    // Bad identifiers or server URLs fail before the terminal is touched.
    let client = match JenkinsClient::new(
        &args.server,
        &args.repo,
        args.timeout.map(Duration::from_secs),
    ) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("watching {}", client.job_url());

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = restore_terminal() {
            eprintln!("Failed to restore terminal during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(
        args.server.clone(),
        args.repo.clone(),
        client.job_url().to_string(),
    );

    let events = EventHandler::new(Duration::from_millis(app::TICK_RATE_MS));
    let tx = events.sender();

    let generation = state.begin_fetch();
    fetcher::spawn_fetch(client.clone(), generation, tx.clone());

    let result = run_app(&mut terminal, &mut state, events, &tx, &client).await;

    restore_terminal()?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    tx: &UnboundedSender<AppEvent>,
    client: &Arc<JenkinsClient>,
) -> Result<()> {
    loop {
        terminal.draw(|f| tui::render::render(f, state))?;
        state.prune_error();

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            AppEvent::Key(key) => {
                let action = input::map_key(key, &input_context(state));
                handle_action(action, terminal, state, tx, client);
            }
            AppEvent::Mouse(mouse) => {
                let action = input::map_mouse(mouse, &input_context(state));
                handle_action(action, terminal, state, tx, client);
            }
            AppEvent::Resize => {}
            AppEvent::Tick => {
                if state.is_loading {
                    state.advance_spinner();
                }
            }
            AppEvent::HistoryLoaded { generation, builds } => {
                state.apply_history(generation, &builds);
            }
            AppEvent::HistoryFailed { generation, error } => {
                state.fetch_failed(generation, error);
            }
            AppEvent::Error(e) => {
                tracing::error!("{e}");
                state.set_error(e);
            }
        }

        if state.should_quit {
            break;
        }
    }

    events.stop();
    Ok(())
}

fn input_context(state: &AppState) -> InputContext {
    InputContext {
        has_error: state.error.is_some(),
        is_loading: state.is_loading,
        screen: if state.is_detail() {
            ScreenKind::Detail
        } else {
            ScreenKind::History
        },
    }
}

fn handle_action(
    action: Action,
    terminal: &Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    tx: &UnboundedSender<AppEvent>,
    client: &Arc<JenkinsClient>,
) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::DismissError => state.clear_error(),
        Action::MoveUp => state.move_cursor_up(),
        Action::MoveDown => state.move_cursor_down(),
        Action::PageUp => state.page_up(),
        Action::PageDown => state.page_down(),
        Action::Top => state.cursor_to_top(),
        Action::Bottom => state.cursor_to_bottom(),
        Action::Select => {
            state.select_current();
        }
        Action::Back => {
            if let Some(generation) = state.back() {
                fetcher::spawn_fetch(client.clone(), generation, tx.clone());
            }
        }
        Action::Refresh => {
            let generation = state.begin_fetch();
            fetcher::spawn_fetch(client.clone(), generation, tx.clone());
        }
        Action::OpenBrowser => {
            if let Some(url) = state.current_build_url() {
                if let Err(e) = browser::open(&url) {
                    tracing::warn!("{e}");
                    state.set_error(e.to_string());
                }
            }
        }
        Action::Click(row) => {
            let size = match terminal.size() {
                Ok(size) => size,
                Err(e) => {
                    tracing::warn!("terminal size query failed: {e}");
                    return;
                }
            };
            let body = tui::render::body_area(Rect::new(0, 0, size.width, size.height));
            let cursor = state.history().map_or(0, |v| v.cursor);
            if let Some(table_row) = tui::history_table::row_at(body, cursor, row) {
                state.click_row(table_row);
            }
        }
        Action::None => {}
    }
}
