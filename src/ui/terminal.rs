use {
    crate::{
        batch::BatchRunner,
        state::{AppState, Focus, SortColumn, StateMessage},
        stats::PohFilter,
    },
    crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    ratatui::{backend::CrosstermBackend, Terminal},
    std::{io::Stdout, time::Duration},
    tokio::sync::mpsc,
};

const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Query,
    Quit,
}

/// Run the TUI event loop
///
/// Handles keyboard input and pasted text, starts queries in the background
/// and redraws every [`REFRESH_INTERVAL`] so finished queries show up
/// without a key press.
pub async fn run_ui(runner: BatchRunner) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    let stdout = std::io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Enable raw mode for keyboard input
    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen keeps stderr logs out of the table; bracketed paste
    // delivers a pasted address list as one event instead of keystrokes
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableBracketedPaste,
        crossterm::cursor::Hide
    )?;

    terminal.clear()?;

    let result = event_loop(&mut terminal, runner).await;

    // Cleanup - restore terminal state
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    runner: BatchRunner,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::channel::<StateMessage>(8);
    let mut state = AppState::new();

    loop {
        while let Ok(message) = rx.try_recv() {
            state.apply(message);
        }

        terminal.draw(|f| {
            let area = f.area();
            crate::ui::layout::render_layout(f, area, &state);
        })?;

        if !crossterm::event::poll(REFRESH_INTERVAL)? {
            continue;
        }

        match crossterm::event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match handle_key(&mut state, key) {
                    Action::Quit => break,
                    Action::Query => start_query(&mut state, &runner, &tx),
                    Action::None => {}
                }
            }
            Event::Paste(text) => {
                if state.focus() == Focus::Input {
                    state.push_str(&text);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Spawn a query task unless one is already running
fn start_query(state: &mut AppState, runner: &BatchRunner, tx: &mpsc::Sender<StateMessage>) {
    let Some(addresses) = state.begin_query() else {
        return;
    };

    let runner = runner.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = runner.run(&addresses).await;
        if let Err(e) = tx.send(StateMessage::QueryFinished(result)).await {
            log::warn!("Failed to deliver query result to UI: {}", e);
        }
    });
}

/// Map a key press onto state changes
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return Action::Quit,
        KeyCode::Char('r') if ctrl => return Action::Query,
        KeyCode::F(5) => return Action::Query,
        KeyCode::Tab | KeyCode::BackTab => {
            state.toggle_focus();
            return Action::None;
        }
        _ => {}
    }

    match state.focus() {
        Focus::Input => match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Enter => state.push_char('\n'),
            KeyCode::Backspace => state.backspace(),
            KeyCode::Char('l') if ctrl => state.clear_input(),
            KeyCode::Char(c) if !ctrl => state.push_char(c),
            _ => {}
        },
        Focus::Table => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('b') => state.cycle_sort(SortColumn::Balance),
            KeyCode::Char('p') => state.cycle_sort(SortColumn::Points),
            KeyCode::Char('r') => state.cycle_sort(SortColumn::Rank),
            KeyCode::Char('h') => state.cycle_sort(SortColumn::Poh),
            KeyCode::Char('f') => state.cycle_filter(),
            KeyCode::Char('1') => state.set_filter(PohFilter::All),
            KeyCode::Char('2') => state.set_filter(PohFilter::Verified),
            KeyCode::Char('3') => state.set_filter(PohFilter::Unverified),
            KeyCode::Char('i') => state.toggle_focus(),
            KeyCode::Down | KeyCode::Char('j') => state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => state.scroll_up(),
            _ => {}
        },
    }

    Action::None
}
