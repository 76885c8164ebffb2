//! TUI (Text User Interface) for chatting with the assistant through the relay.

mod app;
mod chat_result;
mod constants;
mod draw;
mod handlers;
mod shortcuts;
mod text;

use crossterm::event::{self, Event};
use crossterm::execute;
use std::io::{self};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::core::assistant::Assistant;
use crate::core::config::Config;

use app::App;
use draw::draw;
use handlers::{HandleResult, PendingChat};

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// After an Esc that may start Option+key, wait briefly for the key that follows.
/// Terminals (Ghostty, etc.) send Esc+key; the second byte may arrive with delay.
fn drain_meta_sequence(app: &mut App) -> io::Result<Option<crossterm::event::KeyEvent>> {
    let step_ms = 25u64;
    let mut elapsed = 0u64;
    while elapsed < constants::ESC_SEQUENCE_DRAIN_MS {
        if event::poll(Duration::from_millis(step_ms))? {
            match event::read()? {
                Event::Key(next) => return Ok(Some(next)),
                Event::Mouse(m) => {
                    let _ = handlers::handle_mouse(m, app);
                    return Ok(None);
                }
                _ => {}
            }
        }
        elapsed += step_ms;
    }
    Ok(None)
}

/// Run the TUI loop. Uses a dedicated Tokio runtime for chat turns and probes.
pub fn run(config: Arc<Config>) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let rt = Arc::new(
        Runtime::new().map_err(|e| io::Error::other(format!("Failed to create runtime: {}", e)))?,
    );

    let assistant = Arc::new(Assistant::new(&config));
    let mut app = App::new(config.model_id.clone(), config.show_timestamps);
    let mut pending_chat: Option<PendingChat> = None;
    let mut pending_probe: Option<mpsc::Receiver<(String, bool)>> = None;

    execute!(io::stdout(), crossterm::event::EnableMouseCapture)?;

    // Kitty keyboard protocol: Alt+key as single event with modifier (Ghostty, WezTerm, kitty, etc.)
    let _ = execute!(
        io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | crossterm::event::KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        )
    );

    log::info!("TUI started with model {}", app.model_id);

    loop {
        chat_result::poll_pending_chat(&mut app, &mut pending_chat);
        chat_result::poll_pending_probe(&mut app, &assistant, &mut pending_probe);

        terminal.draw(|f| draw(f, &mut app, f.area()))?;

        if !event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            continue;
        }
        match event::read()? {
            Event::Mouse(mouse) => {
                let _ = handlers::handle_mouse(mouse, &mut app);
            }
            Event::Key(key) => {
                let key_to_handle =
                    if handlers::would_esc_start_meta_sequence(&key, &app, &pending_chat) {
                        match drain_meta_sequence(&mut app)? {
                            Some(next) => {
                                app.escape_pending = true;
                                next
                            }
                            None => key,
                        }
                    } else {
                        key
                    };
                let result = handlers::handle_key(
                    key_to_handle,
                    handlers::HandleKeyContext {
                        app: &mut app,
                        assistant: &assistant,
                        pending_chat: &mut pending_chat,
                        pending_probe: &mut pending_probe,
                        rt: &rt,
                    },
                );
                if result == HandleResult::Break {
                    break;
                }
            }
            _ => {}
        }
    }

    log::info!("TUI exited");
    terminal.show_cursor()?;
    Ok(())
}
