//! Blocking single-key listener that fires the cancellation signal.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use tracing::debug;

use crate::cancel::Cancel;

/// Block on key events until an exit key (Esc or `q`) arrives, then
/// clear the screen and fire `cancel`. Runs on the blocking pool and
/// never touches dashboard state.
pub fn listen(cancel: Cancel) {
    loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    debug!(?key.code, "exit key received");
                    let _ = execute!(
                        io::stdout(),
                        terminal::Clear(terminal::ClearType::All),
                        cursor::MoveTo(0, 0)
                    );
                    cancel.fire();
                    return;
                }
            }
            Ok(_) => {}
            Err(_) => {
                // Terminal gone; treat it as an exit request.
                cancel.fire();
                return;
            }
        }
        if cancel.is_fired() {
            return;
        }
    }
}
