//! Console interaction.

use std::io::{IsTerminal, Write};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

use crate::error::AppError;

/// Block until a key is pressed.
///
/// The prompt goes to stderr so stdout only carries the prediction. When stdin
/// is not a terminal (pipes, CI) there is nobody to press a key and the wait is
/// skipped.
pub fn wait_for_keypress() -> Result<(), AppError> {
    if !std::io::stdin().is_terminal() {
        warn!("stdin is not a terminal; not waiting for a key press");
        return Ok(());
    }

    eprint!("Press any key to exit...");
    let _ = std::io::stderr().flush();

    enable_raw_mode().map_err(|e| AppError::input(format!("Failed to enable raw mode: {e}")))?;
    let result = read_key_press();
    // Always leave raw mode, even if reading failed.
    let restored = disable_raw_mode()
        .map_err(|e| AppError::input(format!("Failed to disable raw mode: {e}")));
    eprintln!();

    result.and(restored)
}

fn read_key_press() -> Result<(), AppError> {
    loop {
        match event::read().map_err(|e| AppError::input(format!("Event read error: {e}")))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                debug!(code = ?key.code, "Key pressed");
                return Ok(());
            }
            _ => {}
        }
    }
}
