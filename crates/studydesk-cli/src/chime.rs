//! Terminal completion signal.

use std::io::{IsTerminal, Write};

use studydesk_core::{Chime, SignalError};

/// Rings the terminal bell, or prints the alert to stderr when stdout is not
/// a terminal or the tone is turned off in config.
pub struct TerminalChime {
    tone_enabled: bool,
}

impl TerminalChime {
    pub fn new(tone_enabled: bool) -> Self {
        Self { tone_enabled }
    }
}

impl Chime for TerminalChime {
    fn play_tone(&self) -> Result<(), SignalError> {
        if !self.tone_enabled {
            return Err(SignalError::Unavailable("tone disabled in config".into()));
        }
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(SignalError::Unavailable("stdout is not a terminal".into()));
        }
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|e| SignalError::Unavailable(e.to_string()))
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
