//! OSC 52 clipboard
//!
//! Asks the terminal emulator to place text on the system clipboard. Works
//! over SSH; terminals that ignore OSC 52 silently drop the request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pay_later::{Clipboard, PayLaterError};
use std::io::{self, IsTerminal, Write};

#[derive(Default)]
pub struct TerminalClipboard;

impl TerminalClipboard {
    pub fn new() -> Self {
        Self
    }

    fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for TerminalClipboard {
    fn copy_text(&self, text: &str) -> pay_later::Result<()> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(PayLaterError::Clipboard("stdout is not a terminal".to_string()));
        }
        stdout
            .write_all(Self::sequence(text).as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| PayLaterError::Clipboard(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(TerminalClipboard::sequence("hi"), "\x1b]52;c;aGk=\x07");
    }
}
