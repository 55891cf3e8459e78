//! Terminal rendering of alerts, prompts and the upload indicator

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Mutex;

use filedesk_core::Notifier;
use indicatif::ProgressBar;
use inquire::{InquireError, Password, Text};
use tracing::warn;

use crate::ui;

/// True when both ends are a TTY, so inquire can drive the terminal
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Next line from stdin without its line ending; `None` at EOF
pub fn read_line() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(err) => {
            warn!(error = %err, "failed to read stdin");
            None
        }
    }
}

/// Read a password without echo on a TTY, or a plain line otherwise
pub fn read_secret(message: &str) -> Option<String> {
    if is_interactive() {
        match Password::new(message).without_confirmation().prompt() {
            Ok(secret) => Some(secret),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
            Err(err) => {
                warn!(error = %err, "password prompt failed");
                None
            }
        }
    } else {
        read_line()
    }
}

/// Drop control characters (ANSI escapes included) from text the server
/// supplied, keeping line breaks
fn printable(message: &str) -> String {
    message
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

pub struct TerminalNotifier {
    interactive: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self {
            interactive: is_interactive(),
            spinner: Mutex::new(None),
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        println!("! {}", printable(message));
    }

    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        if self.interactive {
            return match Text::new(message).with_default(default).prompt() {
                Ok(answer) => Some(answer),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
                Err(err) => {
                    warn!(error = %err, "prompt failed");
                    None
                }
            };
        }

        // Piped input: an empty line keeps the default, EOF cancels
        print!("{} [{}] ", message, default);
        std::io::stdout().flush().ok();
        read_line().map(|answer| {
            if answer.is_empty() {
                default.to_string()
            } else {
                answer
            }
        })
    }

    fn upload_busy(&self, busy: bool) {
        let mut slot = self
            .spinner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if busy {
            *slot = ui::upload_indicator();
        } else if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_strips_escape_sequences() {
        assert_eq!(
            printable("\u{1b}[2J\u{1b}[31mStorage full\u{7}\r"),
            "[2J[31mStorage full"
        );
    }

    #[test]
    fn printable_keeps_text_and_line_breaks() {
        assert_eq!(
            printable("Tom & Jerry's name <3 is taken\nTry another"),
            "Tom & Jerry's name <3 is taken\nTry another"
        );
    }
}
