//! Upload indicator
//!
//! While an upload is pending the page disables its upload button and shows
//! a progress element. In the terminal that element is a spinner on stderr.
//! It stays hidden with `--quiet`, with `FILEDESK_QUIET=1`, or when stderr is
//! not a TTY, so a piped shell session prints nothing but alerts and listings.

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET: OnceLock<bool> = OnceLock::new();

/// Set once from `--quiet` before the first upload
pub fn init_quiet_mode(quiet_flag: bool) {
    let quiet = quiet_flag || quiet_from_env() || !std::io::stderr().is_terminal();
    QUIET.set(quiet).ok();
}

fn quiet_from_env() -> bool {
    matches!(
        std::env::var("FILEDESK_QUIET").as_deref(),
        Ok("1") | Ok("true")
    )
}

pub fn is_quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}

/// Spinner shown for the lifetime of one upload; `None` in quiet mode
pub fn upload_indicator() -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let style = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner()
        .with_style(style)
        .with_message("Uploading...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_mode_hides_the_indicator() {
        init_quiet_mode(true);
        assert!(is_quiet());
        assert!(upload_indicator().is_none());
    }
}
