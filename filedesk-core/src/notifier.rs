//! The modal surface flows talk to the user through

/// Alerts and prompts, plus a hook for the upload progress indicator.
///
/// `prompt` blocks until the user answers; `None` means they cancelled.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);

    fn prompt(&self, message: &str, default: &str) -> Option<String>;

    /// Called when the upload indicator is shown (`true`) and hidden (`false`)
    fn upload_busy(&self, _busy: bool) {}
}
