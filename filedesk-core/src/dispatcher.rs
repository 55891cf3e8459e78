//! Client action dispatcher
//!
//! Every user action is one flow: read the page, make one backend call,
//! then alert, navigate or update the page. Errors never escape a flow;
//! they become a single alert plus an `Outcome::Failed`.
//!
//! Flows take `&self`, so one dispatcher can be shared between concurrent
//! callers. A flow already in flight is not started twice.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::backend::Backend;
use crate::config::UiConfig;
use crate::error::ClientError;
use crate::notifier::Notifier;
use crate::page::{FileRow, Page, SelectedFile};
use crate::registry::UploadedFileRegistry;
use crate::wire::Credentials;

pub const MSG_GENERIC_FAILURE: &str = "An error occurred. Please try again.";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password. Please try again.";
pub const MSG_SIGNUP_OK: &str = "Signup successful. You can now log in with your new credentials.";
pub const MSG_SIGNUP_FAILED: &str = "An error occurred during signup. Please try again.";
pub const MSG_NO_FILE_SELECTED: &str = "Please select a file to upload.";
pub const MSG_UPLOAD_OK: &str = "File uploaded successfully";
pub const MSG_ROW_UNAVAILABLE: &str =
    "File uploaded successfully, but unable to display file details on the page.";
pub const PROMPT_RENAME: &str = "Enter a new name for the file:";
pub const MSG_RENAME_OK: &str = "File renamed successfully";
pub const MSG_RENAME_FAILED: &str = "An error occurred while renaming the file. Please try again.";
pub const MSG_LOGOUT_FAILED: &str = "An error occurred while logging out. Please try again.";

/// Actions that issue a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Login,
    Signup,
    Upload,
    Rename,
    Logout,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Login => write!(f, "login"),
            Flow::Signup => write!(f, "signup"),
            Flow::Upload => write!(f, "upload"),
            Flow::Rename => write!(f, "rename"),
            Flow::Logout => write!(f, "logout"),
        }
    }
}

/// Terminal state of a flow
#[derive(Debug)]
pub enum Outcome {
    /// Request accepted
    Succeeded,
    /// Request answered but the server said `success: false`
    Refused,
    /// Transport, status or local failure; already alerted
    Failed(ClientError),
    /// The user dismissed the prompt; nothing was sent
    Cancelled,
    /// The same flow is still waiting on its request
    AlreadyPending,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

/// Everything the dispatcher mutates
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub page: Page,
    pub uploaded: UploadedFileRegistry,
}

pub struct Dispatcher<B, N> {
    backend: B,
    notifier: N,
    ui: UiConfig,
    state: Mutex<AppState>,
    in_flight: Mutex<HashSet<Flow>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a flow as pending until dropped
struct InFlight<'a> {
    flows: &'a Mutex<HashSet<Flow>>,
    flow: Flow,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.flows).remove(&self.flow);
    }
}

/// Disabled trigger and visible indicator for as long as an upload runs.
/// Released on every exit path, including a dropped future.
struct UploadBusy<'a> {
    state: &'a Mutex<AppState>,
    notifier: &'a dyn Notifier,
}

impl<'a> UploadBusy<'a> {
    fn engage(state: &'a Mutex<AppState>, notifier: &'a dyn Notifier) -> Self {
        {
            let mut state = lock(state);
            state.page.upload_enabled = false;
            state.page.progress.visible = true;
            state.page.progress.fill_percent = 0;
        }
        notifier.upload_busy(true);
        Self { state, notifier }
    }
}

impl Drop for UploadBusy<'_> {
    fn drop(&mut self) {
        {
            let mut state = lock(self.state);
            state.page.progress.visible = false;
            state.page.upload_enabled = true;
        }
        self.notifier.upload_busy(false);
    }
}

impl<B: Backend, N: Notifier> Dispatcher<B, N> {
    pub fn new(backend: B, notifier: N, ui: UiConfig) -> Self {
        Self::with_page(backend, notifier, ui, Page::default())
    }

    pub fn with_page(backend: B, notifier: N, ui: UiConfig, page: Page) -> Self {
        Self {
            backend,
            notifier,
            ui,
            state: Mutex::new(AppState {
                page,
                uploaded: UploadedFileRegistry::new(),
            }),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Snapshot of the current page
    pub fn page(&self) -> Page {
        lock(&self.state).page.clone()
    }

    pub fn update_page<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        f(&mut lock(&self.state).page)
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        lock(&self.state)
            .uploaded
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn is_pending(&self, flow: Flow) -> bool {
        lock(&self.in_flight).contains(&flow)
    }

    pub fn set_login_fields(&self, username: &str, password: &str) {
        self.update_page(|page| page.login = Credentials::new(username, password));
    }

    pub fn set_signup_fields(&self, username: &str, password: &str) {
        self.update_page(|page| page.signup = Credentials::new(username, password));
    }

    pub fn select_file(&self, file: Option<SelectedFile>) {
        self.update_page(|page| page.file_input = file);
    }

    /// Show exactly one form. Unknown ids are ignored.
    pub fn switch_form(&self, form_id: &str) {
        if !self.update_page(|page| page.show_only(form_id)) {
            warn!(form = %form_id, "no such form, nothing switched");
        }
    }

    pub async fn login(&self) -> Outcome {
        let Some(_in_flight) = self.begin(Flow::Login) else {
            return Outcome::AlreadyPending;
        };
        let credentials = lock(&self.state).page.login.clone();
        info!(username = %credentials.username, "attempting to log in");

        match self.backend.login(&credentials).await {
            Ok(response) if response.success => {
                self.navigate(&self.ui.dashboard_path);
                Outcome::Succeeded
            }
            Ok(_) => {
                self.notifier.alert(MSG_INVALID_CREDENTIALS);
                Outcome::Refused
            }
            Err(err) => self.fail(Flow::Login, err, MSG_GENERIC_FAILURE),
        }
    }

    pub async fn signup(&self) -> Outcome {
        let Some(_in_flight) = self.begin(Flow::Signup) else {
            return Outcome::AlreadyPending;
        };
        let credentials = lock(&self.state).page.signup.clone();
        info!(username = %credentials.username, "attempting to sign up");

        match self.backend.signup(&credentials).await {
            Ok(response) if response.success => {
                self.notifier.alert(MSG_SIGNUP_OK);
                self.update_page(|page| page.signup.clear());
                Outcome::Succeeded
            }
            Ok(response) => {
                let message = Self::server_message(response.message, MSG_SIGNUP_FAILED);
                self.notifier.alert(&message);
                Outcome::Refused
            }
            Err(err) => self.fail(Flow::Signup, err, MSG_SIGNUP_FAILED),
        }
    }

    pub async fn upload_file(&self) -> Outcome {
        let selected = lock(&self.state).page.file_input.clone();
        let Some(file) = selected else {
            warn!("upload triggered with no file selected");
            self.notifier.alert(MSG_NO_FILE_SELECTED);
            return Outcome::Failed(ClientError::NoFileSelected);
        };

        let Some(_in_flight) = self.begin(Flow::Upload) else {
            return Outcome::AlreadyPending;
        };

        if lock(&self.state).uploaded.contains(&file.name) {
            warn!(file = %file.name, "file already uploaded this session");
            self.notifier
                .alert(&format!("{} has already been uploaded.", file.name));
            return Outcome::Failed(ClientError::duplicate_upload(file.name));
        }

        info!(file = %file.name, path = %file.path.display(), "uploading file");
        let _busy = UploadBusy::engage(&self.state, &self.notifier);

        match self.backend.upload(&file).await {
            Ok(response) if response.success => {
                self.notifier.alert(MSG_UPLOAD_OK);
                match response.filename {
                    Some(filename) => {
                        debug!(file = %filename, file_id = ?response.file_id, "upload stored");
                        {
                            // The server may store the file under a sanitised name
                            let mut state = lock(&self.state);
                            state.uploaded.record(file.name.clone());
                            state.uploaded.record(filename.clone());
                        }
                        self.display_file_details(&filename);
                    }
                    None => {
                        warn!("upload response carried no filename");
                        self.notifier.alert(MSG_ROW_UNAVAILABLE);
                    }
                }
                Outcome::Succeeded
            }
            Ok(response) => {
                let message = Self::server_message(response.message, MSG_GENERIC_FAILURE);
                self.notifier.alert(&message);
                Outcome::Refused
            }
            Err(err) => self.fail(Flow::Upload, err, MSG_GENERIC_FAILURE),
        }
    }

    /// Append a row for `filename`. Returns false when the page has no
    /// file table to append to.
    pub fn display_file_details(&self, filename: &str) -> bool {
        let appended = self.update_page(|page| match page.file_table.as_mut() {
            Some(table) => {
                table.rows.push(FileRow::uploaded(filename));
                true
            }
            None => false,
        });

        if !appended {
            error!("file table element not found");
            self.notifier.alert(MSG_ROW_UNAVAILABLE);
        }
        appended
    }

    /// Rename via a prompt. The row keeps showing the old name even when
    /// the server accepts the rename.
    pub async fn edit_file(&self, filename: &str) -> Outcome {
        let Some(new_filename) = self.notifier.prompt(PROMPT_RENAME, filename) else {
            debug!(file = %filename, "rename cancelled");
            return Outcome::Cancelled;
        };

        let Some(_in_flight) = self.begin(Flow::Rename) else {
            return Outcome::AlreadyPending;
        };
        info!(from = %filename, to = %new_filename, "renaming file");

        match self.backend.rename(filename, &new_filename).await {
            Ok(()) => {
                self.notifier.alert(MSG_RENAME_OK);
                lock(&self.state).uploaded.rename(filename, &new_filename);
                Outcome::Succeeded
            }
            Err(err) => self.fail(Flow::Rename, err, MSG_RENAME_FAILED),
        }
    }

    /// Placeholder: announces the deletion and does nothing else
    pub fn delete_file(&self, filename: &str) {
        info!(file = %filename, "attempting to delete file");
        self.notifier.alert(&format!("Delete file: {}", filename));
    }

    pub async fn logout(&self) -> Outcome {
        let Some(_in_flight) = self.begin(Flow::Logout) else {
            return Outcome::AlreadyPending;
        };
        info!("logging out");

        match self.backend.logout().await {
            Ok(()) => {
                self.navigate(&self.ui.home_path);
                Outcome::Succeeded
            }
            Err(err) => self.fail(Flow::Logout, err, MSG_LOGOUT_FAILED),
        }
    }

    fn begin(&self, flow: Flow) -> Option<InFlight<'_>> {
        if !lock(&self.in_flight).insert(flow) {
            debug!(%flow, "request already pending, ignoring");
            return None;
        }
        Some(InFlight {
            flows: &self.in_flight,
            flow,
        })
    }

    fn navigate(&self, location: &str) {
        info!(to = %location, "navigating");
        self.update_page(|page| page.location = location.to_string());
    }

    fn fail(&self, flow: Flow, err: ClientError, message: &str) -> Outcome {
        error!(%flow, error = %err, "request failed");
        self.notifier.alert(message);
        Outcome::Failed(err)
    }

    fn server_message(message: Option<String>, fallback: &str) -> String {
        message.unwrap_or_else(|| fallback.to_string())
    }
}
