//! Scripted test doubles for the backend and notifier seams

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{Backend, LOGIN_PATH, SIGNUP_PATH, UPLOAD_PATH};
use crate::error::{ClientError, Result};
use crate::notifier::Notifier;
use crate::page::SelectedFile;
use crate::wire::{AuthResponse, Credentials, UploadResponse};

/// A request the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    Signup(String),
    Upload(String),
    Rename { from: String, to: String },
    Logout,
}

/// A scripted answer, consumed in order
#[derive(Debug)]
pub enum Reply {
    Auth(AuthResponse),
    Upload(UploadResponse),
    /// Plain success for rename and logout
    Ok,
    Err(ClientError),
}

/// Mock backend for testing
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
    delay: Option<Duration>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call
    pub fn reply(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Hold every call for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, call: Call) -> Reply {
        self.calls.lock().unwrap().push(call);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Err(ClientError::transport("no scripted reply")));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

fn misfit(endpoint: &str, reply: Reply) -> ClientError {
    ClientError::decode(endpoint, format!("scripted reply does not fit: {:?}", reply))
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        match self.answer(Call::Login(credentials.username.clone())).await {
            Reply::Auth(response) => Ok(response),
            Reply::Err(err) => Err(err),
            other => Err(misfit(LOGIN_PATH, other)),
        }
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse> {
        match self.answer(Call::Signup(credentials.username.clone())).await {
            Reply::Auth(response) => Ok(response),
            Reply::Err(err) => Err(err),
            other => Err(misfit(SIGNUP_PATH, other)),
        }
    }

    async fn upload(&self, file: &SelectedFile) -> Result<UploadResponse> {
        match self.answer(Call::Upload(file.name.clone())).await {
            Reply::Upload(response) => Ok(response),
            Reply::Err(err) => Err(err),
            other => Err(misfit(UPLOAD_PATH, other)),
        }
    }

    async fn rename(&self, filename: &str, new_filename: &str) -> Result<()> {
        let call = Call::Rename {
            from: filename.to_string(),
            to: new_filename.to_string(),
        };
        match self.answer(call).await {
            Reply::Err(err) => Err(err),
            _ => Ok(()),
        }
    }

    async fn logout(&self) -> Result<()> {
        match self.answer(Call::Logout).await {
            Reply::Err(err) => Err(err),
            _ => Ok(()),
        }
    }
}

/// Notifier that records alerts and answers prompts from a queue.
/// An empty queue answers like a cancelled prompt.
#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
    prompts: Mutex<Vec<(String, String)>>,
    answers: Mutex<VecDeque<Option<String>>>,
    busy: Mutex<Vec<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next prompt (`None` cancels)
    pub fn answer(&self, answer: Option<&str>) {
        self.answers
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    /// (message, default) pairs in the order they were asked
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn busy_events(&self) -> Vec<bool> {
        self.busy.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((message.to_string(), default.to_string()));
        self.answers.lock().unwrap().pop_front().flatten()
    }

    fn upload_busy(&self, busy: bool) {
        self.busy.lock().unwrap().push(busy);
    }
}
