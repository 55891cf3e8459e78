//! Backend seam: the five HTTP calls the dispatcher makes
//!
//! `HttpBackend` is the real implementation over reqwest. Tests use
//! `testing::MockBackend`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::{ClientError, Result};
use crate::page::SelectedFile;
use crate::wire::{AuthResponse, Credentials, RenameRequest, UploadResponse};

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const UPLOAD_PATH: &str = "/upload";
pub const UPDATE_FILE_PATH: &str = "/update_file";
pub const LOGOUT_PATH: &str = "/logout";

/// One method per endpoint. Non-2xx answers come back as `ClientError::Status`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse>;

    async fn upload(&self, file: &SelectedFile) -> Result<UploadResponse>;

    /// Rename only reports ok / not ok; the body is ignored
    async fn rename(&self, filename: &str, new_filename: &str) -> Result<()>;

    async fn logout(&self) -> Result<()>;
}

/// reqwest-backed client with a cookie jar holding the login session
pub struct HttpBackend {
    client: Client,
    server: ServerConfig,
}

impl HttpBackend {
    pub fn new(server: ServerConfig) -> Result<Self> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = server.timeout() {
            builder = builder.timeout(timeout);
        }
        if server.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, server })
    }

    pub fn endpoint(&self) -> &str {
        &self.server.endpoint
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ClientError::from_send)?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            debug!(%status, url = %response.url(), "request rejected");
            Err(ClientError::status(status))
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::decode(path, e))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let request = self
            .client
            .post(self.server.url(LOGIN_PATH))
            .form(credentials);
        self.send_json(LOGIN_PATH, request).await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let request = self
            .client
            .post(self.server.url(SIGNUP_PATH))
            .form(credentials);
        self.send_json(SIGNUP_PATH, request).await
    }

    async fn upload(&self, file: &SelectedFile) -> Result<UploadResponse> {
        let bytes = tokio::fs::read(&file.path).await?;
        debug!(name = %file.name, size = bytes.len(), "read file for upload");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file.name.clone()));
        let request = self
            .client
            .post(self.server.url(UPLOAD_PATH))
            .multipart(form);
        self.send_json(UPLOAD_PATH, request).await
    }

    async fn rename(&self, filename: &str, new_filename: &str) -> Result<()> {
        let path = format!("{}/{}", UPDATE_FILE_PATH, urlencoding::encode(filename));
        let request = self.client.put(self.server.url(&path)).json(&RenameRequest {
            new_filename: new_filename.to_string(),
        });
        self.send(request).await.map(|_| ())
    }

    async fn logout(&self) -> Result<()> {
        let request = self.client.post(self.server.url(LOGOUT_PATH));
        self.send(request).await.map(|_| ())
    }
}
