//! filedesk-core: account and file-management client
//!
//! The `Dispatcher` owns the page state and runs one flow per user action
//! (login, signup, upload, rename, delete, logout) against a `Backend`,
//! talking to the user through a `Notifier`.

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod notifier;
pub mod page;
pub mod registry;
pub mod testing;
pub mod wire;

pub use backend::{Backend, HttpBackend};
pub use config::{ClientConfig, ServerConfig, UiConfig};
pub use dispatcher::{AppState, Dispatcher, Flow, Outcome};
pub use error::{ClientError, Result};
pub use notifier::Notifier;
pub use page::{FileRow, FileTable, Page, SelectedFile};
pub use registry::UploadedFileRegistry;
pub use wire::{AuthResponse, Credentials, RenameRequest, UploadResponse};
