//! Request and response bodies exchanged with the backend

use serde::{Deserialize, Serialize};

/// Login or signup form fields, sent as `application/x-www-form-urlencoded`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
    }
}

/// Body of `/login` and `/signup` responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `/upload` responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "fileId", default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,
}

/// Body of `PUT /update_file/{filename}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequest {
    #[serde(rename = "newFilename")]
    pub new_filename: String,
}

impl AuthResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl UploadResponse {
    pub fn stored(filename: impl Into<String>) -> Self {
        Self {
            success: true,
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_reads_backend_field_names() {
        let body = r#"{"success": true, "message": "File uploaded successfully",
                       "filename": "notes.txt", "fileId": 7}"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.filename.as_deref(), Some("notes.txt"));
        assert_eq!(parsed.file_id, Some(7));
    }

    #[test]
    fn auth_response_message_is_optional() {
        let parsed: AuthResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(parsed, AuthResponse { success: false, message: None });
    }

    #[test]
    fn rename_request_uses_camel_case_key() {
        let body = serde_json::to_string(&RenameRequest {
            new_filename: "b.txt".into(),
        })
        .unwrap();
        assert_eq!(body, r#"{"newFilename":"b.txt"}"#);
    }
}
