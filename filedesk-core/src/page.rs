//! In-memory view state: forms, input fields, upload controls and the file table

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::wire::Credentials;

pub const LOGIN_FORM: &str = "loginForm";
pub const SIGNUP_FORM: &str = "signupForm";
pub const UPLOAD_FORM: &str = "uploadForm";
pub const FILES_FORM: &str = "filesForm";

const TYPE_PLACEHOLDER: &str = "Type";
const CREATED_PLACEHOLDER: &str = "Created";
const MODIFIED_PLACEHOLDER: &str = "Modified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Form {
    pub id: String,
    pub visible: bool,
}

/// A file chosen in the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Name sent as the multipart file name
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or(ClientError::NoFileSelected)?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressIndicator {
    pub visible: bool,
    pub fill_percent: u8,
}

/// One entry of the file listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    pub filename: String,
    pub file_type: String,
    pub created: String,
    pub modified: String,
}

impl FileRow {
    /// Row for a fresh upload; only the name comes from the server
    pub fn uploaded(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            file_type: TYPE_PLACEHOLDER.to_string(),
            created: CREATED_PLACEHOLDER.to_string(),
            modified: MODIFIED_PLACEHOLDER.to_string(),
        }
    }

    /// Markup for a `.file-row`, with the filename escaped for both the cell
    /// text and the inline handler arguments
    pub fn to_html(&self) -> String {
        let text = html_escape::encode_text(&self.filename);
        let js_literal = serde_json::Value::String(self.filename.clone()).to_string();
        let arg = html_escape::encode_double_quoted_attribute(&js_literal);

        format!(
            concat!(
                "<div class=\"file-row\">\n",
                "    <div class=\"file-cell\">{name}</div>\n",
                "    <div class=\"file-cell\">{kind}</div>\n",
                "    <div class=\"file-cell\">{created}</div>\n",
                "    <div class=\"file-cell\">{modified}</div>\n",
                "    <div class=\"file-cell\">\n",
                "        <button onclick=\"editFile({arg})\">Edit</button>\n",
                "        <button onclick=\"deleteFile({arg})\">Delete</button>\n",
                "    </div>\n",
                "</div>"
            ),
            name = text,
            kind = html_escape::encode_text(&self.file_type),
            created = html_escape::encode_text(&self.created),
            modified = html_escape::encode_text(&self.modified),
            arg = arg,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileTable {
    pub rows: Vec<FileRow>,
}

impl FileTable {
    pub fn to_html(&self) -> String {
        let rows: Vec<String> = self.rows.iter().map(FileRow::to_html).collect();
        format!("<div class=\"file-table\">\n{}\n</div>", rows.join("\n"))
    }
}

/// The page the dispatcher renders into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub forms: Vec<Form>,
    pub login: Credentials,
    pub signup: Credentials,
    pub file_input: Option<SelectedFile>,
    pub upload_enabled: bool,
    pub progress: ProgressIndicator,
    /// `None` when the page carries no file listing
    pub file_table: Option<FileTable>,
    pub location: String,
}

impl Default for Page {
    fn default() -> Self {
        Self::with_forms(&[LOGIN_FORM, SIGNUP_FORM, UPLOAD_FORM, FILES_FORM])
    }
}

impl Page {
    /// Page with the given forms; the first one starts visible
    pub fn with_forms(ids: &[&str]) -> Self {
        let forms = ids
            .iter()
            .enumerate()
            .map(|(i, id)| Form {
                id: (*id).to_string(),
                visible: i == 0,
            })
            .collect();

        Self {
            forms,
            login: Credentials::default(),
            signup: Credentials::default(),
            file_input: None,
            upload_enabled: true,
            progress: ProgressIndicator {
                visible: false,
                fill_percent: 0,
            },
            file_table: Some(FileTable::default()),
            location: "/".to_string(),
        }
    }

    /// Same page without a file listing
    pub fn without_file_table(mut self) -> Self {
        self.file_table = None;
        self
    }

    /// Hide every form and show `form_id`. Returns false, touching nothing,
    /// when no form has that id.
    pub fn show_only(&mut self, form_id: &str) -> bool {
        if !self.forms.iter().any(|f| f.id == form_id) {
            return false;
        }
        for form in &mut self.forms {
            form.visible = form.id == form_id;
        }
        true
    }

    pub fn visible_forms(&self) -> Vec<&str> {
        self.forms
            .iter()
            .filter(|f| f.visible)
            .map(|f| f.id.as_str())
            .collect()
    }

    pub fn rows(&self) -> &[FileRow] {
        self.file_table
            .as_ref()
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_shows_login_form_only() {
        let page = Page::default();
        assert_eq!(page.visible_forms(), vec![LOGIN_FORM]);
        assert!(page.upload_enabled);
        assert!(!page.progress.visible);
        assert_eq!(page.location, "/");
    }

    #[test]
    fn show_only_unknown_id_leaves_forms_alone() {
        let mut page = Page::default();
        assert!(!page.show_only("missingForm"));
        assert_eq!(page.visible_forms(), vec![LOGIN_FORM]);
    }

    #[test]
    fn selected_file_takes_name_from_path() {
        let file = SelectedFile::from_path("/tmp/reports/q3.pdf").unwrap();
        assert_eq!(file.name, "q3.pdf");

        let err = SelectedFile::from_path("/").unwrap_err();
        assert!(matches!(err, ClientError::NoFileSelected));
    }

    #[test]
    fn row_markup_uses_placeholders() {
        let html = FileRow::uploaded("a.txt").to_html();
        assert!(html.contains("<div class=\"file-cell\">a.txt</div>"));
        assert!(html.contains("<div class=\"file-cell\">Type</div>"));
        assert!(html.contains("<div class=\"file-cell\">Created</div>"));
        assert!(html.contains("<div class=\"file-cell\">Modified</div>"));
        assert!(html.contains("onclick=\"editFile(&quot;a.txt&quot;)\""));
    }

    #[test]
    fn row_markup_escapes_hostile_names() {
        let html = FileRow::uploaded("x');alert(1)//<b>.txt").to_html();
        assert!(html.contains("<div class=\"file-cell\">x');alert(1)//&lt;b&gt;.txt</div>"));
        assert!(html.contains("onclick=\"editFile(&quot;x"));
        assert!(!html.contains("editFile('"));
    }
}
