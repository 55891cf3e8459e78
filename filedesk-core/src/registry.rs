use std::collections::HashSet;

/// Names of files uploaded during this session.
///
/// Consulted before an upload and filled after a successful one. Lives only
/// as long as the dispatcher that owns it.
#[derive(Debug, Clone, Default)]
pub struct UploadedFileRegistry {
    names: HashSet<String>,
}

impl UploadedFileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.names.contains(filename)
    }

    /// Returns false if the name was already present
    pub fn record(&mut self, filename: impl Into<String>) -> bool {
        self.names.insert(filename.into())
    }

    /// Follow a server-side rename. Unknown names are ignored.
    pub fn rename(&mut self, from: &str, to: &str) {
        if self.names.remove(from) {
            self.names.insert(to.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
