use std::io;
use std::path::Path;
use tempfile::TempPath;
use tracing::{debug, warn};

/// One request's uploaded file, stored on disk for the lifetime of the request.
///
/// The backing file is removed by [`UploadedDocument::cleanup`], or when the
/// document is dropped on any path that skips the explicit cleanup.
#[derive(Debug)]
pub struct UploadedDocument {
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
    path: TempPath,
}

impl UploadedDocument {
    pub fn new(name: String, size: u64, path: TempPath) -> Self {
        Self {
            name,
            size,
            mime_type: None,
            path,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared as a PDF by either the MIME type or the file extension. Only
    /// used for logging; undeclared content is still handed to the extractor.
    pub fn is_declared_pdf(&self) -> bool {
        self.mime_type
            .as_ref()
            .map(|mt| mt == "application/pdf")
            .unwrap_or_else(|| self.name.to_lowercase().ends_with(".pdf"))
    }

    /// Delete the backing file. A file that is already gone is not an error.
    pub fn cleanup(self) {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => debug!(path = %shown, "Temporary upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %shown, "Temporary upload already removed")
            }
            Err(e) => warn!(path = %shown, error = %e, "Failed to remove temporary upload"),
        }
    }
}
