use anyhow::{Context, Result};
use std::path::Path;

use crate::form::UploadError;

/// Largest file accepted for import
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file the user picked, with its type sniffed from the content
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Not a file path: {:?}", path))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size in MB with two decimals, as shown next to the file name
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// Runs before any network call is attempted
pub fn validate(file: &SelectedFile) -> Result<(), UploadError> {
    if file.mime_type != PDF_MIME_TYPE {
        return Err(UploadError::NotPdf);
    }
    if file.size() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}
