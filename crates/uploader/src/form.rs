use std::sync::Arc;

use store::{ObjectStorage, PropertyRecord, Session};

use crate::file::{SelectedFile, validate};
use crate::invoke::FunctionClient;

/// Everything that can stop an import, worded for the person importing
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please select a PDF file.")]
    NotPdf,
    #[error("File size must be less than 10MB.")]
    TooLarge,
    #[error("Please select a PDF document to import.")]
    NoFile,
    #[error("User is not authenticated. Please log in again.")]
    NotAuthenticated,
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Processing failed: {0}")]
    Processing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(m) | Notification::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

/// `{user_id}/{unix_millis}-{file_name}`: per-user folder, and the
/// timestamp keeps repeated uploads of one file apart
pub fn storage_path(user_id: &str, file_name: &str, unix_millis: i64) -> String {
    format!("{}/{}-{}", user_id, unix_millis, file_name)
}

/// Upload to storage, then hand the public URL to the import function
pub struct Uploader {
    storage: Arc<dyn ObjectStorage>,
    functions: FunctionClient,
    bucket: String,
    function: String,
}

impl Uploader {
    pub const DEFAULT_BUCKET: &'static str = "temp-uploads";
    pub const DEFAULT_FUNCTION: &'static str = "import-property";

    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        functions: FunctionClient,
        bucket: String,
        function: String,
    ) -> Self {
        Self {
            storage,
            functions,
            bucket,
            function,
        }
    }

    pub async fn import(
        &self,
        session: Option<&Session>,
        file: &SelectedFile,
    ) -> Result<PropertyRecord, UploadError> {
        validate(file)?;
        let session = session.ok_or(UploadError::NotAuthenticated)?;

        let path = storage_path(&session.user.id, &file.name, chrono::Utc::now().timestamp_millis());

        // x-upsert: a retry simply overwrites the same object
        self.storage
            .upload(
                &session.access_token,
                &self.bucket,
                &path,
                file.bytes.clone(),
                &file.mime_type,
            )
            .await
            .map_err(|e| UploadError::Upload(e.to_string()))?;
        tracing::info!(bucket = %self.bucket, path = %path, "Uploaded PDF");

        let public_url = self.storage
            .public_url(&self.bucket, &path)
            .map_err(|e| UploadError::Upload(e.to_string()))?;

        self.functions
            .import_property(&self.function, &session.access_token, &public_url, &file.name)
            .await
    }
}

/// Select-then-import flow. Holds at most one file and one notification;
/// a failed import leaves the file selected so the user can retry.
#[derive(Debug, Default)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    notification: Option<Notification>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejected files never replace the current selection
    pub fn select(&mut self, file: SelectedFile) {
        match validate(&file) {
            Ok(()) => {
                self.selected = Some(file);
                self.notification = None;
            }
            Err(e) => self.notification = Some(Notification::Error(e.to_string())),
        }
    }

    pub async fn submit(&mut self, uploader: &Uploader, session: Option<&Session>) -> &Notification {
        self.notification = None;

        let outcome = match &self.selected {
            None => Err(UploadError::NoFile),
            Some(file) => uploader.import(session, file).await,
        };

        let notification = match outcome {
            Ok(property) => {
                self.selected = None;
                let address = property.address().unwrap_or("Unknown address");
                Notification::Success(format!(
                    "Success! Property \"{}\" has been imported and processed.",
                    address
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Import failed");
                Notification::Error(e.to_string())
            }
        };

        self.notification.insert(notification)
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }

    pub fn dismiss(&mut self) {
        self.notification = None;
    }
}
