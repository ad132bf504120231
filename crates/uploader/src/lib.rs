pub mod file;
pub mod form;
pub mod invoke;

pub use file::{MAX_UPLOAD_BYTES, PDF_MIME_TYPE, SelectedFile, validate};
pub use form::{Notification, UploadError, UploadForm, Uploader, storage_path};
pub use invoke::FunctionClient;
