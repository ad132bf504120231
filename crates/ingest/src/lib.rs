pub mod fetch;
pub mod reader;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use fetch::{HttpPdfFetcher, PdfFetcher};
pub use reader::{PdfReader, PdfText};
