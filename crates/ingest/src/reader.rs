use anyhow::{Context, Result};
use lopdf::Document;

#[derive(Debug, Clone)]
pub struct PdfText {
    /// Page texts joined with a single space, in page order
    pub text: String,
    pub page_count: usize,
}

pub struct PdfReader;

impl PdfReader {
    /// Plain text of every page, in page order. Pages whose content
    /// stream cannot be decoded come back empty.
    pub fn read_pages(bytes: &[u8]) -> Result<Vec<String>> {
        let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;

        // get_pages is keyed by 1-based page number, so iteration is ordered
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let mut pages = Vec::with_capacity(page_numbers.len());
        for page_number in page_numbers {
            match doc.extract_text(&[page_number]) {
                Ok(text) => pages.push(text.trim().to_string()),
                Err(e) => {
                    tracing::warn!(page = page_number, error = %e, "Skipping unreadable page");
                    pages.push(String::new());
                }
            }
        }

        Ok(pages)
    }

    /// Lossy, best-effort text extraction. Layout is not preserved.
    pub fn extract_text(bytes: &[u8]) -> Result<PdfText> {
        let pages = Self::read_pages(bytes)?;
        let page_count = pages.len();

        let text = pages
            .iter()
            .filter(|p| !p.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            anyhow::bail!(
                "No text could be extracted from the PDF ({} pages). It may be image-based or encrypted",
                page_count
            );
        }

        Ok(PdfText { text, page_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::pdf_with_pages;

    #[test]
    fn test_pages_joined_in_order() {
        let bytes = pdf_with_pages(&["First page", "Second page", "Third page"]);
        let extracted = PdfReader::extract_text(&bytes).unwrap();

        assert_eq!(extracted.page_count, 3);
        let first = extracted.text.find("First").unwrap();
        let second = extracted.text.find("Second").unwrap();
        let third = extracted.text.find("Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_read_pages_one_entry_per_page() {
        let bytes = pdf_with_pages(&["3 bed house", "Double garage"]);
        let pages = PdfReader::read_pages(&bytes).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("3 bed house"));
        assert!(pages[1].contains("Double garage"));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(PdfReader::extract_text(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_blank_document_rejected() {
        let bytes = pdf_with_pages(&[""]);
        let err = PdfReader::extract_text(&bytes).unwrap_err();
        assert!(err.to_string().contains("No text could be extracted"));
    }
}
