use anyhow::{Context, Result};
use async_trait::async_trait;

/// Source of raw PDF bytes
#[async_trait]
pub trait PdfFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Clone, Default)]
pub struct HttpPdfFetcher {
    client: reqwest::Client,
}

impl HttpPdfFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PdfFetcher for HttpPdfFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client
            .get(url)
            .send()
            .await
            .context("Failed to send request for PDF")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch PDF: {}", response.status());
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read PDF body")?;

        tracing::debug!(url, bytes = bytes.len(), "Fetched PDF");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/listing.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF-1.5 fake".to_vec())
            .create_async()
            .await;

        let fetcher = HttpPdfFetcher::default();
        let bytes = fetcher
            .fetch(&format!("{}/listing.pdf", server.url()))
            .await
            .unwrap();

        assert_eq!(bytes, b"%PDF-1.5 fake");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpPdfFetcher::default();
        let err = fetcher
            .fetch(&format!("{}/missing.pdf", server.url()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
    }
}
