pub mod schema;
pub mod llm;
pub mod prompt;

pub use schema::{FieldType, PropertyData, PROPERTY_SCHEMA, schema_json};
pub use llm::{CompletionClient, OpenAiClient};

use anyhow::{Context, Result};
use std::sync::Arc;

/// Turns listing text into `PropertyData` with one completion call
#[derive(Clone)]
pub struct PropertyExtractor {
    llm_client: Arc<dyn CompletionClient>,
    system_prompt: String,
}

impl PropertyExtractor {
    pub fn new(llm_client: Arc<dyn CompletionClient>) -> Self {
        Self {
            llm_client,
            system_prompt: prompt::build_system_prompt(),
        }
    }

    /// Send the listing text as the only user message
    pub async fn complete(&self, text: &str) -> Result<Option<String>> {
        self.llm_client
            .complete_json(&self.system_prompt, text)
            .await
            .context("Completion call failed")
    }

    /// Parse completion content. Anything other than a JSON object is an
    /// error; there is no fallback to an empty object.
    pub fn parse(content: Option<&str>) -> Result<PropertyData> {
        let content = match content.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => anyhow::bail!("Completion returned no content"),
        };

        let value: serde_json::Value = serde_json::from_str(content)
            .context("Completion is not valid JSON")?;

        if !value.is_object() {
            anyhow::bail!("Completion is not a JSON object");
        }

        serde_json::from_value(value).context("Completion does not match the property shape")
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingClient {
        reply: Option<String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete_json(&self, system: &str, user: &str) -> Result<Option<String>> {
            self.seen.lock().unwrap().push((system.to_string(), user.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_complete_passes_text_as_user_message() {
        let client = Arc::new(RecordingClient {
            reply: Some("{}".to_string()),
            seen: Mutex::new(Vec::new()),
        });
        let extractor = PropertyExtractor::new(client.clone());

        extractor.complete("4 bedroom home").await.unwrap();

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, extractor.system_prompt());
        assert_eq!(seen[0].1, "4 bedroom home");
    }

    #[test]
    fn test_parse_is_identity_mapping() {
        let content = json!({
            "address": "12 Harbour Rd",
            "price": 850000,
            "bedrooms": 3,
            "bathrooms": 2,
            "car_spaces": 1,
            "land_area_sqm": 600,
            "house_area_sqm": 180.5,
            "description": "Renovated cottage",
            "features": ["deck", "pool"]
        })
        .to_string();

        let data = PropertyExtractor::parse(Some(&content)).unwrap();

        assert_eq!(data.address, "12 Harbour Rd");
        assert_eq!(data.price, 850000);
        assert_eq!(data.house_area_sqm, 180.5);
        assert_eq!(data.features, json!(["deck", "pool"]));
    }

    #[test]
    fn test_parse_keeps_values_unvalidated() {
        let data = PropertyExtractor::parse(Some(r#"{"price": "POA", "bedrooms": null}"#)).unwrap();

        assert_eq!(data.price, "POA");
        assert!(data.bedrooms.is_null());
        assert!(data.address.is_null());
    }

    #[test]
    fn test_parse_fails_fast() {
        assert!(PropertyExtractor::parse(None).is_err());
        assert!(PropertyExtractor::parse(Some("   ")).is_err());
        assert!(PropertyExtractor::parse(Some("not json")).is_err());
        assert!(PropertyExtractor::parse(Some("[1, 2]")).is_err());
    }
}
