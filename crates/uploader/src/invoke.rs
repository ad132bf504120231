use serde::{Deserialize, Serialize};
use store::{PropertyRecord, SupabaseConfig};

use crate::form::UploadError;

/// Calls a deployed import function over HTTP
#[derive(Clone)]
pub struct FunctionClient {
    config: SupabaseConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportBody<'a> {
    pdf_url: &'a str,
    file_name: &'a str,
}

#[derive(Deserialize)]
struct ImportEnvelope {
    success: bool,
    property: PropertyRecord,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl FunctionClient {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn import_property(
        &self,
        function: &str,
        access_token: &str,
        pdf_url: &str,
        file_name: &str,
    ) -> Result<PropertyRecord, UploadError> {
        let url = format!("{}/functions/v1/{}", self.config.url, function);

        let response = self.client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .json(&ImportBody { pdf_url, file_name })
            .send()
            .await
            .map_err(|e| UploadError::Processing(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Processing(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("import function returned {}", status));
            return Err(UploadError::Processing(message));
        }

        match serde_json::from_str::<ImportEnvelope>(&body) {
            Ok(envelope) if envelope.success => Ok(envelope.property),
            _ => Err(UploadError::Processing("malformed response".to_string())),
        }
    }
}
