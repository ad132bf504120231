pub mod identity;
pub mod record;
pub mod records;
pub mod storage;

pub use identity::{Identity, IdentityProvider, Session, SupabaseAuth};
pub use record::{NewPropertyRecord, PropertyRecord, IMPORTED_STATUS};
pub use records::{PropertyStore, RestPropertyStore};
pub use storage::{ObjectStorage, SupabaseStorage};

/// Project URL and public (anon) key shared by every endpoint
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

/// Pull a human-readable message out of a Supabase error body
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
