use extract::PropertyData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const IMPORTED_STATUS: &str = "imported";

/// Row written by a successful import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPropertyRecord {
    pub user_id: String,
    #[serde(flatten)]
    pub data: PropertyData,
    pub status: String,
    pub source_pdf_name: Option<String>,
}

impl NewPropertyRecord {
    /// `user_id` must be the resolved caller, never a client-supplied value
    pub fn imported(user_id: String, data: PropertyData, source_pdf_name: Option<String>) -> Self {
        Self {
            user_id,
            data,
            status: IMPORTED_STATUS.to_string(),
            source_pdf_name,
        }
    }
}

/// A row of the properties table as the store returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub user_id: String,
    #[serde(flatten)]
    pub data: PropertyData,
    pub status: String,
    #[serde(default)]
    pub source_pdf_name: Option<String>,
}

impl PropertyRecord {
    /// What the store would hand back for `record` with no generated columns
    pub fn from_new(record: NewPropertyRecord) -> Self {
        Self {
            id: None,
            created_at: None,
            user_id: record.user_id,
            data: record.data,
            status: record.status,
            source_pdf_name: record.source_pdf_name,
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.data.address.as_str()
    }
}
