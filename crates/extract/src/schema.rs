use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    StringArray,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::StringArray => "array<string>",
        }
    }
}

/// Fields the model is asked to fill, in prompt order
pub const PROPERTY_SCHEMA: [(&str, FieldType); 9] = [
    ("address", FieldType::String),
    ("price", FieldType::Number),
    ("bedrooms", FieldType::Number),
    ("bathrooms", FieldType::Number),
    ("car_spaces", FieldType::Number),
    ("land_area_sqm", FieldType::Number),
    ("house_area_sqm", FieldType::Number),
    ("description", FieldType::String),
    ("features", FieldType::StringArray),
];

/// `{"address": "string", "price": "number", ...}`
pub fn schema_json() -> Value {
    let fields: Map<String, Value> = PROPERTY_SCHEMA
        .iter()
        .map(|(name, ty)| (name.to_string(), Value::from(ty.as_str())))
        .collect();
    Value::Object(fields)
}

/// Whatever the model put in each schema slot. Values are carried as-is;
/// the schema only describes what we asked for, nothing here checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyData {
    pub address: Value,
    pub price: Value,
    pub bedrooms: Value,
    pub bathrooms: Value,
    pub car_spaces: Value,
    pub land_area_sqm: Value,
    pub house_area_sqm: Value,
    pub description: Value,
    pub features: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_json_keeps_field_order() {
        let schema = schema_json();
        let keys: Vec<&String> = schema.as_object().unwrap().keys().collect();

        assert_eq!(keys.first().map(|k| k.as_str()), Some("address"));
        assert_eq!(keys.last().map(|k| k.as_str()), Some("features"));
        assert_eq!(keys.len(), 9);
        assert_eq!(schema["features"], "array<string>");
        assert_eq!(schema["land_area_sqm"], "number");
    }

    #[test]
    fn test_property_data_missing_fields_are_null() {
        let data: PropertyData =
            serde_json::from_str(r#"{"address": "1 Main St", "unrelated": true}"#).unwrap();

        assert_eq!(data.address, "1 Main St");
        assert!(data.price.is_null());
        assert!(data.features.is_null());
    }
}
