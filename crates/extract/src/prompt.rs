use crate::schema::schema_json;

pub fn build_system_prompt() -> String {
    format!(
        "You are a highly specialized real estate data extraction bot. \
Your task is to parse the provided text from a real estate property PDF and extract key details into a structured JSON format. \
The output must strictly adhere to the following JSON schema: {:#}",
        schema_json()
    )
}
