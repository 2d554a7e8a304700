use serde::{Deserialize, Serialize};

/// Error body returned by the hosted service. The auth API and the table API
/// disagree on field names, so every known spelling is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ServiceErrorBody {
    pub fn message(&self) -> Option<&str> {
        [
            &self.error_description,
            &self.msg,
            &self.message,
            &self.error,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|text| !text.is_empty())
    }
}

/// Best human-readable message for a failed response body.
pub fn service_error_message(body: &str, status_text: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ServiceErrorBody>(body) {
        if let Some(message) = parsed.message() {
            return message.to_string();
        }
    }

    let raw = body.trim();
    if raw.is_empty() {
        status_text.to_string()
    } else {
        raw.to_string()
    }
}
