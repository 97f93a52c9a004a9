use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform wire envelope: every success response is
/// `{"success": true, "data": T}` and every failure is
/// `{"success": false, "error": string, "issues"?: [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Value>>,
}

impl ApiEnvelope {
    pub fn success<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            success: true,
            data: Some(serde_json::to_value(data)?),
            error: None,
            issues: None,
        })
    }

    pub fn failure(error: &str, issues: Vec<Value>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            issues: if issues.is_empty() {
                None
            } else {
                Some(issues)
            },
        }
    }

    pub fn error_text(&self, fallback: &str) -> String {
        self.error
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn issue_texts(&self) -> Vec<String> {
        self.issues
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|issue| match issue {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}
