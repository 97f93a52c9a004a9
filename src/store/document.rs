use crate::wizard::state::{BasicConfig, RagConfig, SecurityConfig, WizardState, WorkflowsConfig};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub use crate::shared::ids::ConfigurationId;

/// A wizard aggregate after the persistence service has accepted it:
/// storage-assigned identity plus timestamps, immutable except for
/// whole-document replace or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedConfiguration {
    pub id: ConfigurationId,
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub workflows: WorkflowsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl PersistedConfiguration {
    pub fn aggregate(&self) -> WizardState {
        WizardState {
            basic: self.basic.clone(),
            rag: self.rag.clone(),
            workflows: self.workflows.clone(),
            security: self.security.clone(),
        }
    }

    /// Best-effort decode of a success payload. Missing or misshapen fields
    /// fall back to defaults and are reported as warnings; pedantic secondary
    /// validation must not discard data the service already accepted.
    pub fn from_value_lenient(value: &serde_json::Value) -> (Option<Self>, Vec<String>) {
        let mut warnings = Vec::new();
        let Some(object) = value.as_object() else {
            warnings.push(format!(
                "configuration payload is not an object: {}",
                short_preview(value)
            ));
            return (None, warnings);
        };

        let raw_id = object
            .get("id")
            .or_else(|| object.get("_id"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let id = match ConfigurationId::parse(raw_id) {
            Ok(id) => id,
            Err(err) => {
                warnings.push(format!("configuration payload has no usable id: {err}"));
                return (None, warnings);
            }
        };

        let mut config = PersistedConfiguration {
            id,
            basic: BasicConfig::default(),
            rag: RagConfig::default(),
            workflows: WorkflowsConfig::default(),
            security: SecurityConfig::default(),
            created_at: string_field(object, "createdAt", &mut warnings),
            updated_at: string_field(object, "updatedAt", &mut warnings),
        };
        config.basic = section(object, "basic", &mut warnings);
        config.rag = section(object, "rag", &mut warnings);
        config.workflows = section(object, "workflows", &mut warnings);
        config.security = section(object, "security", &mut warnings);
        (Some(config), warnings)
    }
}

fn string_field(
    object: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    warnings: &mut Vec<String>,
) -> String {
    match object.get(key) {
        Some(serde_json::Value::String(value)) => value.clone(),
        Some(other) => {
            warnings.push(format!("field `{key}` is not a string: {}", short_preview(other)));
            String::new()
        }
        None => {
            warnings.push(format!("field `{key}` is missing"));
            String::new()
        }
    }
}

fn section<T: Default + for<'de> Deserialize<'de>>(
    object: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    warnings: &mut Vec<String>,
) -> T {
    match object.get(key) {
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(parsed) => parsed,
            Err(err) => {
                warnings.push(format!("section `{key}` failed to decode: {err}"));
                T::default()
            }
        },
        None => {
            warnings.push(format!("section `{key}` is missing"));
            T::default()
        }
    }
}

fn short_preview(value: &serde_json::Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() > 80 {
        let truncated: String = rendered.chars().take(80).collect();
        format!("{truncated}…")
    } else {
        rendered
    }
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
