use crate::shared::logging::append_wizard_log_line;
use crate::store::document::PersistedConfiguration;
use crate::store::envelope::ApiEnvelope;
use crate::store::{
    ConfigurationStore, StoreError, GENERIC_CREATE_ERROR, GENERIC_DELETE_ERROR,
    GENERIC_FETCH_ERROR, GENERIC_UPDATE_ERROR,
};
use crate::wizard::state::WizardState;
use serde_json::Value;
use std::path::PathBuf;

/// HTTP client for a persistence service speaking the envelope contract.
/// Shape problems in 2xx bodies are logged, never fatal; the service already
/// accepted the user's data.
pub struct RemoteStore {
    base_url: String,
    state_root: Option<PathBuf>,
}

impl RemoteStore {
    pub fn new(base_url: &str, state_root: Option<PathBuf>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            state_root,
        }
    }

    fn collection_endpoint(&self) -> String {
        format!("{}/configurations", self.base_url)
    }

    fn document_endpoint(&self, id: &str) -> String {
        format!("{}/configurations/{}", self.base_url, urlencoding::encode(id))
    }

    fn log_warnings(&self, context: &str, warnings: &[String]) {
        let Some(state_root) = &self.state_root else {
            return;
        };
        for warning in warnings {
            let _ = append_wizard_log_line(state_root, &format!("remote {context}: {warning}"));
        }
    }

    fn decode_envelope(
        response: ureq::Response,
        fallback: &str,
    ) -> Result<ApiEnvelope, StoreError> {
        let envelope: ApiEnvelope = response
            .into_json()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        if !envelope.success {
            return Err(StoreError::Service {
                status: 200,
                message: envelope.error_text(fallback),
            });
        }
        Ok(envelope)
    }

    fn map_call_error(err: ureq::Error, fallback: &str) -> StoreError {
        match err {
            ureq::Error::Status(status, response) => {
                let envelope: Option<ApiEnvelope> = response.into_json().ok();
                let (message, issues) = match &envelope {
                    Some(envelope) => (envelope.error_text(fallback), envelope.issue_texts()),
                    None => (fallback.to_string(), Vec::new()),
                };
                match status {
                    400 => StoreError::Validation { message, issues },
                    404 => StoreError::NotFound,
                    _ => StoreError::Service { status, message },
                }
            }
            transport => StoreError::Transport(transport.to_string()),
        }
    }

    fn configuration_from_envelope(
        &self,
        context: &str,
        envelope: ApiEnvelope,
        fallback: &str,
    ) -> Result<PersistedConfiguration, StoreError> {
        let data = envelope.data.unwrap_or(Value::Null);
        let (decoded, warnings) = PersistedConfiguration::from_value_lenient(&data);
        self.log_warnings(context, &warnings);
        decoded.ok_or_else(|| StoreError::Service {
            status: 200,
            message: fallback.to_string(),
        })
    }
}

impl ConfigurationStore for RemoteStore {
    fn create(&self, aggregate: &WizardState) -> Result<PersistedConfiguration, StoreError> {
        let body = serde_json::to_value(aggregate).map_err(|source| StoreError::Encode { source })?;
        let response = ureq::post(&self.collection_endpoint())
            .send_json(body)
            .map_err(|err| Self::map_call_error(err, GENERIC_CREATE_ERROR))?;
        let envelope = Self::decode_envelope(response, GENERIC_CREATE_ERROR)?;
        self.configuration_from_envelope("create", envelope, GENERIC_CREATE_ERROR)
    }

    fn list(&self) -> Result<Vec<PersistedConfiguration>, StoreError> {
        let response = ureq::get(&self.collection_endpoint())
            .call()
            .map_err(|err| Self::map_call_error(err, GENERIC_FETCH_ERROR))?;
        let envelope = Self::decode_envelope(response, GENERIC_FETCH_ERROR)?;
        let data = envelope.data.unwrap_or(Value::Null);
        let Some(items) = data.as_array() else {
            self.log_warnings("list", &["list payload is not an array".to_string()]);
            return Ok(Vec::new());
        };
        let mut configurations = Vec::new();
        for item in items {
            let (decoded, warnings) = PersistedConfiguration::from_value_lenient(item);
            self.log_warnings("list", &warnings);
            if let Some(configuration) = decoded {
                configurations.push(configuration);
            }
        }
        Ok(configurations)
    }

    fn get(&self, id: &str) -> Result<PersistedConfiguration, StoreError> {
        let response = ureq::get(&self.document_endpoint(id))
            .call()
            .map_err(|err| Self::map_call_error(err, GENERIC_FETCH_ERROR))?;
        let envelope = Self::decode_envelope(response, GENERIC_FETCH_ERROR)?;
        self.configuration_from_envelope("get", envelope, GENERIC_FETCH_ERROR)
    }

    fn update(
        &self,
        id: &str,
        partial: &serde_json::Value,
    ) -> Result<PersistedConfiguration, StoreError> {
        let response = ureq::put(&self.document_endpoint(id))
            .send_json(partial.clone())
            .map_err(|err| Self::map_call_error(err, GENERIC_UPDATE_ERROR))?;
        let envelope = Self::decode_envelope(response, GENERIC_UPDATE_ERROR)?;
        self.configuration_from_envelope("update", envelope, GENERIC_UPDATE_ERROR)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = ureq::delete(&self.document_endpoint(id))
            .call()
            .map_err(|err| Self::map_call_error(err, GENERIC_DELETE_ERROR))?;
        Self::decode_envelope(response, GENERIC_DELETE_ERROR)?;
        Ok(())
    }
}
