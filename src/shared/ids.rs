use getrandom::getrandom;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

const ID_BYTE_LEN: usize = 12;

pub fn validate_identifier_value(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Ok(());
    }
    Err(format!(
        "{kind} must use only ASCII letters, digits, '-' or '_'"
    ))
}

/// Storage-assigned identity of a persisted configuration document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfigurationId(String);

impl ConfigurationId {
    pub fn parse(raw: &str) -> Result<Self, String> {
        validate_identifier_value("configuration id", raw)?;
        Ok(Self(raw.to_string()))
    }

    pub fn generate() -> Result<Self, String> {
        let mut bytes = [0_u8; ID_BYTE_LEN];
        getrandom(&mut bytes)
            .map_err(|err| format!("failed to generate configuration id randomness: {err}"))?;
        let mut hex = String::with_capacity(ID_BYTE_LEN * 2);
        for byte in bytes {
            hex.push_str(&format!("{byte:02x}"));
        }
        Ok(Self(hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfigurationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::borrow::Borrow<str> for ConfigurationId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for ConfigurationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl<'de> Deserialize<'de> for ConfigurationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .map_err(|err| D::Error::custom(format!("invalid configuration id `{raw}`: {err}")))
    }
}
