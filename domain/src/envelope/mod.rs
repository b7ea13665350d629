//! Remote function wire envelopes
//!
//! The orchestrator and every source handler speak the same three JSON
//! shapes:
//!
//! - [`InvocationPayload`] - `{"domain": "..."}`
//! - [`SubdomainsResponse`] - `{"subdomains": [...]}` (array may be null)
//! - [`FunctionErrorEnvelope`] - `{"errorMessage": "...", "errorType": "..."}`
//!
//! A failure envelope is only meaningful when the invoker also reports the
//! function-error marker; a payload alone never decides success.

use serde::{Deserialize, Serialize};

/// Input to a source function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationPayload {
    #[serde(default)]
    pub domain: String,
}

impl InvocationPayload {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

/// Successful output of a source function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainsResponse {
    /// Hostnames found; serialised as `null` when empty
    #[serde(default, with = "nullable_list")]
    pub subdomains: Vec<String>,
}

impl SubdomainsResponse {
    pub fn new(subdomains: Vec<String>) -> Self {
        Self { subdomains }
    }
}

/// Failure output of a source function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionErrorEnvelope {
    pub error_message: String,
    #[serde(default)]
    pub error_type: String,
}

impl FunctionErrorEnvelope {
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            error_type: error_type.into(),
        }
    }
}

mod nullable_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(list: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        if list.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.collect_seq(list)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
