//! Response envelope types.
//!
//! By convention the primary API wraps every response as
//! `{"status_code": 200, "status": "OK", "response": {...}}`. The transport
//! returns the decoded object whole; this module provides typed access for
//! the facade methods that need to look inside.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use pw_core::constants::JOB_DONE_STATUS;
use pw_core::error::{PwError, PwResult};

/// Standard response envelope for the primary API.
///
/// The envelope is conventional, not enforced: endpoints occasionally omit
/// fields, so everything is optional and absence is tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    /// Service-level status code (mirrors HTTP semantics, e.g. 200).
    pub status_code: Option<i64>,
    /// Human-readable status message.
    #[serde(default)]
    pub status: Option<String>,
    /// Endpoint-specific payload.
    pub response: Option<T>,
}

impl ApiResponse {
    /// Extract the envelope fields out of a decoded transport result.
    ///
    /// Tolerant by construction: a field that is absent or carries an
    /// unexpected type (a non-integer `status_code`, say) comes back as
    /// `None` rather than failing, since the envelope is a convention the
    /// service does not always honor.
    pub fn from_value(value: &Value) -> Self {
        Self {
            status_code: value.get("status_code").and_then(Value::as_i64),
            status: value
                .get("status")
                .and_then(Value::as_str)
                .map(String::from),
            response: value.get("response").filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Whether the embedded status code reports success.
    pub fn is_ok(&self) -> bool {
        self.status_code == Some(JOB_DONE_STATUS)
    }

    /// Take the inner `response` object, erroring when it is absent.
    pub fn into_response(self) -> PwResult<Value> {
        self.response
            .ok_or_else(|| PwError::Serialization("envelope has no response field".into()))
    }
}

/// Pull the `response` object out of a decoded envelope without consuming it.
pub fn response_field(value: &Value) -> PwResult<&Value> {
    value
        .get("response")
        .ok_or_else(|| PwError::Serialization("envelope has no response field".into()))
}
