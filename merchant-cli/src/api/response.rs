//! Decoding of merchant API replies
//!
//! The two deployments of the merchant API disagree on response shape:
//!
//! - **Enveloped** replies are wrapped client-side into
//!   `{success, message, statusCode, data, errors}` from the HTTP status and body.
//! - **Passthrough** replies are the backend body itself, which may carry
//!   `success`, `status` or `statusCode` on its own.
//!
//! Each variant has an adapter producing the canonical [`ApiResponse`], which
//! is then classified exactly once into an [`UploadOutcome`]. The HTTP status
//! travels with the adapted reply, so a 200 exchange is a success whatever the
//! body says.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Message used when no response was received at all
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Which backend response contract is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVariant {
    #[default]
    Enveloped,
    Passthrough,
}

impl ApiVariant {
    /// Adapt a raw HTTP reply to the canonical envelope
    pub fn adapt(&self, kind: RequestKind, http_status: u16, body: Option<&Value>) -> ApiResponse {
        match self {
            ApiVariant::Enveloped => adapt_enveloped(kind, http_status, body),
            ApiVariant::Passthrough => adapt_passthrough(kind, http_status, body),
        }
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVariant::Enveloped => write!(f, "enveloped"),
            ApiVariant::Passthrough => write!(f, "passthrough"),
        }
    }
}

impl FromStr for ApiVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enveloped" => Ok(ApiVariant::Enveloped),
            "passthrough" => Ok(ApiVariant::Passthrough),
            other => Err(format!(
                "unknown API variant '{}' (expected 'enveloped' or 'passthrough')",
                other
            )),
        }
    }
}

/// Which endpoint a reply came from; selects the default messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// `PUT /merchant/update/{merchantId}`
    Single,
    /// `POST /merchant/update-multiple`
    Bulk,
}

impl RequestKind {
    fn success_message(&self) -> &'static str {
        match self {
            RequestKind::Single => "Merchant updated successfully",
            RequestKind::Bulk => "Merchants updated successfully",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            RequestKind::Single => "Failed to update merchant",
            RequestKind::Bulk => "Failed to update merchants",
        }
    }

    /// Fallback shown when a failed reply carries no message at all
    pub fn retry_message(&self) -> &'static str {
        match self {
            RequestKind::Single => "Failed to update merchant. Please try again.",
            RequestKind::Bulk => "Failed to update merchants. Please try again.",
        }
    }
}

/// One entry of a reply's `errors` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSubError {
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiSubError {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self {
                message: s.clone(),
                extra: Map::new(),
            }),
            Value::Object(obj) => {
                let message = obj.get("message")?.as_str()?.to_string();
                let extra = obj
                    .iter()
                    .filter(|(k, _)| k.as_str() != "message")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Some(Self { message, extra })
            }
            _ => None,
        }
    }
}

/// Canonical reply envelope every backend variant is adapted to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiSubError>,
    /// Status of the HTTP exchange itself, never read from the body
    #[serde(skip)]
    pub http_status: Option<u16>,
}

impl ApiResponse {
    /// Leniently read a backend body. Unknown or mistyped fields fall back to defaults.
    pub fn from_body(body: &Value) -> Self {
        Self {
            success: body.get("success").and_then(Value::as_bool).unwrap_or(false),
            message: body_message(body).unwrap_or_default(),
            status_code: body_u16(body, "statusCode"),
            status: body_u16(body, "status"),
            data: body.get("data").filter(|v| !v.is_null()).cloned(),
            errors: body_errors(body),
            http_status: None,
        }
    }

    /// Whether the transport or the body declares success in any of the known ways
    pub fn declares_success(&self) -> bool {
        self.http_status == Some(200)
            || self.success
            || self.status == Some(200)
            || self.status_code == Some(200)
    }
}

fn body_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn body_u16(body: &Value, key: &str) -> Option<u16> {
    match body.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn body_errors(body: &Value) -> Vec<ApiSubError> {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(ApiSubError::from_value).collect())
        .unwrap_or_default()
}

fn is_2xx(status: u16) -> bool {
    (200..300).contains(&status)
}

fn adapt_enveloped(kind: RequestKind, http_status: u16, body: Option<&Value>) -> ApiResponse {
    if is_2xx(http_status) {
        return ApiResponse {
            success: true,
            message: kind.success_message().to_string(),
            status_code: Some(http_status),
            data: body.cloned(),
            http_status: Some(http_status),
            ..Default::default()
        };
    }

    ApiResponse {
        success: false,
        message: body
            .and_then(body_message)
            .unwrap_or_else(|| kind.failure_message().to_string()),
        status_code: Some(http_status),
        errors: body.map(body_errors).unwrap_or_default(),
        http_status: Some(http_status),
        ..Default::default()
    }
}

fn adapt_passthrough(kind: RequestKind, http_status: u16, body: Option<&Value>) -> ApiResponse {
    if is_2xx(http_status) {
        return ApiResponse {
            http_status: Some(http_status),
            ..body.map(ApiResponse::from_body).unwrap_or_default()
        };
    }

    ApiResponse {
        success: false,
        message: body
            .and_then(body_message)
            .unwrap_or_else(|| kind.failure_message().to_string()),
        http_status: Some(http_status),
        ..Default::default()
    }
}

/// Uniform result of one submission attempt
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success {
        status_code: Option<u16>,
        payload: Option<Value>,
    },
    Failure {
        message: String,
        status_code: Option<u16>,
        errors: Vec<ApiSubError>,
    },
}

impl UploadOutcome {
    /// Classify a canonical reply
    pub fn from_response(response: ApiResponse, kind: RequestKind) -> Self {
        let status_code = response
            .status_code
            .or(response.status)
            .or(response.http_status);

        if response.declares_success() {
            return UploadOutcome::Success {
                status_code,
                payload: response.data,
            };
        }

        let message = response
            .errors
            .first()
            .map(|e| e.message.clone())
            .or_else(|| Some(response.message.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| kind.retry_message().to_string());

        UploadOutcome::Failure {
            message,
            status_code,
            errors: response.errors,
        }
    }

    /// Decode raw reply bytes for the given backend variant
    pub fn decode(variant: ApiVariant, kind: RequestKind, http_status: u16, body: &[u8]) -> Self {
        let parsed: Option<Value> = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };
        let response = variant.adapt(kind, http_status, parsed.as_ref());
        Self::from_response(response, kind)
    }

    /// Outcome for a request that never produced a response
    pub fn transport_failure() -> Self {
        UploadOutcome::Failure {
            message: UNEXPECTED_ERROR_MESSAGE.to_string(),
            status_code: None,
            errors: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            UploadOutcome::Success { status_code, .. } => *status_code,
            UploadOutcome::Failure { status_code, .. } => *status_code,
        }
    }

    /// Failure message, if this is a failure
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success { .. } => None,
            UploadOutcome::Failure { message, .. } => Some(message),
        }
    }
}
