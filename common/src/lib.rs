use serde::{Deserialize, Serialize};
use validator::Validate;

/// A contact form submission as posted by the client.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 512))]
    pub subject: String,
    #[validate(length(min = 1, max = 16384))]
    pub message: String,
    #[serde(
        rename = "turnstileToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub turnstile_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
}

/// Body of every non-2xx response from the endpoint. `data` carries the
/// verifier's diagnostic payload when verification was rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(rename = "emailConfigured")]
    pub email_configured: bool,
}
