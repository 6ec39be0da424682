use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// The verifier's answer to a token exchange, as returned by the Cloudflare
/// siteverify API. Diagnostic fields are kept for the 403 response payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnstileOutcome {
    pub success: bool,
    #[serde(
        rename = "error-codes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub error_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl TurnstileOutcome {
    pub fn passed() -> Self {
        TurnstileOutcome {
            success: true,
            error_codes: vec![],
            challenge_ts: None,
            hostname: None,
        }
    }

    pub fn rejected(error_codes: Vec<String>) -> Self {
        TurnstileOutcome {
            success: false,
            error_codes,
            challenge_ts: None,
            hostname: None,
        }
    }
}

/// Gate in front of the mail relay: exchanges a client-held token for a
/// verdict. Injected so tests can substitute deterministic outcomes.
#[rocket::async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<TurnstileOutcome, Error>;
}

pub struct TurnstileVerifier {
    secret: String,
    url: String,
    client: reqwest::Client,
}

impl TurnstileVerifier {
    pub fn new(secret: String, url: String) -> Self {
        TurnstileVerifier {
            secret,
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[rocket::async_trait]
impl Verifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<TurnstileOutcome, Error> {
        let params = [("secret", self.secret.as_str()), ("response", token)];
        self.client
            .post(&self.url)
            .form(&params)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Error::VerificationUnavailable(e.to_string()))?
            .json::<TurnstileOutcome>()
            .await
            .map_err(|e| Error::VerificationUnavailable(e.to_string()))
    }
}
