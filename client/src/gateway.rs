use std::error::Error;
use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use common::{ContactRequest, ErrorResponse, SendResponse};

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitError {
    /// No valid widget token held; the request is never sent.
    MissingCaptcha,
    /// The request never completed, or the response was unreadable.
    Network,
    /// The endpoint answered with `success: false`, optionally with detail.
    Rejected(Option<String>),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::MissingCaptcha => write!(f, "Please complete captcha first."),
            SubmitError::Network => write!(f, "Network error. Please try again later."),
            SubmitError::Rejected(Some(detail)) => write!(f, "{}", detail),
            SubmitError::Rejected(None) => write!(f, "Error sending message"),
        }
    }
}

impl Error for SubmitError {}

/// The one network seam of the client: posts a submission and interprets
/// the endpoint's answer. Injected so the controller is testable without
/// a server.
#[async_trait]
pub trait Gateway {
    async fn send(&self, request: &ContactRequest) -> Result<SendResponse, SubmitError>;
}

pub struct HttpGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpGateway {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(&self, request: &ContactRequest) -> Result<SendResponse, SubmitError> {
        let response = self
            .client
            .post(format!("{}/send", self.endpoint))
            .json(request)
            .send()
            .await
            .map_err(|_| SubmitError::Network)?;

        if response.status().is_success() {
            response
                .json::<SendResponse>()
                .await
                .map_err(|_| SubmitError::Network)
        } else {
            let detail = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| body.error);
            Err(SubmitError::Rejected(detail))
        }
    }
}
