use common::ErrorResponse;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use thiserror::Error;

use crate::verify::TurnstileOutcome;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Turnstile secret not configured")]
    MissingSecret,
    #[error("Missing Turnstile token")]
    MissingToken,
    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("Turnstile verification error")]
    VerificationUnavailable(String),
    #[error("Turnstile verification failed")]
    VerificationRejected(TurnstileOutcome),
    #[error("Email credentials not configured")]
    MailNotConfigured,
    #[error("Mailing error: {0}")]
    MailDispatch(String),
    #[error("Email address error: {0}")]
    EmailAddress(#[from] lettre::address::AddressError),
}

impl Error {
    fn status(&self) -> Status {
        match self {
            Error::MissingToken | Error::Validation(_) | Error::EmailAddress(_) => {
                Status::BadRequest
            }
            Error::VerificationRejected(_) => Status::Forbidden,
            _ => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> rocket::response::Responder<'r, 'o> for Error {
    fn respond_to(self, request: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let code = self.status();
        if code == Status::InternalServerError {
            log::error!("request failed: {:?}", self);
        }
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            data: match self {
                Error::VerificationRejected(outcome) => serde_json::to_value(outcome).ok(),
                _ => None,
            },
        };
        status::Custom(code, Json(body)).respond_to(request)
    }
}
