use common::ContactRequest;

use crate::captcha::{CaptchaEvent, CaptchaWidget};
use crate::gateway::{Gateway, SubmitError};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AlertKind {
    Success,
    Error,
}

/// A transient user-visible notice, rendered by the embedding page.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub kind: AlertKind,
    pub text: String,
}

impl Notification {
    fn success(text: String) -> Self {
        Notification {
            kind: AlertKind::Success,
            text,
        }
    }

    fn error(text: String) -> Self {
        Notification {
            kind: AlertKind::Error,
            text,
        }
    }
}

/// The contact form and its submission lifecycle. Single-threaded and
/// cooperative: the gateway call is the only suspension point.
#[derive(Default)]
pub struct ContactForm {
    pub fields: FormFields,
    pub captcha: CaptchaWidget,
    pub submitting: bool,
    pub captcha_error: bool,
}

impl ContactForm {
    pub fn new() -> Self {
        Default::default()
    }

    /// Routes a widget callback into the state machine and keeps the
    /// error flag in step with it.
    pub fn captcha_event(&mut self, event: CaptchaEvent) {
        match &event {
            CaptchaEvent::Errored => self.captcha_error = true,
            CaptchaEvent::TokenReceived(_) => self.captcha_error = false,
            _ => {}
        }
        self.captcha.handle(event);
    }

    /// The retry affordance shown next to the captcha error message.
    pub fn retry_captcha(&mut self) {
        self.captcha_error = false;
        self.captcha.handle(CaptchaEvent::Reset);
    }

    fn request(&self, token: String) -> ContactRequest {
        ContactRequest {
            name: self.fields.name.clone(),
            email: self.fields.email.clone(),
            subject: self.fields.subject.clone(),
            message: self.fields.message.clone(),
            turnstile_token: Some(token),
        }
    }

    /// Drives one submission attempt. Returns `None` while a submission is
    /// already in flight; otherwise always produces a notification. Fields
    /// are cleared and the widget reset only on success, so a failed
    /// attempt never costs the user their input.
    pub async fn submit<G: Gateway>(&mut self, gateway: &G) -> Option<Notification> {
        if self.submitting {
            return None;
        }
        let token = match self.captcha.token() {
            Some(token) => token.to_owned(),
            None => return Some(Notification::error(SubmitError::MissingCaptcha.to_string())),
        };

        self.submitting = true;
        let result = gateway.send(&self.request(token)).await;
        self.submitting = false;

        Some(match result {
            Ok(response) => {
                self.fields = FormFields::default();
                self.captcha.handle(CaptchaEvent::Reset);
                Notification::success(response.message)
            }
            Err(error) => Notification::error(error.to_string()),
        })
    }
}
