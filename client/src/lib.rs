//! Core of the contact form client: the challenge widget state machine and
//! the submission controller, independent of any rendering layer. The
//! embedding page forwards widget callbacks as [`captcha::CaptchaEvent`]s
//! and displays the [`form::Notification`]s the controller produces.

pub mod captcha;
pub mod form;
pub mod gateway;

pub use captcha::{CaptchaEvent, CaptchaState, CaptchaWidget};
pub use form::{AlertKind, ContactForm, FormFields, Notification};
pub use gateway::{Gateway, HttpGateway, SubmitError};
