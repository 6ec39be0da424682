use std::convert::TryFrom;

use lettre::{message::Mailbox, transport::smtp::authentication::Credentials, SmtpTransport};
use log::warn;
use serde::Deserialize;

use crate::email::{Mailer, SmtpMailer};
use crate::verify::{TurnstileVerifier, Verifier, SITEVERIFY_URL};

fn default_mail_host() -> String {
    "smtp.seznam.cz".to_owned()
}

fn default_mail_port() -> u16 {
    465
}

fn default_verify_url() -> String {
    SITEVERIFY_URL.to_owned()
}

#[derive(Deserialize)]
struct RawConfig {
    mail_user: Option<String>,
    mail_pass: Option<String>,
    #[serde(default = "default_mail_host")]
    mail_host: String,
    #[serde(default = "default_mail_port")]
    mail_port: u16,
    turnstile_secret: Option<String>,
    #[serde(default = "default_verify_url")]
    turnstile_verify_url: String,
}

/// Runtime configuration, built once at boot. Missing credentials leave the
/// corresponding collaborator unset; requests then fail with a 500 instead of
/// the service refusing to start.
#[derive(Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct Config {
    pub mailer: Option<Box<dyn Mailer>>,
    pub verifier: Option<Box<dyn Verifier>>,
}

impl TryFrom<RawConfig> for Config {
    type Error = crate::error::Error;

    fn try_from(v: RawConfig) -> Result<Self, Self::Error> {
        let mailer = match (v.mail_user, v.mail_pass) {
            (Some(user), Some(pass)) => {
                let identity: Mailbox = format!("\"Portfolio Contact\" <{}>", user).parse()?;
                let credentials = Credentials::new(user, pass);
                let transport = SmtpTransport::relay(&v.mail_host)
                    .map_err(|e| crate::error::Error::MailDispatch(e.to_string()))?
                    .port(v.mail_port)
                    .credentials(credentials)
                    .build();
                Some(Box::new(SmtpMailer::new(identity, transport)) as Box<dyn Mailer>)
            }
            _ => {
                warn!("mail_user or mail_pass not set, mail relay disabled");
                None
            }
        };

        let verifier = match v.turnstile_secret {
            Some(secret) => Some(Box::new(TurnstileVerifier::new(
                secret,
                v.turnstile_verify_url,
            )) as Box<dyn Verifier>),
            None => {
                warn!("turnstile_secret not set, verification disabled");
                None
            }
        };

        Ok(Config { mailer, verifier })
    }
}
