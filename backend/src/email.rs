use common::ContactRequest;
use lettre::{message::Mailbox, Message, SmtpTransport, Transport};

use crate::error::Error;

const CONTACT_SUBJECT: &str = "New Contact Form Message";

/// A contact message ready for relay. The sender and recipient are both the
/// configured service identity; only the reply-to and body vary per request.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactEmail {
    pub reply_to: Mailbox,
    pub text: String,
}

impl ContactEmail {
    pub fn new(request: &ContactRequest) -> Result<Self, Error> {
        let text = include_str!("message.txt")
            .to_string()
            .replace(":name", &request.name)
            .replace(":email", &request.email)
            .replace(":message", &request.message)
            .replace(":subject", &request.subject);

        Ok(ContactEmail {
            reply_to: request.email.parse()?,
            text,
        })
    }
}

/// Outbound mail transport. Injected so tests can record dispatches instead
/// of opening SMTP connections.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &ContactEmail) -> Result<(), Error>;
}

pub struct SmtpMailer {
    identity: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(identity: Mailbox, transport: SmtpTransport) -> Self {
        SmtpMailer {
            identity,
            transport,
        }
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &ContactEmail) -> Result<(), Error> {
        let message = Message::builder()
            .from(self.identity.clone())
            .to(self.identity.clone())
            .reply_to(email.reply_to.clone())
            .subject(CONTACT_SUBJECT)
            .body(email.text.clone())
            .map_err(|e| Error::MailDispatch(e.to_string()))?;

        self.transport
            .send(&message)
            .map_err(|e| Error::MailDispatch(e.to_string()))?;
        Ok(())
    }
}
