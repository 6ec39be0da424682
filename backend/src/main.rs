#[macro_use]
extern crate rocket;
extern crate dotenv;

mod config;
mod cors;
mod email;
mod error;
mod verify;

use common::{ContactRequest, HealthResponse, SendResponse};
use dotenv::dotenv;
use rocket::fairing::AdHoc;
use rocket::serde::json::Json;
use rocket::State;
use validator::Validate;

use crate::config::Config;
use crate::cors::Cors;
use crate::email::ContactEmail;
use crate::error::Error;

#[post("/send", format = "json", data = "<request>")]
async fn send(
    config: &State<Config>,
    request: Json<ContactRequest>,
) -> Result<Json<SendResponse>, Error> {
    let verifier = config.verifier.as_ref().ok_or(Error::MissingSecret)?;
    let token = request
        .turnstile_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .ok_or(Error::MissingToken)?;
    request.validate()?;

    // The client already gated on a valid widget token, but that state is
    // never trusted: the token is always exchanged with the verifier first.
    let outcome = verifier.verify(token).await?;
    if !outcome.success {
        return Err(Error::VerificationRejected(outcome));
    }

    let mailer = config.mailer.as_ref().ok_or(Error::MailNotConfigured)?;
    mailer.send(&ContactEmail::new(&request)?)?;

    Ok(Json(SendResponse {
        success: true,
        message: "Email sent successfully!".to_owned(),
    }))
}

#[get("/health")]
fn health(config: &State<Config>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        email_configured: config.mailer.is_some(),
    })
}

// Answers CORS preflight requests; headers come from the Cors fairing.
#[options("/<_..>")]
fn preflight() {}

#[launch]
fn boot() -> _ {
    dotenv().ok();
    env_logger::builder().parse_default_env().init();

    setup(rocket::build().attach(AdHoc::config::<Config>()))
}

fn setup(rocket: rocket::Rocket<rocket::Build>) -> rocket::Rocket<rocket::Build> {
    rocket
        .attach(Cors)
        .mount("/", routes![send, health, preflight])
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;
    use serde_json::{json, Value};

    use super::{setup, Config};
    use crate::email::{ContactEmail, Mailer};
    use crate::error::Error;
    use crate::verify::{TurnstileOutcome, Verifier};

    enum Verdict {
        Pass,
        Reject,
        Unavailable,
    }

    struct StubVerifier {
        verdict: Verdict,
        calls: Arc<AtomicUsize>,
    }

    #[rocket::async_trait]
    impl Verifier for StubVerifier {
        async fn verify(&self, _token: &str) -> Result<TurnstileOutcome, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.verdict {
                Verdict::Pass => Ok(TurnstileOutcome::passed()),
                Verdict::Reject => Ok(TurnstileOutcome::rejected(vec![])),
                Verdict::Unavailable => Err(Error::VerificationUnavailable(
                    "connection refused".to_owned(),
                )),
            }
        }
    }

    struct StubMailer {
        sent: Arc<Mutex<Vec<ContactEmail>>>,
        fail: bool,
    }

    impl Mailer for StubMailer {
        fn send(&self, email: &ContactEmail) -> Result<(), Error> {
            if self.fail {
                return Err(Error::MailDispatch("connection refused".to_owned()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    struct Harness {
        client: Client,
        verifier_calls: Arc<AtomicUsize>,
        sent: Arc<Mutex<Vec<ContactEmail>>>,
    }

    fn harness(verdict: Option<Verdict>, mailer_present: bool, mailer_fails: bool) -> Harness {
        let verifier_calls = Arc::new(AtomicUsize::new(0));
        let sent = Arc::new(Mutex::new(Vec::new()));
        let config = Config {
            verifier: verdict.map(|verdict| {
                Box::new(StubVerifier {
                    verdict,
                    calls: verifier_calls.clone(),
                }) as Box<dyn Verifier>
            }),
            mailer: mailer_present.then(|| {
                Box::new(StubMailer {
                    sent: sent.clone(),
                    fail: mailer_fails,
                }) as Box<dyn Mailer>
            }),
        };
        let client = Client::tracked(setup(rocket::build().manage(config)))
            .expect("valid rocket instance");
        Harness {
            client,
            verifier_calls,
            sent,
        }
    }

    fn request_body() -> Value {
        json!({
            "name": "A",
            "email": "a@b.com",
            "subject": "S",
            "message": "M",
            "turnstileToken": "valid-token",
        })
    }

    fn post(harness: &Harness, body: Value) -> (Status, Value) {
        let response = harness
            .client
            .post("/send")
            .header(ContentType::JSON)
            .body(body.to_string())
            .dispatch();
        let status = response.status();
        let body = response.into_string().expect("response body");
        (status, serde_json::from_str(&body).expect("json body"))
    }

    #[test]
    fn verified_message_is_relayed() {
        let harness = harness(Some(Verdict::Pass), true, false);
        let (status, body) = post(&harness, request_body());

        assert_eq!(status, Status::Ok);
        assert_eq!(
            body,
            json!({ "success": true, "message": "Email sent successfully!" })
        );

        let sent = harness.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "a@b.com".parse().unwrap());
    }

    #[test]
    fn rejected_token_blocks_relay() {
        let harness = harness(Some(Verdict::Reject), true, false);
        let (status, body) = post(&harness, request_body());

        assert_eq!(status, Status::Forbidden);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Turnstile verification failed",
                "data": { "success": false },
            })
        );
        assert_eq!(harness.sent.lock().unwrap().len(), 0);
    }

    #[test]
    fn missing_token_is_a_client_error() {
        let harness = harness(Some(Verdict::Pass), true, false);
        let mut body = request_body();
        body.as_object_mut().unwrap().remove("turnstileToken");
        let (status, body) = post(&harness, body);

        assert_eq!(status, Status::BadRequest);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Missing Turnstile token" })
        );
        assert_eq!(harness.verifier_calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.sent.lock().unwrap().len(), 0);
    }

    #[test]
    fn empty_token_is_treated_as_missing() {
        let harness = harness(Some(Verdict::Pass), true, false);
        let mut body = request_body();
        body["turnstileToken"] = json!("");
        let (status, body) = post(&harness, body);

        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["error"], "Missing Turnstile token");
        assert_eq!(harness.verifier_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_secret_is_a_server_error() {
        let harness = harness(None, true, false);
        let (status, body) = post(&harness, request_body());

        assert_eq!(status, Status::InternalServerError);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Turnstile secret not configured" })
        );
        assert_eq!(harness.sent.lock().unwrap().len(), 0);
    }

    #[test]
    fn verifier_outage_is_a_server_error() {
        let harness = harness(Some(Verdict::Unavailable), true, false);
        let (status, body) = post(&harness, request_body());

        assert_eq!(status, Status::InternalServerError);
        assert_eq!(body["error"], "Turnstile verification error");
        assert_eq!(harness.sent.lock().unwrap().len(), 0);
    }

    #[test]
    fn invalid_fields_are_rejected_before_verification() {
        let harness = harness(Some(Verdict::Pass), true, false);
        let mut body = request_body();
        body["email"] = json!("not-an-address");
        let (status, body) = post(&harness, body);

        assert_eq!(status, Status::BadRequest);
        assert_eq!(body["success"], json!(false));
        assert_eq!(harness.verifier_calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.sent.lock().unwrap().len(), 0);
    }

    #[test]
    fn missing_mail_credentials_fail_after_verification() {
        let harness = harness(Some(Verdict::Pass), false, false);
        let (status, body) = post(&harness, request_body());

        assert_eq!(status, Status::InternalServerError);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Email credentials not configured" })
        );
        assert_eq!(harness.verifier_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispatch_failure_surfaces_transport_detail() {
        let harness = harness(Some(Verdict::Pass), true, true);
        let (status, body) = post(&harness, request_body());

        assert_eq!(status, Status::InternalServerError);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Mailing error: connection refused" })
        );
    }

    #[test]
    fn health_reflects_mail_configuration_only() {
        // No verifier configured: health must not depend on it, nor call it.
        let with_mailer = harness(None, true, false);
        let response = with_mailer.client.get("/health").dispatch();
        assert_eq!(response.status(), Status::Ok);
        let body: Value = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(body, json!({ "status": "ok", "emailConfigured": true }));

        let without_mailer = harness(Some(Verdict::Pass), false, false);
        let response = without_mailer.client.get("/health").dispatch();
        let body: Value = serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(body, json!({ "status": "ok", "emailConfigured": false }));
        assert_eq!(without_mailer.verifier_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn responses_carry_cors_headers() {
        let harness = harness(None, false, false);
        let response = harness.client.get("/health").dispatch();
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
    }
}
