//! Contact form submission relay.
//!
//! Validates the submitted fields, verifies the bot-check token against
//! the external verification service when a secret is configured, then
//! relays the message to the email delivery API. The relay is fire-once:
//! no retry, and a failure surfaces one of the fixed error codes to the
//! caller with no partial state retained.

use anyhow::{bail, Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::html::escape_html;
use crate::server::AppState;

pub const MAX_NAME: usize = 100;
pub const MAX_EMAIL: usize = 254;
pub const MAX_PHONE: usize = 30;
pub const MAX_ORGANIZATION: usize = 100;
pub const MAX_MESSAGE: usize = 5000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub recaptcha_token: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// Fixed submission failure taxonomy. Validation and verification map to
/// 400, delivery failure to 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("required fields are missing")]
    MissingFields,
    #[error("a field exceeds its maximum length")]
    InputTooLong,
    #[error("email address is malformed")]
    InvalidEmail,
    #[error("verification token is missing")]
    RecaptchaRequired,
    #[error("verification was rejected")]
    RecaptchaFailed,
    #[error("email delivery failed")]
    EmailFailed,
    #[error("request could not be processed")]
    ServerError,
}

impl ContactError {
    /// Wire code returned to the client.
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::MissingFields => "missing_fields",
            ContactError::InputTooLong => "input_too_long",
            ContactError::InvalidEmail => "invalid_email",
            ContactError::RecaptchaRequired => "recaptcha_required",
            ContactError::RecaptchaFailed => "recaptcha_failed",
            ContactError::EmailFailed => "email_failed",
            ContactError::ServerError => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::EmailFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<ContactResponse>) {
    match process(&state, &headers, &body).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ContactResponse {
                success: true,
                error: None,
            }),
        ),
        Err(error) => {
            warn!("contact submission rejected: {}", error);
            (
                error.status(),
                Json(ContactResponse {
                    success: false,
                    error: Some(error.code()),
                }),
            )
        }
    }
}

async fn process(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<(), ContactError> {
    // A body that is not the expected JSON shape is not a client
    // validation code of its own; it maps to the generic failure.
    let request: ContactRequest =
        serde_json::from_slice(body).map_err(|_| ContactError::ServerError)?;

    validate(&request)?;

    if request.recaptcha_token.is_empty() {
        return Err(ContactError::RecaptchaRequired);
    }

    if let Some(secret) = &state.config.recaptcha_secret_key {
        match verify_recaptcha(&state.http, &state.config, secret, &request.recaptcha_token).await {
            Ok(true) => {}
            Ok(false) => return Err(ContactError::RecaptchaFailed),
            Err(error) => {
                warn!("recaptcha verification call failed: {:#}", error);
                return Err(ContactError::ServerError);
            }
        }
    }

    let client_ip = header_value(headers, "cf-connecting-ip")
        .or_else(|| header_value(headers, "x-forwarded-for"))
        .unwrap_or_else(|| "-".to_string());
    let user_agent = header_value(headers, "user-agent").unwrap_or_else(|| "-".to_string());

    relay_email(&state.http, &state.config, &request, &client_ip, &user_agent)
        .await
        .map_err(|error| {
            warn!("email relay failed: {:#}", error);
            ContactError::EmailFailed
        })?;

    info!("contact submission relayed to {}", state.config.contact_to);
    Ok(())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Field presence, maximum lengths and email shape.
pub fn validate(request: &ContactRequest) -> Result<(), ContactError> {
    if request.name.is_empty() || request.email.is_empty() || request.message.is_empty() {
        return Err(ContactError::MissingFields);
    }

    let phone_len = request.phone.as_deref().map(str::len).unwrap_or(0);
    let organization_len = request.organization.as_deref().map(str::len).unwrap_or(0);
    if request.name.len() > MAX_NAME
        || request.email.len() > MAX_EMAIL
        || phone_len > MAX_PHONE
        || organization_len > MAX_ORGANIZATION
        || request.message.len() > MAX_MESSAGE
    {
        return Err(ContactError::InputTooLong);
    }

    if !email_regex().is_match(&request.email) {
        return Err(ContactError::InvalidEmail);
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
struct RecaptchaVerdict {
    success: bool,
}

/// Ask the verification service whether the token is genuine.
async fn verify_recaptcha(
    client: &reqwest::Client,
    config: &Config,
    secret: &str,
    token: &str,
) -> Result<bool> {
    let response = client
        .post(&config.recaptcha_verify_url)
        .form(&[("secret", secret), ("response", token)])
        .send()
        .await
        .context("Failed to send request to verification service")?;

    if !response.status().is_success() {
        let status = response.status();
        bail!("Verification service error ({})", status);
    }

    let verdict: RecaptchaVerdict = response
        .json()
        .await
        .context("Failed to parse verification response")?;
    Ok(verdict.success)
}

#[derive(Debug, Serialize)]
struct EmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    reply_to: String,
    html: String,
}

/// Relay the submission to the email delivery API. At-most-once: a
/// non-success response is an error for the caller, never retried here.
async fn relay_email(
    client: &reqwest::Client,
    config: &Config,
    request: &ContactRequest,
    client_ip: &str,
    user_agent: &str,
) -> Result<()> {
    let url = format!("{}/emails", config.email_api_url.trim_end_matches('/'));
    let submitted_at = Utc::now().format("%d.%m.%Y %H:%M UTC").to_string();

    let email = EmailRequest {
        from: config.contact_from.clone(),
        to: vec![config.contact_to.clone()],
        subject: "Uusi yhteydenottolomakkeen viesti BrightFlow-sivulta".to_string(),
        reply_to: request.email.clone(),
        html: email_html(request, &submitted_at, client_ip, user_agent),
    };

    let response = client
        .post(&url)
        .bearer_auth(&config.resend_api_key)
        .json(&email)
        .send()
        .await
        .context("Failed to send request to email API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("Email API error ({}): {}", status, body);
    }

    Ok(())
}

/// HTML body of the relayed email. Finnish field labels, all submitted
/// values escaped, message newlines preserved as line breaks.
fn email_html(
    request: &ContactRequest,
    submitted_at: &str,
    client_ip: &str,
    user_agent: &str,
) -> String {
    format!(
        "<h2>Uusi yhteydenottolomakkeen viesti</h2>\n\
         <p><strong>P\u{e4}iv\u{e4}m\u{e4}\u{e4}r\u{e4}:</strong> {date}</p>\n\
         <hr/>\n\
         <p><strong>Nimi:</strong> {name}</p>\n\
         <p><strong>S\u{e4}hk\u{f6}posti:</strong> {email}</p>\n\
         <p><strong>Puhelin:</strong> {phone}</p>\n\
         <p><strong>Organisaatio:</strong> {organization}</p>\n\
         <hr/>\n\
         <p><strong>Viesti:</strong></p>\n\
         <p>{message}</p>\n\
         <hr/>\n\
         <p style=\"font-size: 12px; color: #666;\">\n\
         <strong>Teknisi\u{e4} tietoja:</strong><br/>\n\
         IP: {ip}<br/>\n\
         User Agent: {agent}\n\
         </p>",
        date = escape_html(submitted_at),
        name = escape_html(&request.name),
        email = escape_html(&request.email),
        phone = escape_html(request.phone.as_deref().unwrap_or("-")),
        organization = escape_html(request.organization.as_deref().unwrap_or("-")),
        message = escape_html(&request.message).replace('\n', "<br/>"),
        ip = escape_html(client_ip),
        agent = escape_html(user_agent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ContactRequest {
        ContactRequest {
            name: "Maija Meikäläinen".to_string(),
            email: "maija@example.fi".to_string(),
            phone: Some("+358 40 123 4567".to_string()),
            organization: Some("Esimerkki Oy".to_string()),
            message: "Haluaisimme kuulla lisää.".to_string(),
            recaptcha_token: "token".to_string(),
        }
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_valid_request_passes() {
        assert!(validate(&valid_request()).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        for field in ["name", "email", "message"] {
            let mut request = valid_request();
            match field {
                "name" => request.name.clear(),
                "email" => request.email.clear(),
                _ => request.message.clear(),
            }
            assert_eq!(validate(&request), Err(ContactError::MissingFields));
        }
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let mut request = valid_request();
        request.phone = None;
        request.organization = None;
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn test_message_at_limit_passes() {
        let mut request = valid_request();
        request.message = "a".repeat(MAX_MESSAGE);
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn test_message_over_limit_rejected() {
        let mut request = valid_request();
        request.message = "a".repeat(MAX_MESSAGE + 1);
        assert_eq!(validate(&request), Err(ContactError::InputTooLong));
    }

    #[test]
    fn test_each_limit_is_enforced() {
        let mut request = valid_request();
        request.name = "a".repeat(MAX_NAME + 1);
        assert_eq!(validate(&request), Err(ContactError::InputTooLong));

        let mut request = valid_request();
        request.email = format!("{}@example.fi", "a".repeat(MAX_EMAIL));
        assert_eq!(validate(&request), Err(ContactError::InputTooLong));

        let mut request = valid_request();
        request.phone = Some("0".repeat(MAX_PHONE + 1));
        assert_eq!(validate(&request), Err(ContactError::InputTooLong));

        let mut request = valid_request();
        request.organization = Some("a".repeat(MAX_ORGANIZATION + 1));
        assert_eq!(validate(&request), Err(ContactError::InputTooLong));
    }

    #[test]
    fn test_invalid_email_shapes() {
        for email in ["plain", "no@tld", "two@@example.fi", "spaces in@example.fi"] {
            let mut request = valid_request();
            request.email = email.to_string();
            assert_eq!(
                validate(&request),
                Err(ContactError::InvalidEmail),
                "'{}' should be rejected",
                email
            );
        }
    }

    #[test]
    fn test_plausible_email_shapes_pass() {
        for email in ["a@b.fi", "first.last@sub.example.com", "x+tag@example.org"] {
            let mut request = valid_request();
            request.email = email.to_string();
            assert!(validate(&request).is_ok(), "'{}' should pass", email);
        }
    }

    // ==================== Error Mapping Tests ====================

    #[test]
    fn test_error_codes() {
        assert_eq!(ContactError::MissingFields.code(), "missing_fields");
        assert_eq!(ContactError::InputTooLong.code(), "input_too_long");
        assert_eq!(ContactError::InvalidEmail.code(), "invalid_email");
        assert_eq!(ContactError::RecaptchaRequired.code(), "recaptcha_required");
        assert_eq!(ContactError::RecaptchaFailed.code(), "recaptcha_failed");
        assert_eq!(ContactError::EmailFailed.code(), "email_failed");
        assert_eq!(ContactError::ServerError.code(), "server_error");
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(ContactError::EmailFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        for error in [
            ContactError::MissingFields,
            ContactError::InputTooLong,
            ContactError::InvalidEmail,
            ContactError::RecaptchaRequired,
            ContactError::RecaptchaFailed,
            ContactError::ServerError,
        ] {
            assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        }
    }

    // ==================== Wire Format Tests ====================

    #[test]
    fn test_request_deserializes_camel_case_token() {
        let json = r#"{
            "name": "Maija",
            "email": "maija@example.fi",
            "message": "Hei",
            "recaptchaToken": "tok-123"
        }"#;
        let request: ContactRequest = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(request.recaptcha_token, "tok-123");
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let request: ContactRequest = serde_json::from_str("{}").expect("should deserialize");
        assert!(request.name.is_empty());
        assert_eq!(validate(&request), Err(ContactError::MissingFields));
    }

    #[test]
    fn test_response_omits_error_on_success() {
        let json = serde_json::to_string(&ContactResponse {
            success: true,
            error: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn test_response_includes_error_code() {
        let json = serde_json::to_string(&ContactResponse {
            success: false,
            error: Some(ContactError::InputTooLong.code()),
        })
        .unwrap();
        assert!(json.contains("input_too_long"));
    }

    // ==================== Email Body Tests ====================

    #[test]
    fn test_email_html_escapes_submitted_values() {
        let mut request = valid_request();
        request.name = "<script>alert(1)</script>".to_string();
        let html = email_html(&request, "01.01.2026 12:00 UTC", "203.0.113.7", "curl/8");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_email_html_preserves_message_line_breaks() {
        let mut request = valid_request();
        request.message = "rivi yksi\nrivi kaksi".to_string();
        let html = email_html(&request, "01.01.2026 12:00 UTC", "-", "-");
        assert!(html.contains("rivi yksi<br/>rivi kaksi"));
    }

    #[test]
    fn test_email_html_dashes_for_missing_optionals() {
        let mut request = valid_request();
        request.phone = None;
        request.organization = None;
        let html = email_html(&request, "01.01.2026 12:00 UTC", "-", "-");
        assert!(html.contains("<strong>Puhelin:</strong> -"));
        assert!(html.contains("<strong>Organisaatio:</strong> -"));
    }
}
