//! Contact form endpoint
//!
//! `POST /api/contact` with `{name, email, message}`. The submission is
//! validated and logged; nothing is stored or sent.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Contact form errors
#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid request body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Unreadable request body: {0}")]
    UnreadableBody(#[from] BytesRejection),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::UnreadableBody(rejection) => rejection.status(),
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Contact submission failed: {}", self);
        }
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Raw submission; every field optional so missing ones can be reported
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ContactError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ContactError::MissingField(field)),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

impl ContactRequest {
    pub fn validate(self) -> Result<ContactSubmission, ContactError> {
        let name = required(self.name, "name")?;
        let email = required(self.email, "email")?;
        let message = required(self.message, "message")?;
        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(ContactSubmission {
            name,
            email,
            message,
        })
    }
}

/// Parse and validate a raw request body
pub fn parse_submission(body: &[u8]) -> Result<ContactSubmission, ContactError> {
    let request: ContactRequest = serde_json::from_slice(body)?;
    request.validate()
}

pub async fn handle_contact(
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ContactError> {
    let body = body?;
    let submission = parse_submission(&body)?;

    tracing::info!(
        name = %submission.name,
        email = %submission.email,
        length = submission.message.len(),
        "contact form submitted"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Thanks for reaching out! I'll get back to you soon.",
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let submission = parse_submission(
            br#"{"name":" Jane ","email":"jane@example.com","message":"hi"}"#,
        )
        .unwrap();
        assert_eq!(submission.name, "Jane");
    }

    #[test]
    fn test_missing_and_blank_fields() {
        let err = parse_submission(br#"{"name":"Jane","email":"jane@example.com"}"#).unwrap_err();
        assert!(matches!(err, ContactError::MissingField("message")));

        let err = parse_submission(br#"{"name":"  ","email":"a@b.co","message":"x"}"#)
            .unwrap_err();
        assert!(matches!(err, ContactError::MissingField("name")));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_email() {
        let err = parse_submission(br#"{"name":"Jane","email":"nope","message":"x"}"#)
            .unwrap_err();
        assert!(matches!(err, ContactError::InvalidEmail));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_submission(b"{not json").unwrap_err();
        assert!(matches!(err, ContactError::MalformedJson(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_keeps_rejection_status() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from(vec![b' '; 3 * 1024 * 1024]))
            .unwrap();
        let body = Bytes::from_request(request, &()).await;
        assert!(body.is_err());

        let response = handle_contact(body).await.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
    }
}
