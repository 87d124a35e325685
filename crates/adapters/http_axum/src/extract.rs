//! Request body extraction.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

use controlhub_domain::error::ValidationError;

use crate::error::ApiError;

/// An optional JSON request body.
///
/// An empty body yields `None`. Anything else must parse as JSON, otherwise
/// the request is rejected with a 400. The `Content-Type` header is not
/// checked.
#[derive(Debug)]
pub struct Payload(pub Option<Value>);

impl Payload {
    /// The body, or `null` when none was sent.
    #[must_use]
    pub fn or_null(self) -> Value {
        self.0.unwrap_or_default()
    }
}

impl<S: Send + Sync> FromRequest<S> for Payload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| ValidationError::MalformedPayload(err.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }
        serde_json::from_slice(&bytes)
            .map(|value| Self(Some(value)))
            .map_err(|err| ValidationError::MalformedPayload(err.to_string()).into())
    }
}
