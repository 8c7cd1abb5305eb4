//! Request extractors.

use crate::errors::Error;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::debug;

/// JSON body extractor that never rejects a request because of its body.
///
/// An empty or unparseable body yields `T::default()`, leaving it to the handler's own
/// validation to report what is missing.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read request body: {e}")))?;

        Ok(Payload(parse_lenient(&bytes)))
    }
}

/// Query string extractor whose rejection is a `400` in the JSON error envelope.
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::bad_request(e.body_text()))?;

        Ok(QueryParams(value))
    }
}

/// Parse a JSON body, falling back to the default value.
pub fn parse_lenient<T: DeserializeOwned + Default>(bytes: &[u8]) -> T {
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(e) => {
            if !bytes.is_empty() {
                debug!("Ignoring malformed request body: {e}");
            }
            T::default()
        }
    }
}

/// Optional string field where any non-string JSON value counts as absent.
///
/// Use with `#[serde(default, deserialize_with = "lenient_string")]` so a mistyped field does not
/// discard the rest of the body.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        other => {
            debug!("Ignoring non-string value {other}");
            Ok(None)
        }
    }
}

/// A scalar that clients send either as a JSON string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    /// Textual form, as sent.
    pub fn to_text(&self) -> String {
        match self {
            StringOrNumber::String(s) => s.clone(),
            StringOrNumber::Number(n) => n.to_string(),
        }
    }

    /// Interpret the value as an integer id.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StringOrNumber::String(s) => s.trim().parse().ok(),
            StringOrNumber::Number(n) => n.as_i64(),
        }
    }
}
