//! Custom Axum extractors for patient request bodies.

use crate::Error;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value as JsonValue;

/// JSON body kept as a raw value so handlers can check field presence
/// (an absent key) separately from field types.
///
/// An empty body is treated as an empty object.
pub struct JsonBody(pub JsonValue);

/// Like [`JsonBody`], but also accepts a JSON string whose content is the
/// JSON document (the double-encoded form older clients send on
/// `PUT /patients/:id`).
pub struct EncodedJsonBody(pub JsonValue);

async fn read_json<S>(req: Request, state: &S) -> Result<JsonValue, Error>
where
    S: Send + Sync,
{
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| Error::InvalidBody(format!("Failed to read request body: {e}")))?;

    parse_json(&bytes)
}

/// Parse a request body, mapping whitespace-only bodies to `{}`.
pub fn parse_json(bytes: &[u8]) -> Result<JsonValue, Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Object(Default::default()));
    }
    serde_json::from_slice(bytes).map_err(|e| Error::InvalidBody(format!("Invalid JSON: {e}")))
}

/// Unwrap one level of string encoding, if present.
pub fn decode_encoded(value: JsonValue) -> Result<JsonValue, Error> {
    match value {
        JsonValue::String(inner) => parse_json(inner.as_bytes()),
        other => Ok(other),
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read_json(req, state).await.map(JsonBody)
    }
}

#[async_trait]
impl<S> FromRequest<S> for EncodedJsonBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = read_json(req, state).await?;
        decode_encoded(value).map(EncodedJsonBody)
    }
}
