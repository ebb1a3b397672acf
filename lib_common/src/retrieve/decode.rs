//! Decoding of raw leader responses into JSON documents.
//!
//! Non-OK statuses and unparsable bodies are reported as distinct
//! failures. Graceful end-of-data is signalled only by an absent
//! `links.next` in a decoded page, never by a decode result.

use serde_json::Value;
use thiserror::Error;

use super::transport::{RawResponse, Transport, TransportError};

/// Everything that can go wrong between issuing a GET and holding a
/// decoded document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("leader answered with HTTP status {0}")]
    Status(u16),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Parse a raw response into a JSON document.
pub fn decode(raw: RawResponse) -> Result<Value, FetchError> {
    if raw.status != 200 {
        return Err(FetchError::Status(raw.status));
    }
    Ok(serde_json::from_str(&raw.body)?)
}

/// Fetch `url` through `transport` and decode the result in one step.
pub fn fetch_document<T>(transport: &T, url: &str) -> Result<Value, FetchError>
where
    T: Transport + ?Sized,
{
    let raw = transport.fetch(url)?;
    decode(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_body_decodes_to_a_document() {
        let raw = RawResponse {
            status: 200,
            body: r#"{"data": [], "links": {}}"#.to_string(),
        };
        let doc = decode(raw).unwrap();
        assert!(doc["data"].as_array().unwrap().is_empty());
    }

    #[test]
    fn non_ok_status_is_a_distinct_failure() {
        let raw = RawResponse {
            status: 404,
            body: String::new(),
        };
        match decode(raw) {
            Err(FetchError::Status(code)) => assert_eq!(code, 404),
            other => panic!("expected status failure, got {:?}", other),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_failure() {
        let raw = RawResponse {
            status: 200,
            body: "<html>not json</html>".to_string(),
        };
        assert!(matches!(decode(raw), Err(FetchError::Decode(_))));
    }
}
