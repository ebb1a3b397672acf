//! # Trusted HTTPS Transport
//!
//! This module provides the HTTP layer used for every request against the
//! SP leader. It wraps a blocking `reqwest` client that is configured once
//! and reused for the whole run.
//!
//! ## Core Features:
//! - **Pinned Trust Anchor**: The client trusts exactly the certificates
//!   found in the supplied PEM bundle. The platform trust store is
//!   disabled, so a leader presenting any other certificate fails the
//!   TLS handshake.
//! - **Credential Injection**: Every outbound request carries the API
//!   token under the leader's custom header along with an
//!   `Accept: application/json` declaration.
//! - **Plain GETs**: One synchronous GET per call. No retries, no
//!   caching; pagination policy belongs to the caller.

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Certificate;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Header name carrying the API token on every outbound request.
pub const TOKEN_HEADER: &str = "X-Arbux-APIToken";

/// Failures raised while building the client or performing a GET.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("trust store {path} is unreadable: {source}")]
    TrustStoreIo {
        path: String,
        source: std::io::Error,
    },

    #[error("trust store {path} could not be parsed: {source}")]
    TrustStoreParse {
        path: String,
        source: reqwest::Error,
    },

    #[error("trust store {path} contains no certificates")]
    TrustStoreEmpty { path: String },

    #[error("failed to construct HTTPS client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("malformed url {url}: {source}")]
    BadUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
}

/// A raw HTTP response: the status code plus the full body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Seam between the page walker / annotation resolver and the network.
///
/// The production implementation is [`SpTransport`]; tests substitute an
/// in-memory stub so pagination and resolution logic can be exercised
/// without a live leader.
pub trait Transport {
    /// Perform a single GET against `url` and return the raw response.
    fn fetch(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// HTTPS client bound to one leader credential and one trust anchor.
pub struct SpTransport {
    /// The underlying blocking client, built once and reused.
    client: Client,
    /// Opaque API token generated on the leader.
    api_token: String,
}

impl SpTransport {
    /// Build the transport from a PEM trust-store file and an API token.
    ///
    /// The trust store is read once; its certificates become the only
    /// accepted TLS anchors for the lifetime of the transport.
    pub fn new(trust_store: &Path, api_token: String) -> Result<Self, TransportError> {
        let path = trust_store.display().to_string();

        let pem = fs::read(trust_store).map_err(|source| TransportError::TrustStoreIo {
            path: path.clone(),
            source,
        })?;

        let anchors = Certificate::from_pem_bundle(&pem).map_err(|source| {
            TransportError::TrustStoreParse {
                path: path.clone(),
                source,
            }
        })?;
        if anchors.is_empty() {
            return Err(TransportError::TrustStoreEmpty { path });
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Trust exactly the supplied anchors. The built-in roots stay out
        // of the picture so an unexpected leader certificate cannot pass.
        let mut builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .default_headers(default_headers);
        for anchor in anchors {
            builder = builder.add_root_certificate(anchor);
        }

        Ok(Self {
            client: builder.build().map_err(TransportError::ClientBuild)?,
            api_token,
        })
    }
}

impl Transport for SpTransport {
    fn fetch(&self, url: &str) -> Result<RawResponse, TransportError> {
        let parsed = Url::parse(url).map_err(|source| TransportError::BadUrl {
            url: url.to_string(),
            source,
        })?;

        debug!("GET {}", parsed);

        let response = self
            .client
            .get(parsed)
            .header(TOKEN_HEADER, &self.api_token)
            .send()
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_trust_store_is_a_config_failure() {
        let err = SpTransport::new(Path::new("./no-such-cacerts.pem"), "token".into())
            .err()
            .expect("transport must not build without a trust store");
        assert!(matches!(err, TransportError::TrustStoreIo { .. }));
    }

    #[test]
    fn trust_store_without_certificates_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not a certificate bundle").unwrap();

        let err = SpTransport::new(file.path(), "token".into())
            .err()
            .expect("an anchor-free store must be rejected");
        assert!(matches!(
            err,
            TransportError::TrustStoreEmpty { .. } | TransportError::TrustStoreParse { .. }
        ));
    }
}
