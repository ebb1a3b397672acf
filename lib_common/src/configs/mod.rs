//! Run configuration for one reporting pass against an SP leader.
//!
//! Everything the walker needs is assembled here before any network
//! I/O: leader host, credential, trust-store path and the optional
//! server-side alert filter. Invalid configuration aborts the run with
//! a diagnostic instead of degrading into a silent empty walk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Listing endpoint on the leader; pagination links are relative to it.
pub const ALERTS_PATH: &str = "/api/sp/alerts/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("leader {leader} does not form a valid URL: {source}")]
    BadLeader {
        leader: String,
        source: url::ParseError,
    },

    #[error("API token must not be empty")]
    EmptyToken,
}

/// Configuration for one run, typically assembled by the CLI from
/// arguments and environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Hostname (or host:port) of the SP leader.
    pub leader: String,
    /// Opaque API token generated on the leader.
    pub api_token: String,
    /// PEM bundle holding the certificates to trust.
    pub trust_store: PathBuf,
    /// Optional server-side filter expression, e.g.
    /// `/data/attributes/alert_class = system_event`.
    pub filter: Option<String>,
}

impl RunConfig {
    /// Validate fields that cannot be checked by parsing alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        self.first_page_url().map(|_| ())
    }

    /// URL of the first alerts page, with the filter percent-encoded
    /// into the query when one is configured.
    pub fn first_page_url(&self) -> Result<String, ConfigError> {
        let base = format!("https://{}{}", self.leader, ALERTS_PATH);
        let mut url = Url::parse(&base).map_err(|source| ConfigError::BadLeader {
            leader: self.leader.clone(),
            source,
        })?;

        if let Some(filter) = &self.filter {
            url.query_pairs_mut().append_pair("filter", filter);
        }

        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig {
            leader: "leader.example.com".to_string(),
            api_token: "secret".to_string(),
            trust_store: PathBuf::from("./cacerts.pem"),
            filter: None,
        }
    }

    #[test]
    fn first_page_url_targets_the_alerts_listing() {
        assert_eq!(
            config().first_page_url().unwrap(),
            "https://leader.example.com/api/sp/alerts/"
        );
    }

    #[test]
    fn filter_is_percent_encoded_into_the_query() {
        let mut cfg = config();
        cfg.filter = Some("/data/attributes/alert_class = system_event".to_string());
        let url = cfg.first_page_url().unwrap();
        assert!(url.starts_with("https://leader.example.com/api/sp/alerts/?filter="));
        assert!(!url.contains(' '));
        assert!(url.contains("alert_class"));
    }

    #[test]
    fn empty_token_is_rejected_before_any_request() {
        let mut cfg = config();
        cfg.api_token = "  ".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptyToken)));
    }

    #[test]
    fn unparsable_leader_is_rejected() {
        let mut cfg = config();
        cfg.leader = "not a hostname".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadLeader { .. })
        ));
    }
}
