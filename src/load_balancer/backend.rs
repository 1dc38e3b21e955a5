//! Backend descriptor.
//!
//! # Responsibilities
//! - Represent a single upstream target
//! - Hold the pre-parsed URI pieces used on the forwarding hot path
//! - Carry the health flag mutated by the prober through the pool's lock

use axum::http::uri::{Authority, InvalidUri, Scheme};
use thiserror::Error;
use url::Url;

/// Why a backend address cannot be used.
#[derive(Debug, Error)]
pub enum InvalidBackend {
    #[error("invalid backend URL `{url}`: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend URL `{0}` has an unsupported scheme (expected http or https)")]
    UnsupportedScheme(Url),

    #[error("backend URL `{url}` has no usable authority: {source}")]
    InvalidAuthority {
        url: Url,
        #[source]
        source: InvalidUri,
    },
}

/// One upstream target: a fixed address plus its mutable health flag.
///
/// The scheme and authority are parsed once here so the per-request URI
/// rewrite never re-parses the URL.
#[derive(Debug, Clone)]
pub struct Backend {
    pub url: Url,
    pub scheme: Scheme,
    pub authority: Authority,
    pub healthy: bool,
}

impl Backend {
    /// Build a backend from its base URL.
    ///
    /// Backends start healthy; the prober corrects the flag within one
    /// probe interval.
    pub fn from_url(url: Url) -> Result<Self, InvalidBackend> {
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            _ => return Err(InvalidBackend::UnsupportedScheme(url)),
        };

        let authority = match url.authority().parse::<Authority>() {
            Ok(authority) => authority,
            Err(source) => return Err(InvalidBackend::InvalidAuthority { url, source }),
        };

        Ok(Self {
            url,
            scheme,
            authority,
            healthy: true,
        })
    }

    /// Parse and build in one step, keeping the raw string for the error.
    pub fn from_address(address: &str) -> Result<Self, InvalidBackend> {
        let url = Url::parse(address).map_err(|source| InvalidBackend::Parse {
            url: address.to_string(),
            source,
        })?;
        Self::from_url(url)
    }
}
