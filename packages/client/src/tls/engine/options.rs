//! Engine options
//!
//! Settings the TLS engine needs that are not part of the per-connection
//! configuration: trust anchors for the baseline checks, revocation lists,
//! ALPN, SNI and the handshake deadline.

use std::time::Duration;

use rustls::pki_types::{CertificateDer, CertificateRevocationListDer};
use serde::Deserialize;

/// Where the baseline verifier's trust anchors come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSource {
    /// Platform certificate store, falling back to the bundled Mozilla
    /// roots when it cannot be fully loaded
    #[default]
    Native,
    /// Bundled Mozilla roots only
    WebPki,
    /// Only the extra roots supplied in [`EngineOptions::extra_roots`]
    Empty,
}

/// Engine-side settings for running a handshake
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub root_source: RootSource,
    /// Additional trust anchors, e.g. a private CA
    pub extra_roots: Vec<CertificateDer<'static>>,
    /// Revocation lists consulted when the configuration asks for
    /// revocation checking
    pub revocation_lists: Vec<CertificateRevocationListDer<'static>>,
    /// ALPN identifiers, most preferred first
    pub alpn_protocols: Vec<Vec<u8>>,
    /// Send the target host as SNI
    pub enable_sni: bool,
    pub handshake_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            root_source: RootSource::Native,
            extra_roots: Vec::new(),
            revocation_lists: Vec::new(),
            // WebSocket upgrade runs over HTTP/1.1
            alpn_protocols: vec![b"http/1.1".to_vec()],
            enable_sni: true,
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

impl EngineOptions {
    /// Bundled Mozilla roots only, ignoring anchors installed on the host,
    /// with a shorter handshake deadline
    #[must_use]
    pub fn strict() -> Self {
        Self {
            root_source: RootSource::WebPki,
            handshake_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Options trusting only `roots`, for private deployments and tests
    #[must_use]
    pub fn with_roots(roots: Vec<CertificateDer<'static>>) -> Self {
        Self {
            root_source: RootSource::Empty,
            extra_roots: roots,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    #[must_use]
    pub fn revocation_lists(mut self, crls: Vec<CertificateRevocationListDer<'static>>) -> Self {
        self.revocation_lists = crls;
        self
    }
}
