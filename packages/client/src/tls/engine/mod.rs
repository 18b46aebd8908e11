//! rustls bridge
//!
//! Hands a [`TlsClientConfiguration`](crate::tls::TlsClientConfiguration)
//! to rustls: the selection policy becomes a `ResolvesClientCert`, the
//! validation policy a `ServerCertVerifier`, and the protocol flags the
//! offered versions.

use std::sync::Arc;

use rustls::crypto::CryptoProvider;

pub mod client_config;
pub mod connect;
pub mod options;
pub(crate) mod resolver;
pub(crate) mod roots;
pub(crate) mod verifier;

pub use client_config::build_client_config;
pub use connect::{connect, connect_tcp};
pub use options::{EngineOptions, RootSource};

/// Crypto provider used for key loading, signatures and the handshake
pub fn crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}
