//! TLS-specific error types for detailed error handling

use super::protocols::SslProtocols;

/// Errors raised while loading certificates, building the engine
/// configuration, or running the handshake.
///
/// The configuration object itself never produces one of these; they
/// surface once the configuration is handed to the engine.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Certificate parsing failed: {0}")]
    CertificateParsing(String),
    #[error("Private key parsing failed: {0}")]
    KeyParsing(String),
    #[error("Invalid target host '{0}'")]
    InvalidTargetHost(String),
    #[error("No supported protocol version in {0}")]
    UnsupportedProtocols(SslProtocols),
    #[error("Verifier construction failed: {0}")]
    Verifier(String),
    #[error("Server certificate rejected by validation policy")]
    CertificateRejected,
    #[error("TLS handshake failed: {0}")]
    Handshake(String),
    #[error("TLS handshake timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("File operation failed: {0}")]
    FileOperation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
