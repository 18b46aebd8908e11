//! Configuration loading
//!
//! Settings files that produce a TLS client configuration and engine options.

pub mod settings;

pub use settings::{CertificateFiles, EngineSettings, TlsClientSettings};
