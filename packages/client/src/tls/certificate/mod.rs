//! Certificate handling
//!
//! - Client certificate loading (PEM/DER chain plus private key)
//! - Name extraction and hostname matching for baseline checks

pub mod client;
pub(crate) mod parsing;

pub use client::ClientCertificate;
