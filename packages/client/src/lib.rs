//! # WebSocket client TLS configuration
//!
//! The TLS parameters a secure WebSocket client negotiates with, and the
//! rustls bridge that runs the handshake with them.
//!
//! ## Features
//!
//! - **Per-connection configuration**: target host, client certificates,
//!   enabled protocol versions, revocation checking
//! - **Certificate selection policy** choosing the client certificate to
//!   present (default: present none)
//! - **Certificate validation policy** deciding whether the server is
//!   trusted (default: trust every server, see [`INSECURE_DEFAULT_ACCEPT_ALL`])
//! - **Rustls engine bridge** running the handshake on any tokio stream
//! - **JSON settings** for file-based configuration
//!
//! ## Usage
//!
//! ```no_run
//! use wsclient_tls::{EngineOptions, TlsClientConfiguration, ValidationContext, connect_tcp};
//!
//! # async fn run() -> Result<(), wsclient_tls::TlsError> {
//! let mut config = TlsClientConfiguration::new("ws.example.com");
//! config.set_certificate_validation_policy(|ctx: &ValidationContext<'_>| {
//!     ctx.policy_errors.is_empty()
//! });
//!
//! let stream = connect_tcp(&config, &EngineOptions::default(), 443).await?;
//! # drop(stream);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod tls;

pub use crate::config::TlsClientSettings;
pub use crate::tls::*;
