//! TLS client configuration
//!
//! [`TlsClientConfiguration`] carries what one secure connection attempt
//! negotiates with; [`engine`] runs the handshake with rustls.

pub mod certificate;
pub mod configuration;
pub mod engine;
pub mod errors;
pub mod policy;
pub mod protocols;

pub use certificate::ClientCertificate;
pub use configuration::TlsClientConfiguration;
pub use engine::{EngineOptions, RootSource, build_client_config, connect, connect_tcp};
pub use errors::TlsError;
pub use policy::{
    CertificateSelector, CertificateValidator, INSECURE_DEFAULT_ACCEPT_ALL, SelectionContext,
    SelectionPolicy, SslPolicyErrors, ValidationContext, ValidationPolicy,
};
pub use protocols::{ProtocolName, SslProtocols};
