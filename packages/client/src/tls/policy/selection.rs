//! Client certificate selection policy
//!
//! Invoked when the server asks for client authentication. The decision is
//! which of the configured certificates to present, if any.

use std::fmt;
use std::sync::Arc;

use rustls::pki_types::CertificateDer;

use crate::tls::certificate::ClientCertificate;
use crate::tls::configuration::TlsClientConfiguration;

/// Inputs available to a selection policy
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Configuration the handshake is running with
    pub sender: &'a TlsClientConfiguration,
    pub target_host: &'a str,
    /// Configured client certificates, empty when none are configured
    pub local_certificates: &'a [ClientCertificate],
    /// Server certificate, when the engine already has it at this point
    pub remote_certificate: Option<&'a CertificateDer<'a>>,
    /// DER distinguished names of the issuers the server accepts
    pub acceptable_issuers: &'a [&'a [u8]],
}

/// Decides which client certificate to present.
///
/// Returning `None` continues the handshake without client authentication.
pub trait CertificateSelector: Send + Sync {
    fn select(&self, context: &SelectionContext<'_>) -> Option<ClientCertificate>;
}

impl<F> CertificateSelector for F
where
    F: Fn(&SelectionContext<'_>) -> Option<ClientCertificate> + Send + Sync,
{
    fn select(&self, context: &SelectionContext<'_>) -> Option<ClientCertificate> {
        self(context)
    }
}

/// Default selection: never present a certificate, even when some are
/// configured. Client authentication requires an explicit policy.
#[inline]
pub fn default_select(_context: &SelectionContext<'_>) -> Option<ClientCertificate> {
    None
}

/// Present the first configured certificate
pub fn select_first(context: &SelectionContext<'_>) -> Option<ClientCertificate> {
    context.local_certificates.first().cloned()
}

/// Present the first certificate issued by an issuer the server accepts.
///
/// When the server names no issuers, any certificate is acceptable and the
/// first one is presented.
pub fn select_by_acceptable_issuer(context: &SelectionContext<'_>) -> Option<ClientCertificate> {
    if context.acceptable_issuers.is_empty() {
        return select_first(context);
    }
    context
        .local_certificates
        .iter()
        .find(|cert| cert.is_issued_by_any(context.acceptable_issuers))
        .cloned()
}

/// Effective selection policy of a configuration
#[derive(Clone, Default)]
pub enum SelectionPolicy {
    /// [`default_select`]
    #[default]
    Default,
    UserSupplied(Arc<dyn CertificateSelector>),
}

impl SelectionPolicy {
    pub fn select(&self, context: &SelectionContext<'_>) -> Option<ClientCertificate> {
        match self {
            Self::Default => default_select(context),
            Self::UserSupplied(selector) => selector.select(context),
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("SelectionPolicy::Default"),
            Self::UserSupplied(_) => f.write_str("SelectionPolicy::UserSupplied(..)"),
        }
    }
}
