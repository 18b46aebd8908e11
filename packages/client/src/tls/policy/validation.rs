//! Server certificate validation policy
//!
//! Invoked once the server certificate and chain are known, after the
//! engine's baseline checks. `true` continues the handshake, `false` makes
//! the engine fail the connection attempt.

use std::fmt;
use std::sync::Arc;

use rustls::pki_types::CertificateDer;

use super::policy_errors::SslPolicyErrors;
use crate::tls::configuration::TlsClientConfiguration;

/// Decision of the default validation policy.
///
/// # Security
///
/// The default accepts every server certificate and ignores all policy
/// errors: expired, self-signed, untrusted, and certificates issued for a
/// different host are all trusted. This keeps existing callers working but
/// disables server authentication. Install a validation policy (for
/// example [`reject_on_policy_errors`]) to verify servers.
pub const INSECURE_DEFAULT_ACCEPT_ALL: bool = true;

/// Inputs available to a validation policy
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Configuration the handshake is running with
    pub sender: &'a TlsClientConfiguration,
    /// Server end-entity certificate
    pub certificate: &'a CertificateDer<'a>,
    /// Intermediates the server presented with it
    pub chain: &'a [CertificateDer<'a>],
    /// Findings of the engine's baseline checks
    pub policy_errors: SslPolicyErrors,
}

/// Decides whether the server certificate is trusted
pub trait CertificateValidator: Send + Sync {
    fn validate(&self, context: &ValidationContext<'_>) -> bool;
}

impl<F> CertificateValidator for F
where
    F: Fn(&ValidationContext<'_>) -> bool + Send + Sync,
{
    fn validate(&self, context: &ValidationContext<'_>) -> bool {
        self(context)
    }
}

/// Default validation: returns [`INSECURE_DEFAULT_ACCEPT_ALL`] for any input
#[inline]
pub fn default_validate(_context: &ValidationContext<'_>) -> bool {
    INSECURE_DEFAULT_ACCEPT_ALL
}

/// Trust the server only when the baseline checks found nothing
pub fn reject_on_policy_errors(context: &ValidationContext<'_>) -> bool {
    context.policy_errors.is_empty()
}

/// Effective validation policy of a configuration
#[derive(Clone, Default)]
pub enum ValidationPolicy {
    /// [`default_validate`]
    #[default]
    Default,
    UserSupplied(Arc<dyn CertificateValidator>),
}

impl ValidationPolicy {
    pub fn validate(&self, context: &ValidationContext<'_>) -> bool {
        match self {
            Self::Default => default_validate(context),
            Self::UserSupplied(validator) => validator.validate(context),
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for ValidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("ValidationPolicy::Default"),
            Self::UserSupplied(_) => f.write_str("ValidationPolicy::UserSupplied(..)"),
        }
    }
}
