//! TLS client configuration
//!
//! The parameter set one secure connection attempt negotiates with: the
//! target host, the client certificates on offer, the enabled protocol
//! versions, the revocation-check flag and the two certificate policies.
//!
//! Nothing here validates. An empty host or an unsupported protocol set is
//! stored as given and only fails once the engine uses it.

use std::fmt;
use std::sync::Arc;

use super::certificate::ClientCertificate;
use super::policy::{
    CertificateSelector, CertificateValidator, SelectionContext, SelectionPolicy,
    ValidationContext, ValidationPolicy,
};
use super::protocols::SslProtocols;

/// Parameters for the TLS handshake of one client connection
#[derive(Clone)]
pub struct TlsClientConfiguration {
    target_host: String,
    client_certificates: Option<Arc<[ClientCertificate]>>,
    enabled_protocols: SslProtocols,
    check_certificate_revocation: bool,
    /// Caller-supplied selection policy; unset means the default applies
    selection_override: Option<Arc<dyn CertificateSelector>>,
    /// Caller-supplied validation policy; unset means the default applies
    validation_override: Option<Arc<dyn CertificateValidator>>,
}

impl TlsClientConfiguration {
    /// Configuration for `target_host` with no client certificates, the
    /// engine's default protocol set and no revocation check
    pub fn new(target_host: impl Into<String>) -> Self {
        Self::with_options(target_host, None, SslProtocols::NONE, false)
    }

    /// Configuration with every data attribute supplied, stored as given
    pub fn with_options(
        target_host: impl Into<String>,
        client_certificates: Option<Arc<[ClientCertificate]>>,
        enabled_protocols: SslProtocols,
        check_certificate_revocation: bool,
    ) -> Self {
        Self {
            target_host: target_host.into(),
            client_certificates,
            enabled_protocols,
            check_certificate_revocation,
            selection_override: None,
            validation_override: None,
        }
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    pub fn set_target_host(&mut self, target_host: impl Into<String>) {
        self.target_host = target_host.into();
    }

    pub fn client_certificates(&self) -> Option<&Arc<[ClientCertificate]>> {
        self.client_certificates.as_ref()
    }

    /// Configured certificates as a slice, empty when absent
    pub fn client_certificate_slice(&self) -> &[ClientCertificate] {
        self.client_certificates.as_deref().unwrap_or(&[])
    }

    pub fn set_client_certificates(&mut self, certificates: Option<Arc<[ClientCertificate]>>) {
        self.client_certificates = certificates;
    }

    pub fn enabled_protocols(&self) -> SslProtocols {
        self.enabled_protocols
    }

    pub fn set_enabled_protocols(&mut self, protocols: SslProtocols) {
        self.enabled_protocols = protocols;
    }

    pub fn check_certificate_revocation(&self) -> bool {
        self.check_certificate_revocation
    }

    pub fn set_check_certificate_revocation(&mut self, check: bool) {
        self.check_certificate_revocation = check;
    }

    /// Effective selection policy: the caller's if one was set, otherwise
    /// the default that never presents a certificate
    pub fn certificate_selection_policy(&self) -> SelectionPolicy {
        self.selection_override
            .clone()
            .map_or(SelectionPolicy::Default, SelectionPolicy::UserSupplied)
    }

    /// Replace the selection policy. The default cannot be restored
    /// afterwards.
    pub fn set_certificate_selection_policy<P>(&mut self, policy: P)
    where
        P: CertificateSelector + 'static,
    {
        self.selection_override = Some(Arc::new(policy));
    }

    /// Replace the selection policy with an already shared one
    pub fn set_shared_certificate_selection_policy(&mut self, policy: Arc<dyn CertificateSelector>) {
        self.selection_override = Some(policy);
    }

    /// Effective validation policy: the caller's if one was set, otherwise
    /// the insecure default that trusts every server
    pub fn certificate_validation_policy(&self) -> ValidationPolicy {
        self.validation_override
            .clone()
            .map_or(ValidationPolicy::Default, ValidationPolicy::UserSupplied)
    }

    /// Replace the validation policy. The default cannot be restored
    /// afterwards.
    pub fn set_certificate_validation_policy<P>(&mut self, policy: P)
    where
        P: CertificateValidator + 'static,
    {
        self.validation_override = Some(Arc::new(policy));
    }

    /// Replace the validation policy with an already shared one
    pub fn set_shared_certificate_validation_policy(
        &mut self,
        policy: Arc<dyn CertificateValidator>,
    ) {
        self.validation_override = Some(policy);
    }

    /// Run the effective selection policy against this configuration
    pub(crate) fn select_certificate(
        &self,
        remote_certificate: Option<&rustls::pki_types::CertificateDer<'_>>,
        acceptable_issuers: &[&[u8]],
    ) -> Option<ClientCertificate> {
        let context = SelectionContext {
            sender: self,
            target_host: &self.target_host,
            local_certificates: self.client_certificate_slice(),
            remote_certificate,
            acceptable_issuers,
        };
        self.certificate_selection_policy().select(&context)
    }

    /// Run the effective validation policy against this configuration
    pub(crate) fn validate_certificate(
        &self,
        certificate: &rustls::pki_types::CertificateDer<'_>,
        chain: &[rustls::pki_types::CertificateDer<'_>],
        policy_errors: super::policy::SslPolicyErrors,
    ) -> bool {
        let context = ValidationContext {
            sender: self,
            certificate,
            chain,
            policy_errors,
        };
        self.certificate_validation_policy().validate(&context)
    }
}

impl fmt::Debug for TlsClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsClientConfiguration")
            .field("target_host", &self.target_host)
            .field(
                "client_certificates",
                &self.client_certificates.as_ref().map(|c| c.len()),
            )
            .field("enabled_protocols", &self.enabled_protocols)
            .field(
                "check_certificate_revocation",
                &self.check_certificate_revocation,
            )
            .field("selection_policy", &self.certificate_selection_policy())
            .field("validation_policy", &self.certificate_validation_policy())
            .finish()
    }
}
