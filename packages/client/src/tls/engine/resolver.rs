//! Client certificate resolver driven by the selection policy

use std::sync::Arc;

use rustls::SignatureScheme;
use rustls::client::ResolvesClientCert;
use rustls::sign::CertifiedKey;

use crate::tls::configuration::TlsClientConfiguration;

#[derive(Debug)]
pub(crate) struct PolicyCertResolver {
    configuration: Arc<TlsClientConfiguration>,
}

impl PolicyCertResolver {
    pub(crate) fn new(configuration: Arc<TlsClientConfiguration>) -> Self {
        Self { configuration }
    }
}

impl ResolvesClientCert for PolicyCertResolver {
    fn resolve(
        &self,
        root_hint_subjects: &[&[u8]],
        sigschemes: &[SignatureScheme],
    ) -> Option<Arc<CertifiedKey>> {
        // rustls resolves before the server certificate is available
        let Some(selected) = self.configuration.select_certificate(None, root_hint_subjects) else {
            tracing::debug!(
                "No client certificate selected for {}",
                self.configuration.target_host()
            );
            return None;
        };

        let certified_key = selected.certified_key();
        if certified_key.key.choose_scheme(sigschemes).is_none() {
            tracing::warn!(
                "Selected client certificate {} cannot sign with any scheme the server offers",
                selected.subject().unwrap_or("<unparsed>")
            );
        } else {
            tracing::debug!(
                "Presenting client certificate {}",
                selected.subject().unwrap_or("<unparsed>")
            );
        }
        Some(certified_key)
    }

    fn has_certs(&self) -> bool {
        !self.configuration.certificate_selection_policy().is_default()
    }
}
