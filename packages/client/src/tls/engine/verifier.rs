//! Server certificate verifier driven by the validation policy
//!
//! The baseline WebPKI verifier only produces findings. Whether the
//! handshake continues is decided by the configuration's validation policy.

use std::sync::Arc;

use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, DigitallySignedStruct, SignatureScheme};

use super::options::EngineOptions;
use super::roots::build_root_store;
use crate::tls::certificate::parsing::{matches_host, parse_names};
use crate::tls::configuration::TlsClientConfiguration;
use crate::tls::errors::TlsError;
use crate::tls::policy::SslPolicyErrors;

/// rustls verifier that reports baseline findings to the validation policy
#[derive(Debug)]
pub(crate) struct PolicyServerVerifier {
    configuration: Arc<TlsClientConfiguration>,
    /// None when no trust anchors are available; every chain is untrusted
    baseline: Option<Arc<WebPkiServerVerifier>>,
    provider: Arc<CryptoProvider>,
}

impl PolicyServerVerifier {
    pub(crate) fn new(
        configuration: Arc<TlsClientConfiguration>,
        options: &EngineOptions,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, TlsError> {
        let roots = build_root_store(options);

        let baseline = if roots.is_empty() {
            tracing::debug!("No trust anchors configured, every server chain will be untrusted");
            None
        } else {
            let mut builder =
                WebPkiServerVerifier::builder_with_provider(Arc::new(roots), Arc::clone(&provider));

            if configuration.check_certificate_revocation() {
                if options.revocation_lists.is_empty() {
                    tracing::warn!(
                        "Revocation checking requested for {} but no revocation lists are configured",
                        configuration.target_host()
                    );
                } else {
                    builder = builder.with_crls(options.revocation_lists.iter().cloned());
                }
            }

            Some(
                builder
                    .build()
                    .map_err(|e| TlsError::Verifier(format!("Failed to create webpki verifier: {e}")))?,
            )
        };

        Ok(Self {
            configuration,
            baseline,
            provider,
        })
    }

    /// Run the baseline checks and translate their outcome into policy errors
    pub(crate) fn policy_errors(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> SslPolicyErrors {
        if end_entity.as_ref().is_empty() {
            return SslPolicyErrors::REMOTE_CERTIFICATE_NOT_AVAILABLE;
        }

        let Some(baseline) = &self.baseline else {
            return SslPolicyErrors::REMOTE_CERTIFICATE_CHAIN_ERRORS
                | name_errors(end_entity, server_name);
        };

        match baseline.verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now) {
            Ok(_) => SslPolicyErrors::NONE,
            // webpki checks the name only after the chain verified
            Err(rustls::Error::InvalidCertificate(
                CertificateError::NotValidForName | CertificateError::NotValidForNameContext { .. },
            )) => SslPolicyErrors::REMOTE_CERTIFICATE_NAME_MISMATCH,
            Err(e) => {
                tracing::debug!("Baseline chain validation failed for {:?}: {}", server_name, e);
                SslPolicyErrors::REMOTE_CERTIFICATE_CHAIN_ERRORS | name_errors(end_entity, server_name)
            }
        }
    }
}

/// Hostname check independent of chain validation
fn name_errors(end_entity: &CertificateDer<'_>, server_name: &ServerName<'_>) -> SslPolicyErrors {
    let host = match server_name {
        ServerName::DnsName(dns) => dns.as_ref().to_string(),
        ServerName::IpAddress(ip) => std::net::IpAddr::from(*ip).to_string(),
        _ => return SslPolicyErrors::REMOTE_CERTIFICATE_NAME_MISMATCH,
    };

    match parse_names(end_entity.as_ref()) {
        Ok(names) if matches_host(&names, &host) => SslPolicyErrors::NONE,
        Ok(_) => SslPolicyErrors::REMOTE_CERTIFICATE_NAME_MISMATCH,
        Err(e) => {
            tracing::debug!("Cannot check server certificate names: {}", e);
            SslPolicyErrors::REMOTE_CERTIFICATE_NAME_MISMATCH
        }
    }
}

impl ServerCertVerifier for PolicyServerVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let policy_errors =
            self.policy_errors(end_entity, intermediates, server_name, ocsp_response, now);

        if !self
            .configuration
            .validate_certificate(end_entity, intermediates, policy_errors)
        {
            tracing::warn!(
                "Server certificate for {:?} rejected by validation policy (policy errors: {})",
                server_name,
                policy_errors
            );
            return Err(rustls::Error::InvalidCertificate(
                CertificateError::ApplicationVerificationFailure,
            ));
        }

        if !policy_errors.is_empty() && self.configuration.certificate_validation_policy().is_default() {
            tracing::warn!(
                "Trusting server certificate for {:?} despite {}: the default validation policy accepts every server",
                server_name,
                policy_errors
            );
        } else {
            tracing::debug!("Server certificate for {:?} accepted", server_name);
        }

        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
