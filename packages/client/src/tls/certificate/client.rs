//! Client certificates offered for TLS client authentication

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;

use super::parsing::{CertificateNames, issuer_matches, parse_names};
use crate::tls::engine::crypto_provider;
use crate::tls::errors::TlsError;

/// A certificate chain together with the private key that signs for it.
///
/// Cloning is cheap: the chain and key are shared.
#[derive(Clone)]
pub struct ClientCertificate {
    key: Arc<CertifiedKey>,
    names: Option<Arc<CertificateNames>>,
}

impl ClientCertificate {
    /// Build from a DER chain (end-entity first) and its private key
    pub fn from_der(
        chain: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
    ) -> Result<Self, TlsError> {
        let signing_key = crypto_provider()
            .key_provider
            .load_private_key(key)
            .map_err(|e| TlsError::KeyParsing(format!("Unsupported private key: {e}")))?;

        Self::from_certified_key(Arc::new(CertifiedKey::new(chain, signing_key)))
    }

    /// Wrap an existing rustls certified key
    pub fn from_certified_key(key: Arc<CertifiedKey>) -> Result<Self, TlsError> {
        let Some(end_entity) = key.cert.first() else {
            return Err(TlsError::CertificateParsing(
                "Certificate chain is empty".to_string(),
            ));
        };

        let names = parse_names(end_entity.as_ref())
            .map_err(|e| tracing::debug!("Client certificate names unavailable: {}", e))
            .ok()
            .map(Arc::new);
        Ok(Self { key, names })
    }

    /// Parse PEM encoded certificates and the first PEM private key
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self, TlsError> {
        let chain = rustls_pemfile::certs(&mut &cert_pem[..])
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TlsError::CertificateParsing(format!("Invalid certificate PEM: {e}")))?;

        let key = rustls_pemfile::private_key(&mut &key_pem[..])
            .map_err(|e| TlsError::KeyParsing(format!("Invalid private key PEM: {e}")))?
            .ok_or_else(|| TlsError::KeyParsing("No private key found in PEM data".to_string()))?;

        Self::from_der(chain, key)
    }

    /// Load a certificate chain and private key from PEM files.
    ///
    /// Both may live in the same file.
    pub fn from_pem_files(cert_path: &Path, key_path: &Path) -> Result<Self, TlsError> {
        let cert_pem = std::fs::read(cert_path).map_err(|e| {
            TlsError::FileOperation(format!(
                "Failed to read certificate file {}: {e}",
                cert_path.display()
            ))
        })?;
        let key_pem = std::fs::read(key_path).map_err(|e| {
            TlsError::FileOperation(format!(
                "Failed to read key file {}: {e}",
                key_path.display()
            ))
        })?;

        let certificate = Self::from_pem(&cert_pem, &key_pem)?;
        tracing::debug!(
            "Loaded client certificate {} from {}",
            certificate.subject().unwrap_or("<unparsed>"),
            cert_path.display()
        );
        Ok(certificate)
    }

    /// End-entity certificate
    pub fn end_entity(&self) -> &CertificateDer<'static> {
        // constructors reject empty chains
        &self.key.cert[0]
    }

    /// Full chain, end-entity first
    pub fn chain(&self) -> &[CertificateDer<'static>] {
        &self.key.cert
    }

    pub fn certified_key(&self) -> Arc<CertifiedKey> {
        Arc::clone(&self.key)
    }

    /// Subject distinguished name, when the certificate could be parsed
    pub fn subject(&self) -> Option<&str> {
        self.names.as_deref().map(|n| n.subject.as_str())
    }

    /// First subject Common Name
    pub fn common_name(&self) -> Option<&str> {
        self.names.as_deref().and_then(|n| n.common_name.as_deref())
    }

    /// Issuer distinguished name, when the certificate could be parsed
    pub fn issuer(&self) -> Option<&str> {
        self.names.as_deref().map(|n| n.issuer.as_str())
    }

    /// DER encoded issuer name
    pub fn issuer_der(&self) -> Option<&[u8]> {
        self.names.as_deref().map(|n| n.issuer_der.as_slice())
    }

    /// True when this certificate was issued by one of `acceptable_issuers`
    pub fn is_issued_by_any(&self, acceptable_issuers: &[&[u8]]) -> bool {
        self.issuer_der().is_some_and(|issuer| {
            acceptable_issuers
                .iter()
                .any(|hint| issuer_matches(issuer, hint))
        })
    }
}

impl PartialEq for ClientCertificate {
    fn eq(&self, other: &Self) -> bool {
        self.end_entity() == other.end_entity()
    }
}

impl Eq for ClientCertificate {}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("subject", &self.subject())
            .field("issuer", &self.issuer())
            .field("chain_len", &self.key.cert.len())
            .finish_non_exhaustive()
    }
}
