//! File-based TLS client settings
//!
//! JSON settings describing one secure WebSocket endpoint. Relative paths
//! are resolved against the directory of the settings file.
//!
//! ```json
//! {
//!   "target_host": "ws.example.com",
//!   "client_certificates": [{ "certificate": "client.pem", "private_key": "client.key" }],
//!   "enabled_protocols": ["tls12", "tls13"],
//!   "check_certificate_revocation": true,
//!   "engine": { "root_source": "webpki", "revocation_lists": ["ca.crl"] }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::{CertificateDer, CertificateRevocationListDer};
use serde::Deserialize;

use crate::tls::{
    ClientCertificate, EngineOptions, ProtocolName, RootSource, SslProtocols,
    TlsClientConfiguration, TlsError,
};

/// Paths of one client certificate and its private key
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateFiles {
    pub certificate: PathBuf,
    /// Defaults to the certificate file (combined PEM)
    #[serde(default)]
    pub private_key: Option<PathBuf>,
}

/// Engine section of the settings file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub root_source: RootSource,
    pub extra_roots: Vec<PathBuf>,
    pub revocation_lists: Vec<PathBuf>,
    pub alpn_protocols: Vec<String>,
    pub enable_sni: bool,
    /// Zero selects the engine default
    pub handshake_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let options = EngineOptions::default();
        Self {
            root_source: options.root_source,
            extra_roots: Vec::new(),
            revocation_lists: Vec::new(),
            alpn_protocols: options
                .alpn_protocols
                .iter()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .collect(),
            enable_sni: options.enable_sni,
            handshake_timeout_secs: options.handshake_timeout.as_secs(),
        }
    }
}

/// Settings for one TLS client endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TlsClientSettings {
    pub target_host: String,
    #[serde(default)]
    pub client_certificates: Vec<CertificateFiles>,
    /// Empty selects the engine default
    #[serde(default)]
    pub enabled_protocols: Vec<ProtocolName>,
    #[serde(default)]
    pub check_certificate_revocation: bool,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl TlsClientSettings {
    pub fn from_json_str(json: &str) -> Result<Self, TlsError> {
        serde_json::from_str(json)
            .map_err(|e| TlsError::Settings(format!("Invalid TLS settings: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self, TlsError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            TlsError::FileOperation(format!(
                "Failed to read settings file {}: {e}",
                path.display()
            ))
        })?;
        let mut settings = Self::from_json_str(&json)?;
        settings.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!("Loaded TLS settings for {} from {}", settings.target_host, path.display());
        Ok(settings)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn enabled_protocols(&self) -> SslProtocols {
        self.enabled_protocols.iter().copied().collect()
    }

    /// Load the certificates and build the connection configuration.
    ///
    /// Policies are left at their defaults; install them on the result.
    pub fn build(&self) -> Result<TlsClientConfiguration, TlsError> {
        let client_certificates = if self.client_certificates.is_empty() {
            None
        } else {
            let certificates = self
                .client_certificates
                .iter()
                .map(|files| {
                    let cert_path = self.resolve(&files.certificate);
                    let key_path = files
                        .private_key
                        .as_deref()
                        .map_or_else(|| cert_path.clone(), |p| self.resolve(p));
                    ClientCertificate::from_pem_files(&cert_path, &key_path)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(Arc::<[ClientCertificate]>::from(certificates))
        };

        Ok(TlsClientConfiguration::with_options(
            self.target_host.clone(),
            client_certificates,
            self.enabled_protocols(),
            self.check_certificate_revocation,
        ))
    }

    /// Load the trust anchors and revocation lists and build engine options
    pub fn engine_options(&self) -> Result<EngineOptions, TlsError> {
        let mut extra_roots = Vec::new();
        for path in &self.engine.extra_roots {
            extra_roots.extend(read_pem_certificates(&self.resolve(path))?);
        }

        let mut revocation_lists = Vec::new();
        for path in &self.engine.revocation_lists {
            revocation_lists.extend(read_pem_crls(&self.resolve(path))?);
        }

        let defaults = EngineOptions::default();
        let handshake_timeout = if self.engine.handshake_timeout_secs == 0 {
            tracing::debug!(
                "handshake_timeout_secs is 0, using the default of {:?}",
                defaults.handshake_timeout
            );
            defaults.handshake_timeout
        } else {
            Duration::from_secs(self.engine.handshake_timeout_secs)
        };

        Ok(EngineOptions {
            root_source: self.engine.root_source,
            extra_roots,
            revocation_lists,
            alpn_protocols: self
                .engine
                .alpn_protocols
                .iter()
                .map(|p| p.as_bytes().to_vec())
                .collect(),
            enable_sni: self.engine.enable_sni,
            handshake_timeout,
        })
    }
}

fn read_pem_file(path: &Path) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path)
        .map_err(|e| TlsError::FileOperation(format!("Failed to read {}: {e}", path.display())))
}

fn read_pem_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let pem = read_pem_file(path)?;
    rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            TlsError::CertificateParsing(format!("Invalid certificate PEM in {}: {e}", path.display()))
        })
}

fn read_pem_crls(path: &Path) -> Result<Vec<CertificateRevocationListDer<'static>>, TlsError> {
    let pem = read_pem_file(path)?;
    rustls_pemfile::crls(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            TlsError::CertificateParsing(format!("Invalid CRL PEM in {}: {e}", path.display()))
        })
}
