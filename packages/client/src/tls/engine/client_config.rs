//! rustls client configuration built from a [`TlsClientConfiguration`]

use std::sync::Arc;

use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, ConfigBuilder, SupportedProtocolVersion, WantsVerifier};

use super::crypto_provider;
use super::options::EngineOptions;
use super::resolver::PolicyCertResolver;
use super::verifier::PolicyServerVerifier;
use crate::tls::configuration::TlsClientConfiguration;
use crate::tls::errors::TlsError;
use crate::tls::protocols::SslProtocols;

/// Build the rustls configuration for one handshake.
///
/// The configuration is snapshotted; later mutations of `configuration`
/// do not affect the returned `ClientConfig`.
pub fn build_client_config(
    configuration: &TlsClientConfiguration,
    options: &EngineOptions,
) -> Result<ClientConfig, TlsError> {
    let provider = crypto_provider();
    let versions = protocol_versions(configuration.enabled_protocols())?;

    let snapshot = Arc::new(configuration.clone());
    let verifier = Arc::new(PolicyServerVerifier::new(
        Arc::clone(&snapshot),
        options,
        Arc::clone(&provider),
    )?);
    let resolver = Arc::new(PolicyCertResolver::new(snapshot));

    let mut client_config = versioned_builder(provider, configuration.enabled_protocols(), &versions)?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_client_cert_resolver(resolver);

    client_config.alpn_protocols = options.alpn_protocols.clone();
    client_config.enable_sni = options.enable_sni;

    tracing::debug!(
        "Built TLS client configuration for {} (protocols: {})",
        configuration.target_host(),
        configuration.enabled_protocols()
    );
    Ok(client_config)
}

/// Start a rustls builder restricted to `versions`.
///
/// Fails when the provider has no cipher suite for any of them.
fn versioned_builder(
    provider: Arc<CryptoProvider>,
    protocols: SslProtocols,
    versions: &[&'static SupportedProtocolVersion],
) -> Result<ConfigBuilder<ClientConfig, WantsVerifier>, TlsError> {
    ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(versions)
        .map_err(|e| {
            tracing::warn!("Protocol versions {} rejected by the crypto provider: {}", protocols, e);
            TlsError::UnsupportedProtocols(protocols)
        })
}

/// Map the enabled protocol flags onto the versions rustls can negotiate
pub(crate) fn protocol_versions(
    protocols: SslProtocols,
) -> Result<Vec<&'static SupportedProtocolVersion>, TlsError> {
    if protocols.is_none() {
        return Ok(rustls::DEFAULT_VERSIONS.to_vec());
    }

    let legacy = protocols.legacy();
    if !legacy.is_none() {
        tracing::warn!("Ignoring protocol versions the engine does not support: {}", legacy);
    }

    let mut versions = Vec::with_capacity(2);
    if protocols.contains(SslProtocols::TLS13) {
        versions.push(&rustls::version::TLS13);
    }
    if protocols.contains(SslProtocols::TLS12) {
        versions.push(&rustls::version::TLS12);
    }

    if versions.is_empty() {
        return Err(TlsError::UnsupportedProtocols(protocols));
    }
    Ok(versions)
}
