//! Trust anchor loading for the baseline verifier

use rustls::RootCertStore;

use super::options::{EngineOptions, RootSource};

/// Build the root store described by `options`
pub(crate) fn build_root_store(options: &EngineOptions) -> RootCertStore {
    let mut root_store = RootCertStore::empty();

    match options.root_source {
        RootSource::Native => {
            let cert_result = rustls_native_certs::load_native_certs();
            let (added, ignored) = root_store.add_parsable_certificates(cert_result.certs);
            if ignored > 0 {
                tracing::warn!("Ignored {} unparsable system certificates", ignored);
            }

            if !cert_result.errors.is_empty() {
                for err in &cert_result.errors {
                    tracing::warn!("Certificate load error: {}", err);
                }
                // Fall back to webpki roots if the platform store is incomplete
                root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            }

            tracing::debug!("Loaded {} system certificates", added);
        }
        RootSource::WebPki => {
            root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        }
        RootSource::Empty => {}
    }

    for cert in &options.extra_roots {
        if let Err(e) = root_store.add(cert.clone()) {
            tracing::warn!("Failed to add custom root certificate: {}", e);
        }
    }

    tracing::debug!("Root store holds {} trust anchors", root_store.len());
    root_store
}
