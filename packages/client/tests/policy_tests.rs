//! Default and ready-made certificate policies

mod common;

use std::sync::Arc;

use common::Authority;
use rustls::pki_types::CertificateDer;
use wsclient_tls::policy::{
    default_select, default_validate, reject_on_policy_errors, select_by_acceptable_issuer,
    select_first,
};
use wsclient_tls::{
    ClientCertificate, INSECURE_DEFAULT_ACCEPT_ALL, SelectionContext, SslPolicyErrors,
    TlsClientConfiguration, ValidationContext,
};

const ALL_ERROR_COMBINATIONS: [SslPolicyErrors; 4] = [
    SslPolicyErrors::NONE,
    SslPolicyErrors::REMOTE_CERTIFICATE_NOT_AVAILABLE,
    SslPolicyErrors::REMOTE_CERTIFICATE_NAME_MISMATCH,
    SslPolicyErrors::REMOTE_CERTIFICATE_CHAIN_ERRORS,
];

fn configured_with_two_certificates() -> (TlsClientConfiguration, ClientCertificate, ClientCertificate) {
    let first_ca = Authority::new("First CA");
    let second_ca = Authority::new("Second CA");
    let first = first_ca.issue("first", &["first.example"]).client_certificate();
    let second = second_ca.issue("second", &["second.example"]).client_certificate();

    let certificates: Arc<[ClientCertificate]> = vec![first.clone(), second.clone()].into();
    let mut config = TlsClientConfiguration::new("ws.example.com");
    config.set_client_certificates(Some(certificates));
    (config, first, second)
}

#[test]
fn test_default_selection_never_presents() {
    let (config, first, _) = configured_with_two_certificates();
    let issuer = first.issuer_der().expect("issuer parsed").to_vec();
    let server = CertificateDer::from(vec![0x30, 0x00]);

    for remote in [None, Some(&server)] {
        for issuers in [&[][..], &[issuer.as_slice()][..]] {
            let context = SelectionContext {
                sender: &config,
                target_host: config.target_host(),
                local_certificates: config.client_certificate_slice(),
                remote_certificate: remote,
                acceptable_issuers: issuers,
            };
            assert!(default_select(&context).is_none());
            assert!(config.certificate_selection_policy().select(&context).is_none());
        }
    }
}

#[test]
fn test_default_validation_always_accepts() {
    assert!(INSECURE_DEFAULT_ACCEPT_ALL);

    let config = TlsClientConfiguration::new("ws.example.com");
    let server = CertificateDer::from(vec![0x30, 0x00]);
    let all = ALL_ERROR_COMBINATIONS
        .iter()
        .fold(SslPolicyErrors::NONE, |acc, e| acc | *e);

    for errors in ALL_ERROR_COMBINATIONS.into_iter().chain([all]) {
        let context = ValidationContext {
            sender: &config,
            certificate: &server,
            chain: &[],
            policy_errors: errors,
        };
        assert!(default_validate(&context));
        assert!(config.certificate_validation_policy().validate(&context));
    }
}

#[test]
fn test_unset_policy_reads_are_idempotent() {
    let config = TlsClientConfiguration::new("ws.example.com");
    let server = CertificateDer::from(vec![0x30, 0x00]);
    let context = ValidationContext {
        sender: &config,
        certificate: &server,
        chain: &[],
        policy_errors: SslPolicyErrors::REMOTE_CERTIFICATE_CHAIN_ERRORS,
    };

    let first = config.certificate_validation_policy().validate(&context);
    let second = config.certificate_validation_policy().validate(&context);
    assert_eq!(first, second);
    assert!(config.certificate_validation_policy().is_default());
}

#[test]
fn test_overridden_selection_behaves_like_override() {
    let (mut config, _, second) = configured_with_two_certificates();
    config.set_certificate_selection_policy(|ctx: &SelectionContext<'_>| {
        ctx.local_certificates.last().cloned()
    });

    let context = SelectionContext {
        sender: &config,
        target_host: config.target_host(),
        local_certificates: config.client_certificate_slice(),
        remote_certificate: None,
        acceptable_issuers: &[],
    };
    assert_eq!(
        config.certificate_selection_policy().select(&context),
        Some(second)
    );
}

#[test]
fn test_select_first() {
    let (config, first, _) = configured_with_two_certificates();
    let context = SelectionContext {
        sender: &config,
        target_host: config.target_host(),
        local_certificates: config.client_certificate_slice(),
        remote_certificate: None,
        acceptable_issuers: &[],
    };
    assert_eq!(select_first(&context), Some(first));
}

#[test]
fn test_select_by_acceptable_issuer() {
    let (config, first, second) = configured_with_two_certificates();
    let second_issuer = second.issuer_der().expect("issuer parsed").to_vec();
    let unknown_issuer = vec![0x30, 0x00];

    let mut context = SelectionContext {
        sender: &config,
        target_host: config.target_host(),
        local_certificates: config.client_certificate_slice(),
        remote_certificate: None,
        acceptable_issuers: &[],
    };
    // no hints: anything goes
    assert_eq!(select_by_acceptable_issuer(&context), Some(first));

    let hints = [second_issuer.as_slice()];
    context.acceptable_issuers = &hints;
    assert_eq!(select_by_acceptable_issuer(&context), Some(second));

    let hints = [unknown_issuer.as_slice()];
    context.acceptable_issuers = &hints;
    assert_eq!(select_by_acceptable_issuer(&context), None);
}

#[test]
fn test_reject_on_policy_errors() {
    let config = TlsClientConfiguration::new("ws.example.com");
    let server = CertificateDer::from(vec![0x30, 0x00]);

    for errors in ALL_ERROR_COMBINATIONS {
        let context = ValidationContext {
            sender: &config,
            certificate: &server,
            chain: &[],
            policy_errors: errors,
        };
        assert_eq!(reject_on_policy_errors(&context), errors.is_empty());
    }
}

#[test]
fn test_client_certificate_names() {
    let ca = Authority::new("Naming CA");
    let leaf = ca.issue("leaf.example", &["leaf.example"]).client_certificate();

    assert!(leaf.subject().is_some_and(|s| s.contains("leaf.example")));
    assert!(leaf.issuer().is_some_and(|s| s.contains("Naming CA")));
    assert_eq!(leaf.common_name(), Some("leaf.example"));
    assert_eq!(leaf.chain().len(), 1);
    assert_eq!(leaf.end_entity(), &leaf.chain()[0]);
}

#[test]
fn test_client_certificate_from_pem() {
    let ca = Authority::new("PEM CA");
    let fixture = ca.issue("pem", &["pem.example"]);

    let loaded = ClientCertificate::from_pem(fixture.cert_pem.as_bytes(), fixture.key_pem.as_bytes())
        .expect("PEM certificate and key should load");
    assert_eq!(loaded.end_entity(), &fixture.cert);

    let missing_key = ClientCertificate::from_pem(fixture.cert_pem.as_bytes(), b"");
    assert!(matches!(missing_key, Err(wsclient_tls::TlsError::KeyParsing(_))));

    let empty_chain = ClientCertificate::from_pem(b"", fixture.key_pem.as_bytes());
    assert!(matches!(
        empty_chain,
        Err(wsclient_tls::TlsError::CertificateParsing(_))
    ));
}
