//! Certificate fixtures and a local TLS server for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationListParams, DistinguishedName,
    DnType, IsCa, Issuer, KeyIdMethod, KeyPair, KeyUsagePurpose, RevocationReason,
    RevokedCertParams, SerialNumber, date_time_ymd,
};
use rustls::pki_types::{
    CertificateDer, CertificateRevocationListDer, PrivateKeyDer, PrivatePkcs8KeyDer,
};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig, SupportedProtocolVersion};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use wsclient_tls::ClientCertificate;

/// A generated certificate with its key in DER and PEM form
pub struct Fixture {
    pub cert: CertificateDer<'static>,
    pub cert_pem: String,
    pub key_der: Vec<u8>,
    pub key_pem: String,
}

impl Fixture {
    pub fn key(&self) -> PrivateKeyDer<'static> {
        PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(self.key_der.clone()))
    }

    pub fn client_certificate(&self) -> ClientCertificate {
        ClientCertificate::from_der(vec![self.cert.clone()], self.key())
            .unwrap_or_else(|e| panic!("fixture should load as client certificate: {e}"))
    }
}

/// A certificate authority able to issue leaf certificates
pub struct Authority {
    pub fixture: Fixture,
    issuer: Issuer<'static, KeyPair>,
}

impl Authority {
    pub fn new(name: &str) -> Self {
        let mut params = CertificateParams::new(Vec::default())
            .unwrap_or_else(|e| panic!("CA params: {e}"));
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, "wsclient_tls tests");
        dn.push(DnType::CommonName, name);
        params.distinguished_name = dn;

        let key_pair = KeyPair::generate().unwrap_or_else(|e| panic!("CA key: {e}"));
        let cert = params
            .self_signed(&key_pair)
            .unwrap_or_else(|e| panic!("CA certificate: {e}"));

        let fixture = Fixture {
            cert: cert.der().clone(),
            cert_pem: cert.pem(),
            key_der: key_pair.serialize_der(),
            key_pem: key_pair.serialize_pem(),
        };
        let issuer = Issuer::new(params, key_pair);
        Self { fixture, issuer }
    }

    /// Issue a leaf certificate for `names`; an empty list leaves the
    /// SubjectAltName extension out
    pub fn issue(&self, common_name: &str, names: &[&str]) -> Fixture {
        self.issue_with_serial(common_name, names, None)
    }

    pub fn issue_with_serial(
        &self,
        common_name: &str,
        names: &[&str],
        serial: Option<u64>,
    ) -> Fixture {
        let mut params = CertificateParams::new(names.iter().map(|n| (*n).to_string()).collect::<Vec<_>>())
            .unwrap_or_else(|e| panic!("leaf params: {e}"));
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, common_name);
        params.distinguished_name = dn;
        params.serial_number = serial.map(serial_number);

        let key_pair = KeyPair::generate().unwrap_or_else(|e| panic!("leaf key: {e}"));
        let cert = params
            .signed_by(&key_pair, &self.issuer)
            .unwrap_or_else(|e| panic!("leaf certificate: {e}"));

        Fixture {
            cert: cert.der().clone(),
            cert_pem: cert.pem(),
            key_der: key_pair.serialize_der(),
            key_pem: key_pair.serialize_pem(),
        }
    }
}

/// Minimal positive DER integer bytes, so the certificate and the CRL
/// carry byte-identical serials
fn serial_number(serial: u64) -> SerialNumber {
    let bytes = serial.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    let mut minimal = bytes[start..].to_vec();
    if minimal[0] & 0x80 != 0 {
        minimal.insert(0, 0);
    }
    SerialNumber::from_slice(&minimal)
}

/// A revocation list signed by an [`Authority`]
pub struct RevocationList {
    pub der: CertificateRevocationListDer<'static>,
    pub pem: String,
}

impl Authority {
    /// Revoke the certificates with the given serial numbers
    pub fn revoke(&self, serials: &[u64]) -> RevocationList {
        let params = CertificateRevocationListParams {
            this_update: date_time_ymd(2024, 1, 1),
            next_update: date_time_ymd(2099, 1, 1),
            crl_number: SerialNumber::from_slice(&[1]),
            issuing_distribution_point: None,
            revoked_certs: serials
                .iter()
                .map(|serial| RevokedCertParams {
                    serial_number: serial_number(*serial),
                    revocation_time: date_time_ymd(2024, 1, 1),
                    reason_code: Some(RevocationReason::KeyCompromise),
                    invalidity_date: None,
                })
                .collect(),
            key_identifier_method: KeyIdMethod::Sha256,
        };
        let crl = params
            .signed_by(&self.issuer)
            .unwrap_or_else(|e| panic!("CRL: {e}"));

        RevocationList {
            der: crl.der().clone(),
            pem: crl.pem().unwrap_or_else(|e| panic!("CRL PEM: {e}")),
        }
    }
}

/// Outcome of the server side of one connection
#[derive(Debug)]
pub struct ServerOutcome {
    pub client_presented_certificate: bool,
    pub protocol: Option<rustls::ProtocolVersion>,
}

/// Serve one TLS connection on localhost: read `ping`, answer `pong`.
///
/// With `client_ca`, client authentication is mandatory.
pub async fn spawn_server(
    server: &Fixture,
    client_ca: Option<&Fixture>,
    versions: &[&'static SupportedProtocolVersion],
) -> (SocketAddr, JoinHandle<Result<ServerOutcome, String>>) {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ServerConfig::builder_with_provider(Arc::clone(&provider))
        .with_protocol_versions(versions)
        .unwrap_or_else(|e| panic!("server versions: {e}"));

    let server_config = match client_ca {
        Some(ca) => {
            let mut roots = RootCertStore::empty();
            roots
                .add(ca.cert.clone())
                .unwrap_or_else(|e| panic!("client CA: {e}"));
            let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider)
                .build()
                .unwrap_or_else(|e| panic!("client verifier: {e}"));
            builder
                .with_client_cert_verifier(verifier)
                .with_single_cert(vec![server.cert.clone()], server.key())
        }
        None => builder
            .with_no_client_auth()
            .with_single_cert(vec![server.cert.clone()], server.key()),
    }
    .unwrap_or_else(|e| panic!("server config: {e}"));

    let acceptor = TlsAcceptor::from(Arc::new(server_config));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("local addr: {e}"));

    let handle = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.map_err(|e| e.to_string())?;
        let mut tls = acceptor.accept(tcp).await.map_err(|e| e.to_string())?;

        let mut buf = [0u8; 4];
        tls.read_exact(&mut buf).await.map_err(|e| e.to_string())?;
        if &buf != b"ping" {
            return Err(format!("unexpected payload {buf:?}"));
        }
        tls.write_all(b"pong").await.map_err(|e| e.to_string())?;
        tls.flush().await.map_err(|e| e.to_string())?;

        let (_, session) = tls.get_ref();
        Ok(ServerOutcome {
            client_presented_certificate: session.peer_certificates().is_some(),
            protocol: session.protocol_version(),
        })
    });

    (addr, handle)
}
