//! TLS handshake over a byte stream

use std::sync::Arc;

use rustls::CertificateError;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use super::client_config::build_client_config;
use super::options::EngineOptions;
use crate::tls::configuration::TlsClientConfiguration;
use crate::tls::errors::TlsError;

/// Run the client handshake on an established stream.
///
/// The WebSocket upgrade request is written to the returned stream by the
/// caller.
pub async fn connect<S>(
    configuration: &TlsClientConfiguration,
    options: &EngineOptions,
    stream: S,
) -> Result<TlsStream<S>, TlsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let host = configuration.target_host();
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| TlsError::InvalidTargetHost(format!("{host}: {e}")))?;

    let client_config = build_client_config(configuration, options)?;
    let connector = TlsConnector::from(Arc::new(client_config));

    tracing::debug!("Starting TLS handshake with {}", host);
    let tls_stream = tokio::time::timeout(
        options.handshake_timeout,
        connector.connect(server_name, stream),
    )
    .await
    .map_err(|_| TlsError::Timeout(options.handshake_timeout))?
    .map_err(classify_handshake_error)?;

    let (_, session) = tls_stream.get_ref();
    tracing::info!(
        "TLS connection established to {} ({:?}, alpn: {:?})",
        host,
        session.protocol_version(),
        session
            .alpn_protocol()
            .map(|proto| String::from_utf8_lossy(proto).into_owned()),
    );
    Ok(tls_stream)
}

/// Open a TCP connection to the target host and run the handshake on it
pub async fn connect_tcp(
    configuration: &TlsClientConfiguration,
    options: &EngineOptions,
    port: u16,
) -> Result<TlsStream<TcpStream>, TlsError> {
    let host = configuration.target_host();
    tracing::debug!("Opening TCP connection to {}:{}", host, port);

    let tcp_stream = tokio::time::timeout(
        options.handshake_timeout,
        TcpStream::connect((host, port)),
    )
    .await
    .map_err(|_| TlsError::Timeout(options.handshake_timeout))??;

    connect(configuration, options, tcp_stream).await
}

fn classify_handshake_error(error: std::io::Error) -> TlsError {
    let rejected = error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        .is_some_and(|e| {
            matches!(
                e,
                rustls::Error::InvalidCertificate(CertificateError::ApplicationVerificationFailure)
            )
        });

    if rejected {
        TlsError::CertificateRejected
    } else {
        TlsError::Handshake(error.to_string())
    }
}
