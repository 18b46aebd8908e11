//! Certificate name extraction and hostname matching

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use x509_parser::prelude::*;

use crate::tls::errors::TlsError;

/// Names carried by an X.509 certificate
#[derive(Debug, Clone)]
pub(crate) struct CertificateNames {
    pub subject: String,
    pub issuer: String,
    /// DER encoded issuer distinguished name, outer SEQUENCE included
    pub issuer_der: Vec<u8>,
    pub common_name: Option<String>,
    pub san_dns_names: Vec<String>,
    pub san_ip_addresses: Vec<IpAddr>,
}

/// Parse the subject, issuer and Subject Alternative Names of a DER certificate
pub(crate) fn parse_names(der: &[u8]) -> Result<CertificateNames, TlsError> {
    let (_, cert) = parse_x509_certificate(der)
        .map_err(|e| TlsError::CertificateParsing(format!("Failed to parse DER certificate: {e}")))?;

    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);

    let mut san_dns_names = Vec::new();
    let mut san_ip_addresses = Vec::new();
    match cert.subject_alternative_name() {
        Ok(Some(san)) => {
            for name in &san.value.general_names {
                match name {
                    GeneralName::DNSName(dns) => san_dns_names.push((*dns).to_string()),
                    GeneralName::IPAddress(bytes) => {
                        if let Some(ip) = ip_from_bytes(bytes) {
                            san_ip_addresses.push(ip);
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("Ignoring malformed SubjectAltName extension: {}", e);
        }
    }

    Ok(CertificateNames {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        issuer_der: cert.issuer().as_raw().to_vec(),
        common_name,
        san_dns_names,
        san_ip_addresses,
    })
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

/// Check a host name or IP literal against the certificate SANs.
///
/// The subject Common Name is never consulted, same as the webpki name
/// check, so a name verdict does not depend on whether the chain verified.
pub(crate) fn matches_host(names: &CertificateNames, host: &str) -> bool {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return names.san_ip_addresses.contains(&ip);
    }

    names
        .san_dns_names
        .iter()
        .any(|pattern| match_hostname(host, pattern))
}

/// Match hostname against a DNS name pattern (single leading wildcard label)
fn match_hostname(hostname: &str, pattern: &str) -> bool {
    let hostname = hostname.trim_end_matches('.').to_ascii_lowercase();
    let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();

    if hostname == pattern {
        return true;
    }

    if let Some(suffix) = pattern.strip_prefix("*.") {
        if let Some(prefix) = hostname.strip_suffix(suffix) {
            // prefix is "label." for a single-level match
            if let Some(label) = prefix.strip_suffix('.') {
                return !label.is_empty() && !label.contains('.');
            }
        }
    }

    false
}

/// Compare an issuer name against a hint sent by the server.
///
/// Servers send distinguished names either as full DER (with the outer
/// SEQUENCE) or as the bare RDN sequence contents; both forms match.
pub(crate) fn issuer_matches(issuer_der: &[u8], hint: &[u8]) -> bool {
    if issuer_der == hint {
        return true;
    }
    strip_sequence_header(issuer_der).is_some_and(|inner| inner == hint)
}

fn strip_sequence_header(der: &[u8]) -> Option<&[u8]> {
    let (&tag, rest) = der.split_first()?;
    if tag != 0x30 {
        return None;
    }
    let (&first, rest) = rest.split_first()?;
    if first & 0x80 == 0 {
        return (rest.len() == usize::from(first)).then_some(rest);
    }
    let count = usize::from(first & 0x7f);
    if count == 0 || count > 4 || rest.len() < count {
        return None;
    }
    let (len_bytes, body) = rest.split_at(count);
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | usize::from(*b));
    (body.len() == len).then_some(body)
}
