//! Baseline certificate check results handed to the validation policy

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Problems the engine's baseline checks found with the server certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SslPolicyErrors(u8);

impl SslPolicyErrors {
    pub const NONE: Self = Self(0);
    /// The server did not present a certificate
    pub const REMOTE_CERTIFICATE_NOT_AVAILABLE: Self = Self(1 << 0);
    /// The certificate does not match the target host
    pub const REMOTE_CERTIFICATE_NAME_MISMATCH: Self = Self(1 << 1);
    /// Chain building failed: untrusted root, expiry, revocation, bad usage
    pub const REMOTE_CERTIFICATE_CHAIN_ERRORS: Self = Self(1 << 2);

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SslPolicyErrors {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SslPolicyErrors {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SslPolicyErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut names = Vec::with_capacity(3);
        if self.contains(Self::REMOTE_CERTIFICATE_NOT_AVAILABLE) {
            names.push("RemoteCertificateNotAvailable");
        }
        if self.contains(Self::REMOTE_CERTIFICATE_NAME_MISMATCH) {
            names.push("RemoteCertificateNameMismatch");
        }
        if self.contains(Self::REMOTE_CERTIFICATE_CHAIN_ERRORS) {
            names.push("RemoteCertificateChainErrors");
        }
        f.write_str(&names.join(", "))
    }
}
