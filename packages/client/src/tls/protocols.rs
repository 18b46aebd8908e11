//! Protocol version flags
//!
//! `SslProtocols` is a set of SSL/TLS versions the client is willing to
//! negotiate. The empty set means "let the engine pick its default".

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::Deserialize;

/// Set of enabled SSL/TLS protocol versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SslProtocols(u8);

impl SslProtocols {
    /// No explicit versions; the engine's platform default applies
    pub const NONE: Self = Self(0);
    pub const SSL2: Self = Self(1 << 0);
    pub const SSL3: Self = Self(1 << 1);
    /// TLS 1.0
    pub const TLS: Self = Self(1 << 2);
    pub const TLS11: Self = Self(1 << 3);
    pub const TLS12: Self = Self(1 << 4);
    pub const TLS13: Self = Self(1 << 5);

    const KNOWN: u8 = Self::SSL2.0
        | Self::SSL3.0
        | Self::TLS.0
        | Self::TLS11.0
        | Self::TLS12.0
        | Self::TLS13.0;

    const NAMED: [(Self, &'static str); 6] = [
        (Self::SSL2, "SSL2"),
        (Self::SSL3, "SSL3"),
        (Self::TLS, "TLS1.0"),
        (Self::TLS11, "TLS1.1"),
        (Self::TLS12, "TLS1.2"),
        (Self::TLS13, "TLS1.3"),
    ];

    /// Raw flag bits
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits; unknown bits are kept as-is
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// True when every flag in `other` is set in `self`
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when no explicit version was requested
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Human readable names of the set flags, lowest version first
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }

    /// Flags that rustls cannot negotiate (anything older than TLS 1.2)
    #[must_use]
    pub const fn legacy(self) -> Self {
        Self(self.0 & (Self::SSL2.0 | Self::SSL3.0 | Self::TLS.0 | Self::TLS11.0))
    }
}

impl BitOr for SslProtocols {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for SslProtocols {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SslProtocols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("None");
        }
        let mut parts: Vec<String> = self.names().map(str::to_string).collect();
        let unknown = self.0 & !Self::KNOWN;
        if unknown != 0 {
            parts.push(format!("{unknown:#04x}"));
        }
        f.write_str(&parts.join(" | "))
    }
}

/// Protocol name as written in settings files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolName {
    Ssl2,
    Ssl3,
    #[serde(alias = "tls10")]
    Tls,
    Tls11,
    Tls12,
    Tls13,
}

impl From<ProtocolName> for SslProtocols {
    fn from(name: ProtocolName) -> Self {
        match name {
            ProtocolName::Ssl2 => Self::SSL2,
            ProtocolName::Ssl3 => Self::SSL3,
            ProtocolName::Tls => Self::TLS,
            ProtocolName::Tls11 => Self::TLS11,
            ProtocolName::Tls12 => Self::TLS12,
            ProtocolName::Tls13 => Self::TLS13,
        }
    }
}

impl FromIterator<ProtocolName> for SslProtocols {
    fn from_iter<I: IntoIterator<Item = ProtocolName>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::NONE, |acc, name| acc | Self::from(name))
    }
}
