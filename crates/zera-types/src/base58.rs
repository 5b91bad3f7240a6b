//! Base58 text codecs for ZERA keys and addresses.
//!
//! ZERA uses the plain Bitcoin alphabet (no checksum, no blocks). Public keys
//! carry a readable prefix in front of the encoded body, for example
//! `r_A_c_FPXd...`: the optional restricted marker, the algorithm letter and
//! the hash token, each followed by `_`. On the wire the prefix is kept as
//! ASCII and the body is replaced by its decoded bytes.

use crate::constants::{
    ED25519_LETTER, ED25519_PUBLIC_KEY_SIZE, ED448_LETTER, ED448_PUBLIC_KEY_SIZE,
    GOVERNANCE_PREFIX, KEY_SEPARATOR, RESTRICTED_PREFIX, SMART_CONTRACT_PREFIX,
};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Base58Error {
    #[error("empty {0}")]
    Empty(&'static str),

    #[error("invalid base58 in {what} {text:?}: {reason}")]
    InvalidEncoding {
        what: &'static str,
        text: String,
        reason: String,
    },

    #[error("public key {0:?} has no algorithm prefix")]
    MissingPrefix(String),

    #[error("public key {0:?} has an unknown algorithm letter")]
    UnknownAlgorithm(String),

    #[error("public key {key:?} decodes to {actual} bytes, expected {expected}")]
    InvalidKeyLength {
        key: String,
        expected: usize,
        actual: usize,
    },
}

/// Encode raw bytes as base58.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a base58 string, naming `what` in the error.
fn decode_named(text: &str, what: &'static str) -> Result<Vec<u8>, Base58Error> {
    if text.is_empty() {
        return Err(Base58Error::Empty(what));
    }
    bs58::decode(text)
        .into_vec()
        .map_err(|e| Base58Error::InvalidEncoding {
            what,
            text: text.to_string(),
            reason: e.to_string(),
        })
}

/// Decode a base58 string.
pub fn decode(text: &str) -> Result<Vec<u8>, Base58Error> {
    decode_named(text, "base58 string")
}

/// Decode a base58 private key into its raw bytes.
pub fn decode_private_key(text: &str) -> Result<Vec<u8>, Base58Error> {
    decode_named(text, "private key")
}

/// True for the reserved `gov_...` and `sc_...` address forms.
pub fn is_reserved_address(address: &str) -> bool {
    address.starts_with(GOVERNANCE_PREFIX) || address.starts_with(SMART_CONTRACT_PREFIX)
}

/// Decode a wallet address into its wire bytes.
///
/// Reserved governance and smart-contract addresses are not base58; their
/// UTF-8 bytes are used as-is.
pub fn decode_address(address: &str) -> Result<Vec<u8>, Base58Error> {
    if is_reserved_address(address) {
        return Ok(address.as_bytes().to_vec());
    }
    decode_named(address, "address")
}

/// Encode wire address bytes back to text.
pub fn encode_address(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) if is_reserved_address(s) => s.to_string(),
        _ => encode(bytes),
    }
}

// =============================================================================
// Public Key Text
// =============================================================================

/// A parsed textual public key: readable prefix plus raw key bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyText {
    prefix: String,
    raw: Vec<u8>,
}

impl KeyText {
    /// Parse `[r_]<ALG>_[<HASH>_]<base58>`.
    ///
    /// Everything up to and including the last `_` is the prefix; the rest
    /// is the base58 body.
    pub fn parse(text: &str) -> Result<Self, Base58Error> {
        if text.is_empty() {
            return Err(Base58Error::Empty("public key"));
        }
        let split = text
            .rfind(KEY_SEPARATOR)
            .ok_or_else(|| Base58Error::MissingPrefix(text.to_string()))?;
        let (prefix, body) = text.split_at(split + 1);
        let raw = decode_named(body, "public key")?;

        let key = Self {
            prefix: prefix.to_string(),
            raw,
        };
        let expected = match key.algorithm_letter()? {
            ED448_LETTER => ED448_PUBLIC_KEY_SIZE,
            _ => ED25519_PUBLIC_KEY_SIZE,
        };
        if key.raw.len() != expected {
            return Err(Base58Error::InvalidKeyLength {
                key: text.to_string(),
                expected,
                actual: key.raw.len(),
            });
        }
        Ok(key)
    }

    /// Build from an explicit prefix (including its trailing `_`) and raw key.
    pub fn new(prefix: impl Into<String>, raw: Vec<u8>) -> Self {
        Self {
            prefix: prefix.into(),
            raw,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The raw key bytes (without prefix).
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// True when the key carries the `r_` marker.
    pub fn is_restricted(&self) -> bool {
        self.prefix.starts_with(RESTRICTED_PREFIX)
    }

    /// The algorithm letter (`A` or `B`), after any `r_` marker.
    pub fn algorithm_letter(&self) -> Result<&str, Base58Error> {
        let rest = self
            .prefix
            .strip_prefix(RESTRICTED_PREFIX)
            .unwrap_or(&self.prefix);
        let letter = rest.split(KEY_SEPARATOR).next().unwrap_or_default();
        match letter {
            ED25519_LETTER | ED448_LETTER => Ok(letter),
            _ => Err(Base58Error::UnknownAlgorithm(self.to_string())),
        }
    }

    /// Wire form: prefix bytes followed by the raw key.
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + self.raw.len());
        out.extend_from_slice(self.prefix.as_bytes());
        out.extend_from_slice(&self.raw);
        out
    }
}

impl std::fmt::Display for KeyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, encode(&self.raw))
    }
}

impl std::str::FromStr for KeyText {
    type Err = Base58Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
