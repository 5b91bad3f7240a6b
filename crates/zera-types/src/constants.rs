//! ZERA network constants, key prefixes, and fixed scales.
//!
//! Everything the builders need to agree with the validator on lives here:
//! textual key/address markers, the universal fixed-point scales used by
//! percentage and rate fields, and the default service ports.

use serde::{Deserialize, Serialize};

// =============================================================================
// Key and Address Markers
// =============================================================================

/// Marker that flags a key as restricted (administrative).
pub const RESTRICTED_PREFIX: &str = "r_";

/// Prefix of governance-derived addresses and authorizations.
pub const GOVERNANCE_PREFIX: &str = "gov_";

/// Prefix of smart-contract-derived authorizations.
pub const SMART_CONTRACT_PREFIX: &str = "sc_";

/// Separator between the segments of a textual public key.
pub const KEY_SEPARATOR: char = '_';

/// Key-prefix letter for Ed25519 keys.
pub const ED25519_LETTER: &str = "A";

/// Key-prefix letter for Ed448 keys.
pub const ED448_LETTER: &str = "B";

/// Raw Ed25519 private key length (seed || public key).
pub const ED25519_PRIVATE_KEY_SIZE: usize = 64;

/// Raw Ed25519 public key length.
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// Raw Ed448 private key (seed) length.
pub const ED448_PRIVATE_KEY_SIZE: usize = 57;

/// Raw Ed448 public key length.
pub const ED448_PUBLIC_KEY_SIZE: usize = 57;

/// Content hash length (SHA3-256).
pub const HASH_SIZE: usize = 32;

// =============================================================================
// Hash Tokens
// =============================================================================

/// Hash-domain token carried in key text and multi-key groups.
///
/// The wire form is a single lowercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashToken {
    Sha3_256,
    Sha3_512,
    Blake3,
    /// Marks a multi-key group as restricted.
    Restricted,
}

impl HashToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha3_256 => "a",
            Self::Sha3_512 => "b",
            Self::Blake3 => "c",
            Self::Restricted => "r",
        }
    }

    pub fn from_str_token(s: &str) -> Option<Self> {
        match s {
            "a" => Some(Self::Sha3_256),
            "b" => Some(Self::Sha3_512),
            "c" => Some(Self::Blake3),
            "r" => Some(Self::Restricted),
            _ => None,
        }
    }
}

impl std::fmt::Display for HashToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Fixed Scales
// =============================================================================

/// Decimal exponent of the scale for per-input transfer fee percentages
/// (0-100 with 6 fractional digits).
pub const FEE_PERCENT_EXP: u32 = 6;

/// Decimal exponent of the scale for expense ratio percentages
/// (0-100 with 4 fractional digits).
pub const EXPENSE_RATIO_EXP: u32 = 4;

/// Decimal exponent of the scale for contract fee, burn and validator
/// percentages. 100% maps to 10^18.
pub const PERCENT_EXP: u32 = 16;

/// Decimal exponent of the scale for on-chain currency-equivalent rates.
pub const RATE_EXP: u32 = 18;

/// Decimal exponent of governance quorums (0-100 -> 0-10000).
pub const QUORUM_EXP: u32 = 2;

/// Decimal exponent of the governance voting threshold (0-100 -> 0-1000).
pub const THRESHOLD_EXP: u32 = 1;

/// Upper bound of every percentage input.
pub const MAX_PERCENT: u32 = 100;

// =============================================================================
// Network Defaults
// =============================================================================

/// Native coin contract id.
pub const NATIVE_CONTRACT_ID: &str = "$ZRA+0000";

/// Parts per whole ZRA.
pub const NATIVE_PARTS: u64 = 1_000_000_000;

/// Default validator port for nonce lookups.
pub const VALIDATOR_API_PORT: u16 = 50051;

/// Default validator port for transaction submission.
pub const VALIDATOR_TXN_PORT: u16 = 50052;

/// Default public indexer endpoint.
pub const DEFAULT_INDEXER_URL: &str = "https://indexer.zera.vision";

/// Minimum allowed concurrent nonce lookups.
pub const MIN_NONCE_IN_FLIGHT: usize = 2;

/// Default concurrent nonce lookups.
pub const DEFAULT_NONCE_IN_FLIGHT: usize = 5;
