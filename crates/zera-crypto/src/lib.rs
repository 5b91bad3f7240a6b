//! Cryptographic primitives for the ZERA SDK.
//!
//! - [`sign`]: Ed25519 and Ed448 signing/verification, selected by the
//!   `A`/`B` key-prefix letter
//! - [`hash`]: SHA3-256 content hash and the address hash domains
//! - [`keys`]: key-pair generation and wallet-address derivation

mod ed448;
pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{derive_address, sha3_256};
pub use keys::{address_of, generate_ed25519, KeyPair};
pub use sign::{Algorithm, sign, verify};

use thiserror::Error;
use zera_types::HashToken;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("payload cannot be empty")]
    EmptyPayload,

    #[error("signature cannot be empty")]
    EmptySignature,

    #[error("invalid private key length for {algorithm}: expected {expected}, got {actual}")]
    InvalidPrivateKeyLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    #[error("invalid public key length for {algorithm}: expected {expected}, got {actual}")]
    InvalidPublicKeyLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {0} key material")]
    InvalidKey(Algorithm),

    #[error("{0} signature verification failed")]
    VerificationFailed(Algorithm),

    #[error("unknown algorithm letter {0:?}")]
    UnknownAlgorithm(String),

    #[error("hash token {0} cannot derive an address")]
    UnsupportedHashToken(HashToken),

    #[error("public key {0:?} carries no address hash token")]
    MissingHashToken(String),
}
