//! Transaction signing and verification.
//!
//! The algorithm is never guessed from key length: it comes from the
//! one-letter prefix of the signer's public key (`A` = Ed25519,
//! `B` = Ed448). A private key whose length does not match the declared
//! algorithm is rejected.

use crate::{ed448, CryptoError};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use zera_types::constants::{
    ED25519_LETTER, ED25519_PRIVATE_KEY_SIZE, ED25519_PUBLIC_KEY_SIZE, ED448_LETTER,
    ED448_PRIVATE_KEY_SIZE, ED448_PUBLIC_KEY_SIZE,
};
use zera_types::KeyText;
use zeroize::Zeroizing;

/// Signature algorithm of a ZERA key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Ed25519,
    Ed448,
}

impl Algorithm {
    pub fn from_prefix_letter(letter: &str) -> Result<Self, CryptoError> {
        match letter {
            ED25519_LETTER => Ok(Self::Ed25519),
            ED448_LETTER => Ok(Self::Ed448),
            other => Err(CryptoError::UnknownAlgorithm(other.to_string())),
        }
    }

    /// Algorithm of a parsed public key.
    pub fn for_key(key: &KeyText) -> Result<Self, CryptoError> {
        let letter = key
            .algorithm_letter()
            .map_err(|_| CryptoError::UnknownAlgorithm(key.prefix().to_string()))?;
        Self::from_prefix_letter(letter)
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Self::Ed25519 => ED25519_LETTER,
            Self::Ed448 => ED448_LETTER,
        }
    }

    pub fn private_key_len(&self) -> usize {
        match self {
            Self::Ed25519 => ED25519_PRIVATE_KEY_SIZE,
            Self::Ed448 => ED448_PRIVATE_KEY_SIZE,
        }
    }

    pub fn public_key_len(&self) -> usize {
        match self {
            Self::Ed25519 => ED25519_PUBLIC_KEY_SIZE,
            Self::Ed448 => ED448_PUBLIC_KEY_SIZE,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => f.write_str("ED25519"),
            Self::Ed448 => f.write_str("ED448"),
        }
    }
}

/// Sign `payload` with a raw private key.
///
/// Ed25519 keys are the 64-byte `seed || public` form; Ed448 keys are the
/// 57-byte seed.
pub fn sign(algorithm: Algorithm, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if payload.is_empty() {
        return Err(CryptoError::EmptyPayload);
    }
    if private_key.len() != algorithm.private_key_len() {
        return Err(CryptoError::InvalidPrivateKeyLength {
            algorithm,
            expected: algorithm.private_key_len(),
            actual: private_key.len(),
        });
    }

    match algorithm {
        Algorithm::Ed25519 => {
            let mut keypair = Zeroizing::new([0u8; ED25519_PRIVATE_KEY_SIZE]);
            keypair.copy_from_slice(private_key);
            let signing_key = SigningKey::from_keypair_bytes(&keypair)
                .map_err(|_| CryptoError::InvalidKey(algorithm))?;
            Ok(signing_key.sign(payload).to_bytes().to_vec())
        }
        Algorithm::Ed448 => ed448::sign(private_key, payload),
    }
}

/// Verify `signature` over `payload` with a raw public key.
pub fn verify(
    algorithm: Algorithm,
    public_key: &[u8],
    payload: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    if payload.is_empty() {
        return Err(CryptoError::EmptyPayload);
    }
    if signature.is_empty() {
        return Err(CryptoError::EmptySignature);
    }

    match algorithm {
        Algorithm::Ed25519 => {
            let bytes: &[u8; ED25519_PUBLIC_KEY_SIZE] =
                public_key
                    .try_into()
                    .map_err(|_| CryptoError::InvalidPublicKeyLength {
                        algorithm,
                        expected: ED25519_PUBLIC_KEY_SIZE,
                        actual: public_key.len(),
                    })?;
            let key = VerifyingKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidKey(algorithm))?;
            let sig = Signature::from_slice(signature)
                .map_err(|_| CryptoError::VerificationFailed(algorithm))?;
            key.verify(payload, &sig)
                .map_err(|_| CryptoError::VerificationFailed(algorithm))
        }
        Algorithm::Ed448 => ed448::verify(public_key, payload, signature),
    }
}
