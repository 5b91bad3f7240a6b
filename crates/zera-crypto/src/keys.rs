//! Key-pair generation and wallet-address derivation.
//!
//! Deterministic derivation from a passphrase follows the wallet tooling:
//! Ed25519 seeds are SHA-256 of the phrase, Ed448 seeds are a 57-byte
//! BLAKE2b of the phrase.

use crate::hash::{blake2b, derive_address, sha256};
use crate::sign::Algorithm;
use crate::{ed448, CryptoError};
use ed25519_dalek::SigningKey;
use rand::{CryptoRng, RngCore};
use zera_types::constants::{ED448_PRIVATE_KEY_SIZE, KEY_SEPARATOR, RESTRICTED_PREFIX};
use zera_types::{base58, HashToken, KeyText};
use zeroize::Zeroizing;

/// A generated signing identity.
pub struct KeyPair {
    pub algorithm: Algorithm,
    /// Raw private key (Ed25519: seed || public, Ed448: seed).
    pub private_key: Zeroizing<Vec<u8>>,
    /// Prefixed textual public key, e.g. `A_c_...`.
    pub public_key: KeyText,
    /// Base58 wallet address.
    pub address: String,
}

impl KeyPair {
    /// Base58 form of the private key.
    pub fn private_key_base58(&self) -> Zeroizing<String> {
        Zeroizing::new(base58::encode(&self.private_key))
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key.to_string())
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

fn assemble(
    algorithm: Algorithm,
    private_key: Zeroizing<Vec<u8>>,
    raw_public: &[u8],
    token: HashToken,
) -> Result<KeyPair, CryptoError> {
    let (_, address) = derive_address(raw_public, token)?;
    let prefix = format!(
        "{}{sep}{}{sep}",
        algorithm.letter(),
        token.as_str(),
        sep = KEY_SEPARATOR
    );
    Ok(KeyPair {
        algorithm,
        private_key,
        public_key: KeyText::new(prefix, raw_public.to_vec()),
        address,
    })
}

fn ed25519_from_seed(seed: &[u8; 32], token: HashToken) -> Result<KeyPair, CryptoError> {
    let signing_key = SigningKey::from_bytes(seed);
    let public = signing_key.verifying_key().to_bytes();
    let private = Zeroizing::new(signing_key.to_keypair_bytes().to_vec());
    assemble(Algorithm::Ed25519, private, &public, token)
}

/// Generate a random Ed25519 key pair.
pub fn generate_ed25519<R: RngCore + CryptoRng>(
    rng: &mut R,
    token: HashToken,
) -> Result<KeyPair, CryptoError> {
    let mut seed = Zeroizing::new([0u8; 32]);
    rng.fill_bytes(seed.as_mut());
    ed25519_from_seed(&seed, token)
}

/// Generate a random Ed448 key pair.
pub fn generate_ed448<R: RngCore + CryptoRng>(
    rng: &mut R,
    token: HashToken,
) -> Result<KeyPair, CryptoError> {
    let mut seed = Zeroizing::new(vec![0u8; ED448_PRIVATE_KEY_SIZE]);
    rng.fill_bytes(seed.as_mut_slice());
    let public = ed448::public_from_seed(&seed)?;
    assemble(Algorithm::Ed448, seed, &public, token)
}

/// Derive an Ed25519 key pair from a passphrase.
pub fn ed25519_from_phrase(phrase: &str, token: HashToken) -> Result<KeyPair, CryptoError> {
    let seed = Zeroizing::new(sha256(phrase.as_bytes()));
    ed25519_from_seed(&seed, token)
}

/// Derive an Ed448 key pair from a passphrase.
pub fn ed448_from_phrase(phrase: &str, token: HashToken) -> Result<KeyPair, CryptoError> {
    let seed = Zeroizing::new(blake2b(phrase.as_bytes(), ED448_PRIVATE_KEY_SIZE));
    let public = ed448::public_from_seed(&seed)?;
    assemble(Algorithm::Ed448, seed, &public, token)
}

/// Wallet address of a textual public key, hashed in the domain named by
/// its prefix (`A_c_...` hashes with BLAKE3).
pub fn address_of(key: &KeyText) -> Result<String, CryptoError> {
    let prefix = key.prefix().strip_prefix(RESTRICTED_PREFIX).unwrap_or(key.prefix());
    let token = prefix
        .split(KEY_SEPARATOR)
        .nth(1)
        .and_then(HashToken::from_str_token)
        .ok_or_else(|| CryptoError::MissingHashToken(key.to_string()))?;
    let (_, address) = derive_address(key.raw(), token)?;
    Ok(address)
}
