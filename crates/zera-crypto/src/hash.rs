//! Hash functions used by ZERA.
//!
//! The content hash of a signed transaction is SHA3-256 over its serialized
//! bytes. Wallet addresses are the hash of the raw public key in one of the
//! hash domains named by a [`HashToken`].

use crate::CryptoError;
use tiny_keccak::{Hasher, Sha3};
use zera_types::constants::KEY_SEPARATOR;
use zera_types::{base58, HashToken};

/// SHA3-256 (FIPS 202, not Keccak).
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// SHA3-512 (FIPS 202).
pub fn sha3_512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha3::v512();
    let mut output = [0u8; 64];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

pub fn blake3(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Unkeyed BLAKE2b with variable output length.
pub fn blake2b(data: &[u8], out_len: usize) -> Vec<u8> {
    blake2b_simd::Params::new()
        .hash_length(out_len)
        .hash(data)
        .as_bytes()
        .to_vec()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Hash a raw public key in the domain of `token`.
pub fn address_bytes(raw_public_key: &[u8], token: HashToken) -> Result<Vec<u8>, CryptoError> {
    match token {
        HashToken::Blake3 => Ok(blake3(raw_public_key).to_vec()),
        HashToken::Sha3_256 => Ok(sha3_256(raw_public_key).to_vec()),
        HashToken::Sha3_512 => Ok(sha3_512(raw_public_key).to_vec()),
        HashToken::Restricted => Err(CryptoError::UnsupportedHashToken(token)),
    }
}

/// Derive the wallet address of a raw public key.
///
/// Returns the hash-token-prefixed key bytes (`c_` + raw) and the base58
/// address.
pub fn derive_address(
    raw_public_key: &[u8],
    token: HashToken,
) -> Result<(Vec<u8>, String), CryptoError> {
    let address = address_bytes(raw_public_key, token)?;

    let mut prefixed = Vec::with_capacity(raw_public_key.len() + 2);
    prefixed.extend_from_slice(token.as_str().as_bytes());
    prefixed.push(KEY_SEPARATOR as u8);
    prefixed.extend_from_slice(raw_public_key);

    Ok((prefixed, base58::encode(&address)))
}
