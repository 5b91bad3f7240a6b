//! ZERA transaction construction.
//!
//! Every transaction family follows the same path: resolve the asset scale
//! and signer nonces, assemble the family payload on a shared envelope, then
//! run the two-phase sign-and-hash pipeline. The result is a
//! [`ReadyTransaction`] that can be submitted exactly once.

pub mod allowance;
pub mod auth;
pub mod compliance;
pub mod contract;
pub mod currency_equiv;
pub mod envelope;
pub mod expense_ratio;
pub mod item_mint;
pub mod mint;
pub mod nft;
pub mod pipeline;
pub mod proposal;
pub mod sign;
pub mod transfer;
pub mod vote;

mod fields;

pub use auth::{AuthorizationDescriptor, MultiKeyEntry, MultiKeyGroup, PatternEntry};
pub use envelope::{Envelope, FeeSpec};
pub use pipeline::{build_transaction, submit, BuildContext, Privilege};
pub use sign::{sign_and_hash, sign_slots_and_hash, verify_signatures, Credentials, ReadyTransaction, SigningKey, TxnEnvelope};

use thiserror::Error;
use zera_crypto::CryptoError;
use zera_rpc::RpcError;
use zera_types::AmountError;

#[derive(Debug, Error)]
pub enum TxError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{field} cannot be represented exactly: {source}")]
    PrecisionLoss {
        field: String,
        #[source]
        source: AmountError,
    },

    #[error("authorization mismatch: {0}")]
    Authorization(String),

    #[error("invalid authorization descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("nonce resolution failed: {0}")]
    Nonce(#[source] RpcError),

    #[error("asset scale lookup failed: {0}")]
    Scale(#[source] RpcError),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("signing failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("submission failed: {0}")]
    Rpc(#[from] RpcError),
}

impl TxError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Attach a field name to an amount conversion failure.
    pub(crate) fn amount(field: impl Into<String>, err: AmountError) -> Self {
        match err {
            AmountError::PrecisionLoss { .. } => Self::PrecisionLoss {
                field: field.into(),
                source: err,
            },
            other => Self::invalid(field, other),
        }
    }
}
