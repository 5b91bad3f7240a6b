//! The shared envelope every transaction family is assembled on.

use crate::{fields, TxError};
use prost_types::Timestamp;
use zera_types::amount::{self, Policy};
use zera_types::constants::NATIVE_CONTRACT_ID;
use zera_types::proto::{BaseTxn, PublicKey};
use zera_types::Scale;

/// Network fee: the paying contract and an amount in its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSpec {
    pub fee_id: String,
    /// Integer parts as decimal text.
    pub fee_amount: String,
}

impl FeeSpec {
    /// `fee_amount` must already be in parts.
    pub fn new(fee_id: &str, fee_amount: &str) -> Result<Self, TxError> {
        fields::required("fee_id", fee_id)?;
        let parts = fields::integer("fee_amount", fee_amount)?;
        Ok(Self {
            fee_id: fee_id.to_string(),
            fee_amount: parts.to_string(),
        })
    }

    /// A fee of `amount` whole units of `fee_id` at `scale`.
    pub fn from_decimal(fee_id: &str, amount: &str, scale: &Scale) -> Result<Self, TxError> {
        fields::required("fee_id", fee_id)?;
        let parts = fields::parts("fee_amount", amount, scale, Policy::Exact)?;
        Ok(Self {
            fee_id: fee_id.to_string(),
            fee_amount: parts.to_string(),
        })
    }

    /// A fee in the native coin, given in ZRA.
    pub fn zra(amount: &str) -> Result<Self, TxError> {
        Self::from_decimal(NATIVE_CONTRACT_ID, amount, &Scale::native())
    }

    /// The fee expressed back in whole units of `scale`.
    pub fn display_amount(&self, scale: &Scale) -> Result<String, TxError> {
        let parts = fields::integer("fee_amount", &self.fee_amount)?;
        Ok(amount::from_parts(&parts, scale).to_string())
    }
}

/// Everything in `BaseTxn` except the signature and the hash.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Absent for coin transfers, whose keys travel in the transfer auth.
    pub public_key: Option<PublicKey>,
    pub nonce: u64,
    pub fee: FeeSpec,
    pub memo: Option<String>,
    pub timestamp: Timestamp,
}

impl Envelope {
    /// Stamped with the current UTC time.
    pub fn new(public_key: Option<PublicKey>, nonce: u64, fee: FeeSpec) -> Self {
        Self {
            public_key,
            nonce,
            fee,
            memo: None,
            timestamp: fields::now(),
        }
    }

    /// Empty memos are dropped.
    pub fn with_memo(mut self, memo: Option<&str>) -> Self {
        self.memo = memo.filter(|m| !m.is_empty()).map(str::to_string);
        self
    }

    pub fn into_base(self) -> BaseTxn {
        BaseTxn {
            public_key: self.public_key,
            timestamp: Some(self.timestamp),
            fee_amount: self.fee.fee_amount,
            fee_id: self.fee.fee_id,
            signature: Vec::new(),
            hash: Vec::new(),
            memo: self.memo,
            nonce: self.nonce,
        }
    }
}
