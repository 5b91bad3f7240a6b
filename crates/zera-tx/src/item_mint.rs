//! Minting a single NFT/SBT item.
//!
//! Allowed for restricted keys and for governance or smart-contract
//! authorizations.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::amount::Policy;
use zera_types::constants::{PERCENT_EXP, RATE_EXP};
use zera_types::proto::{ItemContractFees, ItemizedMintTxn, KeyValuePair};

/// Per-item fees charged when the item moves.
#[derive(Debug, Clone)]
pub struct ItemFees {
    /// Currency-equivalent fee as decimal text.
    pub fee: String,
    pub fee_address: String,
    /// Percentage text (0-100).
    pub burn_percent: String,
    /// Percentage text (0-100).
    pub validator_percent: String,
    pub allowed_fee_instruments: Vec<String>,
}

impl ItemFees {
    pub fn to_proto(&self) -> Result<ItemContractFees, TxError> {
        Ok(ItemContractFees {
            fee: fields::scaled("contract_fees.fee", &self.fee, RATE_EXP, Policy::Truncate)?.to_string(),
            fee_address: fields::address("contract_fees.fee_address", &self.fee_address)?,
            burn: fields::percent("contract_fees.burn", &self.burn_percent, PERCENT_EXP, Policy::Truncate)?
                .to_string(),
            validator: fields::percent(
                "contract_fees.validator",
                &self.validator_percent,
                PERCENT_EXP,
                Policy::Truncate,
            )?
            .to_string(),
            allowed_fee_instrument: self.allowed_fee_instruments.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemMint {
    pub contract_id: String,
    /// Arbitrary-precision integer as decimal text.
    pub item_id: String,
    pub recipient: String,
    pub parameters: Vec<(String, String)>,
    /// Unix seconds.
    pub expiry: Option<u64>,
    pub valid_from: Option<u64>,
    /// Arbitrary-precision integer as decimal text.
    pub voting_weight: Option<String>,
    pub contract_fees: Option<ItemFees>,
}

pub fn assemble_item_mint(envelope: Envelope, item: &ItemMint) -> Result<ItemizedMintTxn, TxError> {
    Ok(ItemizedMintTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &item.contract_id)?.to_string(),
        item_id: fields::integer("item_id", &item.item_id)?.to_string(),
        recipient_address: fields::address("recipient", &item.recipient)?,
        parameters: item
            .parameters
            .iter()
            .map(|(key, value)| KeyValuePair {
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
        expiry: item.expiry,
        valid_from: item.valid_from,
        contract_fees: item.contract_fees.as_ref().map(ItemFees::to_proto).transpose()?,
        voting_weight: item
            .voting_weight
            .as_deref()
            .map(|w| fields::integer("voting_weight", w).map(|v| v.to_string()))
            .transpose()?,
    })
}

pub async fn build_item_mint(
    ctx: BuildContext<'_>,
    item: &ItemMint,
) -> Result<ReadyTransaction<ItemizedMintTxn>, TxError> {
    build_transaction(ctx, Privilege::Restricted("item mint"), |envelope| {
        assemble_item_mint(envelope, item)
    })
    .await
}

pub async fn submit_item_mint(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<ItemizedMintTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::FeeSpec;

    const ADDR: &str = "8ZfvifzSPMhhhivnH6NtaBXcmF3vsSaiB8KBULTetBcR";

    fn envelope() -> Envelope {
        Envelope::new(None, 1, FeeSpec::zra("1").unwrap())
    }

    #[test]
    fn test_item_fields() {
        let item = ItemMint {
            contract_id: "$NFT+0001".into(),
            item_id: "340282366920938463463374607431768211456".into(),
            recipient: ADDR.into(),
            parameters: vec![("color".into(), "blue".into())],
            expiry: Some(1_900_000_000),
            voting_weight: Some("12".into()),
            ..Default::default()
        };
        let txn = assemble_item_mint(envelope(), &item).unwrap();
        assert_eq!(txn.item_id, "340282366920938463463374607431768211456");
        assert_eq!(txn.parameters[0].key, "color");
        assert_eq!(txn.expiry, Some(1_900_000_000));
        assert_eq!(txn.valid_from, None);
        assert_eq!(txn.voting_weight.as_deref(), Some("12"));
        assert!(txn.contract_fees.is_none());
    }

    #[test]
    fn test_item_fee_scaling() {
        let fees = ItemFees {
            fee: "1.23".into(),
            fee_address: ADDR.into(),
            burn_percent: "25.5".into(),
            validator_percent: "10".into(),
            allowed_fee_instruments: vec!["$ZRA+0000".into()],
        }
        .to_proto()
        .unwrap();
        assert_eq!(fees.fee, "1230000000000000000");
        assert_eq!(fees.burn, "255000000000000000");
        assert_eq!(fees.validator, "100000000000000000");
    }

    #[test]
    fn test_invalid_item_id() {
        let item = ItemMint {
            contract_id: "$NFT+0001".into(),
            item_id: "abc".into(),
            recipient: ADDR.into(),
            ..Default::default()
        };
        assert!(matches!(
            assemble_item_mint(envelope(), &item),
            Err(TxError::InvalidInput { ref field, .. }) if field == "item_id"
        ));
    }
}
