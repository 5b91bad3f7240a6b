//! Transferring a single NFT item.

use crate::envelope::{Envelope, FeeSpec};
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::proto::NftTxn;

#[derive(Debug, Clone)]
pub struct NftTransfer {
    pub contract_id: String,
    /// Arbitrary-precision integer as decimal text.
    pub item_id: String,
    pub recipient: String,
    /// Item-level fee, when the item carries one.
    pub contract_fee: Option<FeeSpec>,
}

pub fn assemble_nft_transfer(envelope: Envelope, transfer: &NftTransfer) -> Result<NftTxn, TxError> {
    Ok(NftTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &transfer.contract_id)?.to_string(),
        item_id: fields::integer("item_id", &transfer.item_id)?.to_string(),
        recipient_address: fields::address("recipient", &transfer.recipient)?,
        contract_fee_id: transfer.contract_fee.as_ref().map(|f| f.fee_id.clone()),
        contract_fee_amount: transfer.contract_fee.as_ref().map(|f| f.fee_amount.clone()),
    })
}

pub async fn build_nft_transfer(
    ctx: BuildContext<'_>,
    transfer: &NftTransfer,
) -> Result<ReadyTransaction<NftTxn>, TxError> {
    build_transaction(ctx, Privilege::Any, |envelope| assemble_nft_transfer(envelope, transfer)).await
}

pub async fn submit_nft_transfer(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<NftTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
