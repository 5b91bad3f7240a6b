//! Collecting a contract's expense ratio from holder wallets.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::proto::ExpenseRatioTxn;

#[derive(Debug, Clone)]
pub struct ExpenseRatioCollection {
    pub contract_id: String,
    /// Wallets the ratio is collected from.
    pub addresses: Vec<String>,
    /// Where the collected amount goes.
    pub output_address: String,
}

pub fn assemble_expense_ratio(
    envelope: Envelope,
    collection: &ExpenseRatioCollection,
) -> Result<ExpenseRatioTxn, TxError> {
    if collection.addresses.is_empty() {
        return Err(TxError::invalid("addresses", "at least one address is required"));
    }
    let addresses = collection
        .addresses
        .iter()
        .enumerate()
        .map(|(i, addr)| fields::address(&format!("addresses[{}]", i), addr))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExpenseRatioTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &collection.contract_id)?.to_string(),
        addresses,
        output_address: fields::address("output_address", &collection.output_address)?,
    })
}

pub async fn build_expense_ratio(
    ctx: BuildContext<'_>,
    collection: &ExpenseRatioCollection,
) -> Result<ReadyTransaction<ExpenseRatioTxn>, TxError> {
    build_transaction(ctx, Privilege::Restricted("expense ratio"), |envelope| {
        assemble_expense_ratio(envelope, collection)
    })
    .await
}

pub async fn submit_expense_ratio(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<ExpenseRatioTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
