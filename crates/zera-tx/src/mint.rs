//! Minting new supply of a token contract. Requires a restricted key.

use crate::envelope::Envelope;
use crate::pipeline::{authorize, build_transaction, resolve_asset_scale, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::{NodeConfig, ScaleConfig};
use zera_types::amount::Policy;
use zera_types::proto::MintTxn;
use zera_types::Scale;

const PRIVILEGE: Privilege = Privilege::Restricted("mint");

#[derive(Debug, Clone)]
pub struct Mint {
    pub contract_id: String,
    /// Whole units of the token.
    pub amount: String,
    pub recipient: String,
}

pub fn assemble_mint(envelope: Envelope, mint: &Mint, scale: &Scale) -> Result<MintTxn, TxError> {
    Ok(MintTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &mint.contract_id)?.to_string(),
        amount: fields::parts("amount", &mint.amount, scale, Policy::Exact)?.to_string(),
        recipient_address: fields::address("recipient", &mint.recipient)?,
    })
}

/// `scale` must describe the minted contract.
pub async fn build_mint(
    ctx: BuildContext<'_>,
    scale: &ScaleConfig,
    mint: &Mint,
) -> Result<ReadyTransaction<MintTxn>, TxError> {
    if scale.symbol != mint.contract_id {
        return Err(TxError::invalid(
            "contract_id",
            format!("scale is for {} but minting {}", scale.symbol, mint.contract_id),
        ));
    }
    authorize(ctx.credentials, PRIVILEGE)?;
    let asset_scale = resolve_asset_scale(scale).await?;
    build_transaction(ctx, PRIVILEGE, |envelope| assemble_mint(envelope, mint, &asset_scale)).await
}

pub async fn submit_mint(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<MintTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
