//! Governance votes.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::proto::GovernanceVote;

#[derive(Debug, Clone)]
pub struct Vote {
    pub contract_id: String,
    /// Hex-encoded proposal id.
    pub proposal_id: String,
    /// Yes/no proposals.
    pub support: Option<bool>,
    /// Multiple-choice proposals: index into the options.
    pub option: Option<u32>,
}

pub fn assemble_vote(envelope: Envelope, vote: &Vote) -> Result<GovernanceVote, TxError> {
    let proposal_id = fields::hex_bytes("proposal_id", fields::required("proposal_id", &vote.proposal_id)?)?;
    Ok(GovernanceVote {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &vote.contract_id)?.to_string(),
        proposal_id,
        support: vote.support,
        support_option: vote.option,
    })
}

pub async fn build_vote(ctx: BuildContext<'_>, vote: &Vote) -> Result<ReadyTransaction<GovernanceVote>, TxError> {
    build_transaction(ctx, Privilege::Any, |envelope| assemble_vote(envelope, vote)).await
}

pub async fn submit_vote(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<GovernanceVote>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
