//! Governance proposals.
//!
//! A proposal may carry transactions to execute if it passes. Those are
//! built beforehand with a governance authorization (`gov_<symbol>`) and
//! embedded as their serialized bytes and hash.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::{ReadyTransaction, TxnEnvelope};
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::proto::{GovernanceProposal, GovernanceTxn};

/// Wrap a built transaction for execution by a proposal.
pub fn governance_txn<T: TxnEnvelope>(ready: &ReadyTransaction<T>) -> GovernanceTxn {
    GovernanceTxn {
        txn_type: T::TXN_TYPE as i32,
        serialized_txn: ready.to_bytes(),
        txn_hash: ready.hash().to_vec(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Proposal {
    pub contract_id: String,
    pub title: String,
    pub synopsis: String,
    pub body: String,
    /// Multiple-choice options; empty for a yes/no proposal.
    pub options: Vec<String>,
    /// Unix seconds. Only adaptive governance takes a window.
    pub start_timestamp: Option<i64>,
    pub end_timestamp: Option<i64>,
    pub transactions: Vec<GovernanceTxn>,
}

pub fn assemble_proposal(envelope: Envelope, proposal: &Proposal) -> Result<GovernanceProposal, TxError> {
    if let (Some(start), Some(end)) = (proposal.start_timestamp, proposal.end_timestamp) {
        if end <= start {
            return Err(TxError::invalid("end_timestamp", "must be after start_timestamp"));
        }
    }
    Ok(GovernanceProposal {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &proposal.contract_id)?.to_string(),
        title: fields::required("title", &proposal.title)?.to_string(),
        synopsis: proposal.synopsis.clone(),
        body: proposal.body.clone(),
        options: proposal.options.clone(),
        start_timestamp: proposal.start_timestamp.map(fields::unix_timestamp),
        end_timestamp: proposal.end_timestamp.map(fields::unix_timestamp),
        governance_txn: proposal.transactions.clone(),
    })
}

pub async fn build_proposal(
    ctx: BuildContext<'_>,
    proposal: &Proposal,
) -> Result<ReadyTransaction<GovernanceProposal>, TxError> {
    build_transaction(ctx, Privilege::Any, |envelope| assemble_proposal(envelope, proposal)).await
}

pub async fn submit_proposal(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<GovernanceProposal>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
