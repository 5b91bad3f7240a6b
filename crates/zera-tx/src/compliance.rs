//! Assigning and revoking compliance levels on wallets.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::proto::{ComplianceAssign, ComplianceTxn};

#[derive(Debug, Clone)]
pub struct ComplianceEntry {
    pub wallet_address: String,
    pub level: u32,
    /// False revokes the level.
    pub assign: bool,
    /// Unix seconds.
    pub expiry: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Compliance {
    pub contract_id: String,
    pub entries: Vec<ComplianceEntry>,
}

pub fn assemble_compliance(envelope: Envelope, compliance: &Compliance) -> Result<ComplianceTxn, TxError> {
    if compliance.entries.is_empty() {
        return Err(TxError::invalid("compliance", "at least one entry is required"));
    }
    let entries = compliance
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Ok(ComplianceAssign {
                recipient_address: fields::address(&format!("compliance[{}].wallet_address", i), &entry.wallet_address)?,
                compliance_level: entry.level,
                assign_revoke: entry.assign,
                expiry: entry.expiry.map(fields::unix_timestamp),
            })
        })
        .collect::<Result<Vec<_>, TxError>>()?;

    Ok(ComplianceTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &compliance.contract_id)?.to_string(),
        compliance: entries,
    })
}

pub async fn build_compliance(
    ctx: BuildContext<'_>,
    compliance: &Compliance,
) -> Result<ReadyTransaction<ComplianceTxn>, TxError> {
    build_transaction(ctx, Privilege::Restricted("compliance"), |envelope| {
        assemble_compliance(envelope, compliance)
    })
    .await
}

pub async fn submit_compliance(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<ComplianceTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::FeeSpec;

    #[test]
    fn test_entries_in_order() {
        let compliance = Compliance {
            contract_id: "$KYC+0001".into(),
            entries: vec![
                ComplianceEntry {
                    wallet_address: "8ZfvifzSPMhhhivnH6NtaBXcmF3vsSaiB8KBULTetBcR".into(),
                    level: 2,
                    assign: true,
                    expiry: Some(1_900_000_000),
                },
                ComplianceEntry {
                    wallet_address: "23ULwo87vyjEUtZZyKjgVa34b3VE7d6kfWY9MBDM8nVb".into(),
                    level: 1,
                    assign: false,
                    expiry: None,
                },
            ],
        };
        let envelope = Envelope::new(None, 1, FeeSpec::zra("1").unwrap());
        let txn = assemble_compliance(envelope, &compliance).unwrap();
        assert_eq!(txn.compliance.len(), 2);
        assert_eq!(txn.compliance[0].compliance_level, 2);
        assert!(txn.compliance[0].expiry.is_some());
        assert!(!txn.compliance[1].assign_revoke);
        assert!(txn.compliance[1].expiry.is_none());
    }

    #[test]
    fn test_bad_address_named() {
        let compliance = Compliance {
            contract_id: "$KYC+0001".into(),
            entries: vec![ComplianceEntry {
                wallet_address: "0OIl".into(),
                level: 1,
                assign: true,
                expiry: None,
            }],
        };
        let envelope = Envelope::new(None, 1, FeeSpec::zra("1").unwrap());
        let err = assemble_compliance(envelope, &compliance).unwrap_err();
        assert!(matches!(err, TxError::InvalidInput { ref field, .. } if field == "compliance[0].wallet_address"));
    }
}
