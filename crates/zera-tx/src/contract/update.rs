//! Updating an existing contract. Requires a restricted key.
//!
//! Only the fields that are set are sent; list fields replace the
//! contract's current lists when non-empty.

use super::{params, ComplianceRequirement, ContractFeeConfig, ExpenseRatioConfig, GovernanceConfig};
use crate::auth::{restricted_keys, RestrictedKeyConfig};
use crate::envelope::Envelope;
use crate::pipeline::{authorize, build_transaction, resolve_asset_scale, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::{NodeConfig, ScaleConfig};
use zera_types::proto::{ContractFeeType, ContractUpdateTxn};
use zera_types::Scale;

const PRIVILEGE: Privilege = Privilege::Restricted("contract update");

#[derive(Debug, Clone, Default)]
pub struct ContractUpdate {
    pub contract_id: String,
    /// Must be higher than the current version.
    pub contract_version: u64,
    pub name: Option<String>,
    pub governance: Option<GovernanceConfig>,
    pub restricted_keys: Vec<RestrictedKeyConfig>,
    pub contract_fees: Option<ContractFeeConfig>,
    pub custom_parameters: Vec<(String, String)>,
    pub expense_ratio: Vec<ExpenseRatioConfig>,
    pub token_compliance: Vec<Vec<ComplianceRequirement>>,
    pub kyc_status: Option<bool>,
    pub immutable_kyc_status: Option<bool>,
    pub quash_threshold: Option<u32>,
}

impl ContractUpdate {
    fn needs_scale(&self) -> bool {
        matches!(&self.contract_fees, Some(fees) if fees.fee_type == ContractFeeType::Fixed)
    }
}

/// `scale` is the contract's denomination, needed only for fixed fees.
pub fn assemble_contract_update(
    envelope: Envelope,
    update: &ContractUpdate,
    scale: Option<&Scale>,
) -> Result<ContractUpdateTxn, TxError> {
    Ok(ContractUpdateTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &update.contract_id)?.to_string(),
        contract_version: update.contract_version,
        name: update.name.clone(),
        governance: update.governance.as_ref().map(GovernanceConfig::to_proto).transpose()?,
        restricted_keys: restricted_keys(&update.restricted_keys)?,
        contract_fees: update.contract_fees.as_ref().map(|fees| fees.to_proto(scale)).transpose()?,
        custom_parameters: params::custom_parameters(&update.custom_parameters),
        expense_ratio: params::expense_ratio(&update.expense_ratio)?,
        token_compliance: params::token_compliance(&update.token_compliance),
        kyc_status: update.kyc_status,
        immutable_kyc_status: update.immutable_kyc_status,
        quash_threshold: update.quash_threshold,
    })
}

/// Attach a memo with [`BuildContext::with_memo`].
pub async fn build_contract_update(
    ctx: BuildContext<'_>,
    scale: Option<&ScaleConfig>,
    update: &ContractUpdate,
) -> Result<ReadyTransaction<ContractUpdateTxn>, TxError> {
    authorize(ctx.credentials, PRIVILEGE)?;
    let asset_scale = match scale {
        Some(config) if config.symbol != update.contract_id => {
            return Err(TxError::invalid(
                "contract_id",
                format!("scale is for {} but updating {}", config.symbol, update.contract_id),
            ));
        }
        Some(config) if update.needs_scale() => Some(resolve_asset_scale(config).await?),
        None if update.needs_scale() => {
            return Err(TxError::invalid("contract_fees.fee", "fixed fees need the contract scale"));
        }
        _ => None,
    };
    build_transaction(ctx, PRIVILEGE, |envelope| {
        assemble_contract_update(envelope, update, asset_scale.as_ref())
    })
    .await
}

pub async fn submit_contract_update(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<ContractUpdateTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::FeeSpec;
    use crate::sign::Credentials;
    use zera_crypto::keys::ed25519_from_phrase;
    use zera_rpc::{NonceConfig, RpcConfig};
    use zera_types::HashToken;

    const ADDR: &str = "8ZfvifzSPMhhhivnH6NtaBXcmF3vsSaiB8KBULTetBcR";
    const PHRASE: &str =
        "crumble tattoo grape hurry pizza inject remind play believe museum thing mosquito";

    fn credentials(restricted: bool) -> Credentials {
        let pair = ed25519_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let text = if restricted {
            format!("r_{}", pair.public_key)
        } else {
            pair.public_key.to_string()
        };
        Credentials::single(&text, &pair.private_key_base58()).unwrap()
    }

    fn fixed_fee() -> ContractFeeConfig {
        ContractFeeConfig {
            fee_type: ContractFeeType::Fixed,
            address: ADDR.into(),
            fee: "2".into(),
            burn: "0".into(),
            validator: "0".into(),
            allowed_fee_instruments: Vec::new(),
        }
    }

    fn update() -> ContractUpdate {
        ContractUpdate {
            contract_id: "$TEST+0000".into(),
            contract_version: 2,
            name: Some("Renamed".into()),
            kyc_status: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_only_set_fields_sent() {
        let envelope = Envelope::new(None, 1, FeeSpec::zra("1").unwrap());
        let txn = assemble_contract_update(envelope, &update(), None).unwrap();
        assert_eq!(txn.name.as_deref(), Some("Renamed"));
        assert_eq!(txn.kyc_status, Some(true));
        assert_eq!(txn.immutable_kyc_status, None);
        assert!(txn.governance.is_none());
        assert!(txn.contract_fees.is_none());
        assert!(txn.restricted_keys.is_empty());
    }

    #[test]
    fn test_fixed_fee_uses_scale() {
        let mut update = update();
        update.contract_fees = Some(fixed_fee());
        let envelope = Envelope::new(None, 1, FeeSpec::zra("1").unwrap());
        let txn = assemble_contract_update(envelope, &update, Some(&Scale::pow10(2))).unwrap();
        assert_eq!(txn.contract_fees.unwrap().fee, "200");
    }

    #[tokio::test]
    async fn test_update_requires_restricted() {
        let creds = credentials(false);
        let nonces = NonceConfig::indexer(RpcConfig::default(), vec!["addr".into()]).with_overrides(vec![1]);
        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("1").unwrap());
        let err = build_contract_update(ctx, None, &update()).await.unwrap_err();
        assert!(matches!(err, TxError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_update_memo_in_base() {
        let creds = credentials(true);
        let nonces = NonceConfig::indexer(RpcConfig::default(), vec!["addr".into()]).with_overrides(vec![4]);
        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("1").unwrap()).with_memo("rename");
        let ready = build_contract_update(ctx, None, &update()).await.unwrap();
        let base = ready.message().base.as_ref().unwrap();
        assert_eq!(base.memo.as_deref(), Some("rename"));
        assert_eq!(base.nonce, 4);
    }

    #[tokio::test]
    async fn test_fixed_fee_without_scale_rejected() {
        let creds = credentials(true);
        let nonces = NonceConfig::indexer(RpcConfig::default(), vec!["addr".into()]).with_overrides(vec![4]);
        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("1").unwrap());
        let mut update = update();
        update.contract_fees = Some(fixed_fee());
        assert!(build_contract_update(ctx, None, &update).await.is_err());

        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("1").unwrap());
        let scale = ScaleConfig::fixed("$TEST+0000", Scale::pow10(1));
        let ready = build_contract_update(ctx, Some(&scale), &update).await.unwrap();
        assert_eq!(ready.message().contract_fees.as_ref().unwrap().fee, "20");
    }
}
