//! Token contract creation and updates.
//!
//! A new contract carries its own denomination, so supply, premint and
//! fixed-fee amounts are converted locally without a scale lookup.

mod governance;
mod params;
mod update;

pub use governance::{GovernanceConfig, ProposalPeriodConfig, StageConfig};
pub use params::{
    ComplianceRequirement, ContractFeeConfig, Denomination, ExpenseRatioConfig, PremintConfig, ReleaseConfig,
};
pub use update::{assemble_contract_update, build_contract_update, submit_contract_update, ContractUpdate};

use crate::auth::{check_symbol, restricted_keys, RestrictedKeyConfig};
use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use num_bigint::BigUint;
use zera_rpc::NodeConfig;
use zera_types::amount::Policy;
use zera_types::constants::RATE_EXP;
use zera_types::proto::{ContractType, InstrumentContract};

#[derive(Debug, Clone)]
pub struct TokenContract {
    pub contract_version: u64,
    /// `$SYMBOL+NNNN`, unique on the network.
    pub contract_id: String,
    pub symbol: String,
    pub name: String,
    pub governance: Option<GovernanceConfig>,
    pub restricted_keys: Vec<RestrictedKeyConfig>,
    pub denomination: Denomination,
    /// Whole units. `None` leaves supply uncapped.
    pub max_supply: Option<String>,
    pub max_supply_release: Vec<ReleaseConfig>,
    pub premint: Vec<PremintConfig>,
    pub custom_parameters: Vec<(String, String)>,
    pub expense_ratio: Vec<ExpenseRatioConfig>,
    pub update_expense_ratio: bool,
    pub contract_fees: Option<ContractFeeConfig>,
    pub update_contract_fees: bool,
    pub quash_threshold: Option<u32>,
    pub token_compliance: Vec<Vec<ComplianceRequirement>>,
    pub kyc_status: bool,
    pub immutable_kyc_status: bool,
    /// Starting currency-equivalent value of one whole coin.
    pub cur_equiv_start: Option<String>,
}

impl TokenContract {
    /// A minimal contract; optional sections start empty.
    pub fn new(contract_id: &str, symbol: &str, name: &str, denomination: Denomination) -> Self {
        Self {
            contract_version: 1,
            contract_id: contract_id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            governance: None,
            restricted_keys: Vec::new(),
            denomination,
            max_supply: None,
            max_supply_release: Vec::new(),
            premint: Vec::new(),
            custom_parameters: Vec::new(),
            expense_ratio: Vec::new(),
            update_expense_ratio: false,
            contract_fees: None,
            update_contract_fees: false,
            quash_threshold: None,
            token_compliance: Vec::new(),
            kyc_status: false,
            immutable_kyc_status: false,
            cur_equiv_start: None,
        }
    }
}

pub fn assemble_token_contract(envelope: Envelope, contract: &TokenContract) -> Result<InstrumentContract, TxError> {
    check_symbol(&contract.contract_id)?;
    let symbol = fields::required("symbol", &contract.symbol)?;
    if contract.contract_id[1..].split('+').next() != Some(symbol) {
        return Err(TxError::invalid(
            "symbol",
            format!("{} does not match contract id {}", symbol, contract.contract_id),
        ));
    }

    let scale = contract.denomination.scale()?;

    let max_supply = contract
        .max_supply
        .as_deref()
        .map(|text| params::max_supply(text, &scale))
        .transpose()?;
    let max_supply_release = match &max_supply {
        Some(max) => params::max_supply_release(&contract.max_supply_release, &scale, max)?,
        None if contract.max_supply_release.is_empty() => Vec::new(),
        None => return Err(TxError::invalid("max_supply_release", "requires a max supply")),
    };

    let (premint_wallets, preminted) = params::premint(&contract.premint, &scale)?;
    if let Some(max) = &max_supply {
        if &preminted > max {
            return Err(TxError::invalid(
                "premint",
                format!("premint total {} exceeds max supply {}", preminted, max),
            ));
        }
    }

    let cur_equiv_start = contract
        .cur_equiv_start
        .as_deref()
        .map(|text| fields::scaled("cur_equiv_start", text, RATE_EXP, Policy::Truncate))
        .transpose()?;

    Ok(InstrumentContract {
        base: Some(envelope.into_base()),
        r#type: ContractType::Token as i32,
        contract_version: contract.contract_version,
        contract_id: contract.contract_id.clone(),
        symbol: symbol.to_string(),
        name: fields::required("name", &contract.name)?.to_string(),
        governance: contract.governance.as_ref().map(GovernanceConfig::to_proto).transpose()?,
        restricted_keys: restricted_keys(&contract.restricted_keys)?,
        coin_denomination: Some(contract.denomination.to_proto()?),
        max_supply: max_supply.as_ref().map(BigUint::to_string),
        max_supply_release,
        premint_wallets,
        custom_parameters: params::custom_parameters(&contract.custom_parameters),
        expense_ratio: params::expense_ratio(&contract.expense_ratio)?,
        update_expense_ratio: contract.update_expense_ratio,
        contract_fees: contract
            .contract_fees
            .as_ref()
            .map(|fees| fees.to_proto(Some(&scale)))
            .transpose()?,
        update_contract_fees: contract.update_contract_fees,
        quash_threshold: contract.quash_threshold,
        token_compliance: params::token_compliance(&contract.token_compliance),
        kyc_status: contract.kyc_status,
        immutable_kyc_status: contract.immutable_kyc_status,
        cur_equiv_start: cur_equiv_start.as_ref().map(BigUint::to_string),
    })
}

/// Any key may create a contract.
pub async fn build_token_contract(
    ctx: BuildContext<'_>,
    contract: &TokenContract,
) -> Result<ReadyTransaction<InstrumentContract>, TxError> {
    build_transaction(ctx, Privilege::Any, |envelope| assemble_token_contract(envelope, contract)).await
}

pub async fn submit_token_contract(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<InstrumentContract>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
