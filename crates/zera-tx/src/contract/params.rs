//! Token contract parameter helpers.
//!
//! Supply amounts are whole units converted with the contract's own
//! denomination and must be exact. Fee and burn percentages are stored at
//! 10^16 (100% = 10^18); expense ratios at 10^4.

use crate::{fields, TxError};
use num_bigint::BigUint;
use zera_types::amount::Policy;
use zera_types::constants::{EXPENSE_RATIO_EXP, MAX_PERCENT, PERCENT_EXP};
use zera_types::proto::{
    Compliance, ContractFeeType, ContractFees, CoinDenomination, ExpenseRatio, KeyValuePair,
    MaxSupplyRelease, PreMintWallet, TokenCompliance,
};
use zera_types::{Decimal, Scale};

/// Parts per whole coin and the name of one part.
#[derive(Debug, Clone)]
pub struct Denomination {
    /// Integer text, at least 1.
    pub parts: String,
    pub name: String,
}

impl Denomination {
    pub fn new(parts: &str, name: &str) -> Self {
        Self {
            parts: parts.to_string(),
            name: name.to_string(),
        }
    }

    pub fn scale(&self) -> Result<Scale, TxError> {
        let parts = fields::integer("denomination.parts", &self.parts)?;
        Scale::new(parts).map_err(|e| TxError::amount("denomination.parts", e))
    }

    pub fn to_proto(&self) -> Result<CoinDenomination, TxError> {
        Ok(CoinDenomination {
            denomination_name: self.name.clone(),
            amount: self.scale()?.to_string(),
        })
    }
}

/// Maximum supply in parts.
pub fn max_supply(amount: &str, scale: &Scale) -> Result<BigUint, TxError> {
    fields::parts("max_supply", amount, scale, Policy::Exact)
}

#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Unix seconds, UTC.
    pub release_date: i64,
    /// Whole units.
    pub amount: String,
}

/// Release schedule; the releases must add up to the maximum supply.
pub fn max_supply_release(
    releases: &[ReleaseConfig],
    scale: &Scale,
    max_supply: &BigUint,
) -> Result<Vec<MaxSupplyRelease>, TxError> {
    let mut total = BigUint::ZERO;
    let mut out = Vec::with_capacity(releases.len());
    for (i, release) in releases.iter().enumerate() {
        let parts = fields::parts(&format!("max_supply_release[{}].amount", i), &release.amount, scale, Policy::Exact)?;
        total += &parts;
        out.push(MaxSupplyRelease {
            release_date: Some(fields::unix_timestamp(release.release_date)),
            amount: parts.to_string(),
        });
    }
    if !releases.is_empty() && &total != max_supply {
        return Err(TxError::invalid(
            "max_supply_release",
            format!("total release amount {} does not match max supply {}", total, max_supply),
        ));
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct PremintConfig {
    pub address: String,
    /// Whole units.
    pub amount: String,
}

/// Premint wallets and the total preminted, in parts.
pub fn premint(premints: &[PremintConfig], scale: &Scale) -> Result<(Vec<PreMintWallet>, BigUint), TxError> {
    let mut total = BigUint::ZERO;
    let wallets = premints
        .iter()
        .enumerate()
        .map(|(i, premint)| {
            let parts = fields::parts(&format!("premint[{}].amount", i), &premint.amount, scale, Policy::Exact)?;
            total += &parts;
            Ok(PreMintWallet {
                address: fields::address(&format!("premint[{}].address", i), &premint.address)?,
                amount: parts.to_string(),
            })
        })
        .collect::<Result<Vec<_>, TxError>>()?;
    Ok((wallets, total))
}

/// Transfer fee charged by a contract on top of the network fee.
#[derive(Debug, Clone)]
pub struct ContractFeeConfig {
    pub fee_type: ContractFeeType,
    pub address: String,
    /// Fixed: whole units of the contract. Currency equivalent: value.
    /// Percentage: 0-100 of the transfer.
    pub fee: String,
    /// Percentage (0-100) of the fee burned.
    pub burn: String,
    /// Percentage (0-100) of the fee paid to validators.
    pub validator: String,
    pub allowed_fee_instruments: Vec<String>,
}

impl ContractFeeConfig {
    /// `scale` is only consulted for fixed fees.
    pub fn to_proto(&self, scale: Option<&Scale>) -> Result<ContractFees, TxError> {
        let fee = match self.fee_type {
            ContractFeeType::Fixed => {
                let scale = scale.ok_or_else(|| {
                    TxError::invalid("contract_fees.fee", "fixed fees need the contract denomination")
                })?;
                fields::parts("contract_fees.fee", &self.fee, scale, Policy::Exact)?
            }
            ContractFeeType::CurEquivalent => {
                fields::scaled("contract_fees.fee", &self.fee, PERCENT_EXP, Policy::Truncate)?
            }
            ContractFeeType::Percentage => {
                fields::percent("contract_fees.fee", &self.fee, PERCENT_EXP, Policy::Truncate)?
            }
        };

        let burn_pct = fields::decimal("contract_fees.burn", &self.burn)?;
        let validator_pct = fields::decimal("contract_fees.validator", &self.validator)?;
        let burn = fields::percent("contract_fees.burn", &self.burn, PERCENT_EXP, Policy::Truncate)?;
        let validator = fields::percent("contract_fees.validator", &self.validator, PERCENT_EXP, Policy::Truncate)?;
        check_share_total(&burn_pct, &validator_pct)?;

        Ok(ContractFees {
            fee: fee.to_string(),
            fee_address: fields::address("contract_fees.address", &self.address)?,
            burn: burn.to_string(),
            validator: validator.to_string(),
            allowed_fee_instrument: self.allowed_fee_instruments.clone(),
            contract_fee_type: self.fee_type as i32,
        })
    }
}

/// Burn and validator shares together cannot exceed 100%.
fn check_share_total(burn: &Decimal, validator: &Decimal) -> Result<(), TxError> {
    let exact = Scale::pow10(burn.frac_digits().max(validator.frac_digits()));
    let a = zera_types::amount::to_parts(burn, &exact, Policy::Exact).map_err(|e| TxError::amount("contract_fees.burn", e))?;
    let b = zera_types::amount::to_parts(validator, &exact, Policy::Exact)
        .map_err(|e| TxError::amount("contract_fees.validator", e))?;
    if a + b > BigUint::from(MAX_PERCENT) * exact.parts() {
        return Err(TxError::invalid(
            "contract_fees",
            format!("burn {}% plus validator {}% exceeds 100%", burn, validator),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ExpenseRatioConfig {
    /// 1 (January) to 12 (December).
    pub month: u32,
    pub day: u32,
    /// 0-100 with at most 4 decimal places.
    pub percent: String,
}

pub fn expense_ratio(configs: &[ExpenseRatioConfig]) -> Result<Vec<ExpenseRatio>, TxError> {
    configs
        .iter()
        .enumerate()
        .map(|(i, config)| {
            if !(1..=12).contains(&config.month) {
                return Err(TxError::invalid(format!("expense_ratio[{}].month", i), config.month));
            }
            if !(1..=31).contains(&config.day) {
                return Err(TxError::invalid(format!("expense_ratio[{}].day", i), config.day));
            }
            let percent = fields::percent_u32(
                &format!("expense_ratio[{}].percent", i),
                &config.percent,
                EXPENSE_RATIO_EXP,
                Policy::Exact,
            )?;
            Ok(ExpenseRatio {
                day: config.day,
                month: config.month,
                percent,
            })
        })
        .collect()
}

/// A compliance level issued by another contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRequirement {
    pub contract_id: String,
    pub level: u32,
}

/// Alternatives of requirement sets: a holder satisfying every requirement
/// of any one inner set is compliant.
pub fn token_compliance(sets: &[Vec<ComplianceRequirement>]) -> Vec<TokenCompliance> {
    sets.iter()
        .map(|set| TokenCompliance {
            compliance: set
                .iter()
                .map(|req| Compliance {
                    contract_id: req.contract_id.clone(),
                    compliance_level: req.level,
                })
                .collect(),
        })
        .collect()
}

pub fn custom_parameters(params: &[(String, String)]) -> Vec<KeyValuePair> {
    params
        .iter()
        .map(|(key, value)| KeyValuePair {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}
