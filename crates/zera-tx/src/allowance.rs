//! Allowance approval and revocation.
//!
//! An approval lets `wallet_address` spend from the signer's balance, capped
//! either by a currency-equivalent value or by a raw part amount, optionally
//! resetting every period. A revocation carries none of the limit fields:
//! they are absent on the wire, not zero.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::amount::Policy;
use zera_types::constants::RATE_EXP;
use zera_types::proto::AllowanceTxn;

/// Spending cap of an approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceLimit {
    /// Currency-equivalent value as decimal text.
    CurrencyEquivalent(String),
    /// Integer parts of the asset as decimal text.
    Amount(String),
}

impl AllowanceLimit {
    /// Exactly one of the two must be given.
    pub fn from_options(currency_equivalent: Option<&str>, amount: Option<&str>) -> Result<Self, TxError> {
        match (currency_equivalent, amount) {
            (Some(ce), None) => Ok(Self::CurrencyEquivalent(ce.to_string())),
            (None, Some(parts)) => Ok(Self::Amount(parts.to_string())),
            (Some(_), Some(_)) => Err(TxError::invalid(
                "allowance",
                "only one of currency equivalent or amount may be provided",
            )),
            (None, None) => Err(TxError::invalid(
                "allowance",
                "one of currency equivalent or amount is required",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowancePeriod {
    Months(u32),
    Seconds(u32),
}

impl AllowancePeriod {
    /// At most one of the two may be given.
    pub fn from_options(months: Option<u32>, seconds: Option<u32>) -> Result<Option<Self>, TxError> {
        match (months, seconds) {
            (Some(_), Some(_)) => Err(TxError::invalid(
                "period",
                "only one of months or seconds may be provided",
            )),
            (Some(m), None) => Ok(Some(Self::Months(m))),
            (None, Some(s)) => Ok(Some(Self::Seconds(s))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowanceGrant {
    pub limit: AllowanceLimit,
    pub period: Option<AllowancePeriod>,
    /// Unix seconds; negative values start at the epoch.
    pub start_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceAction {
    Approve(AllowanceGrant),
    Revoke,
}

#[derive(Debug, Clone)]
pub struct Allowance {
    pub contract_id: String,
    pub wallet_address: String,
    pub action: AllowanceAction,
}

pub fn assemble_allowance(envelope: Envelope, allowance: &Allowance) -> Result<AllowanceTxn, TxError> {
    let mut txn = AllowanceTxn {
        base: Some(envelope.into_base()),
        contract_id: fields::required("contract_id", &allowance.contract_id)?.to_string(),
        authorize: false,
        wallet_address: fields::address("wallet_address", &allowance.wallet_address)?,
        ..Default::default()
    };

    if let AllowanceAction::Approve(grant) = &allowance.action {
        txn.authorize = true;
        match &grant.limit {
            AllowanceLimit::CurrencyEquivalent(value) => {
                let scaled = fields::scaled("currency_equivalent", value, RATE_EXP, Policy::Truncate)?;
                txn.allowed_currency_equivalent = Some(scaled.to_string());
            }
            AllowanceLimit::Amount(parts) => {
                txn.allowed_amount = Some(fields::integer("amount", parts)?.to_string());
            }
        }
        match grant.period {
            Some(AllowancePeriod::Months(m)) => txn.period_months = Some(m),
            Some(AllowancePeriod::Seconds(s)) => txn.period_seconds = Some(s),
            None => {}
        }
        txn.start_time = Some(fields::unix_timestamp(grant.start_time));
    }
    Ok(txn)
}

pub async fn build_allowance(
    ctx: BuildContext<'_>,
    allowance: &Allowance,
) -> Result<ReadyTransaction<AllowanceTxn>, TxError> {
    build_transaction(ctx, Privilege::Any, |envelope| assemble_allowance(envelope, allowance)).await
}

pub async fn submit_allowance(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<AllowanceTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
