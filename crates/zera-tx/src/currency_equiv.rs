//! Self-declared currency-equivalent rates.
//!
//! A restricted key of each contract publishes its own rate; the network
//! stores rates scaled by 10^18.

use crate::envelope::Envelope;
use crate::pipeline::{build_transaction, BuildContext, Privilege};
use crate::sign::ReadyTransaction;
use crate::{fields, TxError};
use zera_rpc::NodeConfig;
use zera_types::amount::Policy;
use zera_types::constants::RATE_EXP;
use zera_types::proto::{CurrencyEquiv, SelfCurrencyEquiv};

#[derive(Debug, Clone)]
pub struct RateEntry {
    pub contract_id: String,
    /// Value of one whole unit as decimal text, e.g. `"1.01"`.
    pub rate: String,
}

pub fn assemble_currency_equiv(envelope: Envelope, rates: &[RateEntry]) -> Result<SelfCurrencyEquiv, TxError> {
    if rates.is_empty() {
        return Err(TxError::invalid("rates", "at least one rate is required"));
    }
    let cur_equiv = rates
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Ok(CurrencyEquiv {
                contract_id: fields::required(&format!("rates[{}].contract_id", i), &entry.contract_id)?.to_string(),
                rate: fields::scaled(&format!("rates[{}].rate", i), &entry.rate, RATE_EXP, Policy::Truncate)?
                    .to_string(),
            })
        })
        .collect::<Result<Vec<_>, TxError>>()?;

    Ok(SelfCurrencyEquiv {
        base: Some(envelope.into_base()),
        cur_equiv,
    })
}

pub async fn build_currency_equiv(
    ctx: BuildContext<'_>,
    rates: &[RateEntry],
) -> Result<ReadyTransaction<SelfCurrencyEquiv>, TxError> {
    build_transaction(ctx, Privilege::Restricted("currency equivalent"), |envelope| {
        assemble_currency_equiv(envelope, rates)
    })
    .await
}

pub async fn submit_currency_equiv(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<SelfCurrencyEquiv>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}
