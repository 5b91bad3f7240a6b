//! Coin transfers.
//!
//! A transfer is funded either by one or more wallets, each signing for its
//! own input, or by a single spender drawing on allowances that grantors
//! approved earlier. Allowance inputs are never signed locally: the
//! transfer authentication carries only the grantor address and nonce.
//!
//! Nonces are ordered like the funding: one per wallet, or the spender
//! first followed by each grantor.

use crate::auth::AuthorizationDescriptor;
use crate::envelope::{Envelope, FeeSpec};
use crate::pipeline::{resolve_asset_scale, resolve_exact};
use crate::sign::{sign_and_hash, Credentials, ReadyTransaction, SigningKey};
use crate::{fields, TxError};
use num_bigint::BigUint;
use std::collections::HashSet;
use zera_rpc::{NodeConfig, NonceConfig, ScaleConfig};
use zera_types::amount::Policy;
use zera_types::constants::FEE_PERCENT_EXP;
use zera_types::proto::{CoinTxn, InputTransfers, OutputTransfers, PublicKey, TransferAuthentication};
use zera_types::Scale;

/// Share of an input, as percentage text (0-100), paying the fees.
#[derive(Debug, Clone)]
pub struct FeeShare {
    pub fee_percent: String,
    pub contract_fee_percent: Option<String>,
}

impl FeeShare {
    pub fn new(fee_percent: &str) -> Self {
        Self {
            fee_percent: fee_percent.to_string(),
            contract_fee_percent: None,
        }
    }
}

/// A wallet spending its own coins.
#[derive(Debug)]
pub struct WalletInput {
    /// Must be a single key.
    pub credentials: Credentials,
    /// Whole units of the asset.
    pub amount: String,
    pub fees: FeeShare,
}

/// Coins drawn from a grantor's allowance.
#[derive(Debug, Clone)]
pub struct AllowanceInput {
    pub grantor_address: String,
    pub amount: String,
    pub fees: FeeShare,
}

#[derive(Debug)]
pub enum Funding {
    Wallets(Vec<WalletInput>),
    Allowance {
        spender: Credentials,
        grantors: Vec<AllowanceInput>,
    },
}

#[derive(Debug, Clone)]
pub struct TransferOutput {
    pub address: String,
    pub amount: String,
    pub memo: Option<String>,
}

impl TransferOutput {
    pub fn new(address: &str, amount: &str) -> Self {
        Self {
            address: address.to_string(),
            amount: amount.to_string(),
            memo: None,
        }
    }
}

#[derive(Debug)]
pub struct Transfer {
    pub funding: Funding,
    pub outputs: Vec<TransferOutput>,
    pub contract_fee: Option<FeeSpec>,
    pub memo: Option<String>,
}

impl Transfer {
    /// Number of nonces the transfer consumes.
    pub fn nonce_count(&self) -> usize {
        match &self.funding {
            Funding::Wallets(inputs) => inputs.len(),
            Funding::Allowance { grantors, .. } => 1 + grantors.len(),
        }
    }

    /// Signing keys in authentication order.
    pub fn signers(&self) -> Vec<&SigningKey> {
        match &self.funding {
            Funding::Wallets(inputs) => inputs
                .iter()
                .flat_map(|input| input.credentials.signers.iter())
                .collect(),
            Funding::Allowance { spender, .. } => spender.signers.iter().collect(),
        }
    }
}

fn single_key(credentials: &Credentials, field: &str) -> Result<PublicKey, TxError> {
    if !matches!(credentials.descriptor, AuthorizationDescriptor::Single(_)) {
        return Err(TxError::Authorization(format!(
            "{} must be a single key, got {}",
            field, credentials.descriptor
        )));
    }
    credentials.validate()?;
    credentials.descriptor.to_public_key()
}

fn input_transfer(
    index: usize,
    amount: &str,
    fees: &FeeShare,
    scale: &Scale,
) -> Result<(InputTransfers, BigUint), TxError> {
    let field = format!("inputs[{}]", index);
    let parts = fields::parts(&format!("{}.amount", field), amount, scale, Policy::Exact)?;
    let fee_percent = fields::percent_u32(
        &format!("{}.fee_percent", field),
        &fees.fee_percent,
        FEE_PERCENT_EXP,
        Policy::Exact,
    )?;
    let contract_fee_percent = fees
        .contract_fee_percent
        .as_deref()
        .map(|p| {
            fields::percent_u32(
                &format!("{}.contract_fee_percent", field),
                p,
                FEE_PERCENT_EXP,
                Policy::Exact,
            )
        })
        .transpose()?;
    let transfer = InputTransfers {
        index: index as u64,
        amount: parts.to_string(),
        fee_percent,
        contract_fee_percent,
    };
    Ok((transfer, parts))
}

/// Assemble an unsigned transfer of `contract_id` from resolved nonces.
pub fn assemble_transfer(
    transfer: &Transfer,
    contract_id: &str,
    scale: &Scale,
    nonces: &[u64],
    fee: FeeSpec,
) -> Result<CoinTxn, TxError> {
    fields::required("contract_id", contract_id)?;
    if nonces.len() != transfer.nonce_count() {
        return Err(TxError::invalid(
            "nonces",
            format!("expected {} nonce(s), got {}", transfer.nonce_count(), nonces.len()),
        ));
    }
    if transfer.outputs.is_empty() {
        return Err(TxError::invalid("outputs", "at least one output is required"));
    }

    let mut auth = TransferAuthentication::default();
    let mut inputs = Vec::new();
    let mut total_in = BigUint::ZERO;

    match &transfer.funding {
        Funding::Wallets(wallets) => {
            if wallets.is_empty() {
                return Err(TxError::invalid("inputs", "at least one input is required"));
            }
            for (i, (wallet, nonce)) in wallets.iter().zip(nonces).enumerate() {
                auth.public_key.push(single_key(&wallet.credentials, &format!("inputs[{}]", i))?);
                auth.nonce.push(*nonce);
                let (input, parts) = input_transfer(i, &wallet.amount, &wallet.fees, scale)?;
                inputs.push(input);
                total_in += parts;
            }
        }
        Funding::Allowance { spender, grantors } => {
            if grantors.is_empty() {
                return Err(TxError::invalid("grantors", "at least one allowance input is required"));
            }
            auth.public_key.push(single_key(spender, "spender")?);
            auth.nonce.push(nonces[0]);
            for (i, (grantor, nonce)) in grantors.iter().zip(&nonces[1..]).enumerate() {
                let address = fields::address(&format!("grantors[{}].address", i), &grantor.grantor_address)?;
                auth.allowance_address.push(address);
                auth.allowance_nonce.push(*nonce);
                let (input, parts) = input_transfer(i, &grantor.amount, &grantor.fees, scale)?;
                inputs.push(input);
                total_in += parts;
            }
        }
    }

    let mut seen = HashSet::new();
    let mut outputs = Vec::with_capacity(transfer.outputs.len());
    let mut total_out = BigUint::ZERO;
    for (i, output) in transfer.outputs.iter().enumerate() {
        if !seen.insert(output.address.as_str()) {
            return Err(TxError::invalid(
                format!("outputs[{}].address", i),
                format!("{} appears more than once", output.address),
            ));
        }
        let parts = fields::parts(&format!("outputs[{}].amount", i), &output.amount, scale, Policy::Exact)?;
        outputs.push(OutputTransfers {
            wallet_address: fields::address(&format!("outputs[{}].address", i), &output.address)?,
            amount: parts.to_string(),
            memo: output.memo.clone(),
        });
        total_out += parts;
    }

    if total_in != total_out {
        return Err(TxError::invalid(
            "outputs",
            format!("total input does not equal total output: {} != {}", total_in, total_out),
        ));
    }

    let envelope = Envelope::new(None, 0, fee).with_memo(transfer.memo.as_deref());
    Ok(CoinTxn {
        base: Some(envelope.into_base()),
        auth: Some(auth),
        contract_id: contract_id.to_string(),
        input_transfers: inputs,
        output_transfers: outputs,
        contract_fee_id: transfer.contract_fee.as_ref().map(|f| f.fee_id.clone()),
        contract_fee_amount: transfer.contract_fee.as_ref().map(|f| f.fee_amount.clone()),
    })
}

/// Resolve the asset scale and every nonce, then assemble and sign.
///
/// The asset is `scale.symbol`; `nonces` lists addresses in funding order.
pub async fn build_transfer(
    nonces: &NonceConfig,
    scale: &ScaleConfig,
    transfer: &Transfer,
    fee: FeeSpec,
) -> Result<ReadyTransaction<CoinTxn>, TxError> {
    match &transfer.funding {
        Funding::Wallets(wallets) => {
            for (i, wallet) in wallets.iter().enumerate() {
                single_key(&wallet.credentials, &format!("inputs[{}]", i))?;
            }
        }
        Funding::Allowance { spender, .. } => {
            single_key(spender, "spender")?;
        }
    }

    let asset_scale = resolve_asset_scale(scale).await?;
    let resolved = resolve_exact(nonces, transfer.nonce_count()).await?;
    log::debug!("transfer of {} with nonces {:?}", scale.symbol, resolved);

    let txn = assemble_transfer(transfer, &scale.symbol, &asset_scale, &resolved, fee)?;
    let signers: Vec<&SigningKey> = transfer.signers();
    sign_and_hash(txn, signers)
}

pub async fn submit_transfer(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<CoinTxn>,
) -> Result<(), TxError> {
    crate::pipeline::submit(validator, config, ready).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::verify_signatures;
    use zera_crypto::keys::{ed25519_from_phrase, ed448_from_phrase};
    use zera_types::HashToken;

    const RECIPIENT: &str = "8ZfvifzSPMhhhivnH6NtaBXcmF3vsSaiB8KBULTetBcR";
    const GRANTOR: &str = "23ULwo87vyjEUtZZyKjgVa34b3VE7d6kfWY9MBDM8nVb";

    fn wallet(phrase: &str, amount: &str) -> WalletInput {
        let pair = ed25519_from_phrase(phrase, HashToken::Blake3).unwrap();
        WalletInput {
            credentials: Credentials::single(&pair.public_key.to_string(), &pair.private_key_base58()).unwrap(),
            amount: amount.into(),
            fees: FeeShare::new("100"),
        }
    }

    fn fee() -> FeeSpec {
        FeeSpec::zra("0.01").unwrap()
    }

    fn scale() -> Scale {
        Scale::pow10(9)
    }

    #[test]
    fn test_wallet_transfer_layout() {
        let transfer = Transfer {
            funding: Funding::Wallets(vec![wallet("alpha", "1.5"), wallet("beta", "0.5")]),
            outputs: vec![TransferOutput::new(RECIPIENT, "2")],
            contract_fee: None,
            memo: None,
        };
        let txn = assemble_transfer(&transfer, "$ZRA+0000", &scale(), &[4, 9], fee()).unwrap();
        let auth = txn.auth.as_ref().unwrap();
        assert_eq!(auth.nonce, vec![4, 9]);
        assert_eq!(auth.public_key.len(), 2);
        assert!(auth.allowance_address.is_empty());
        assert_eq!(txn.input_transfers[0].amount, "1500000000");
        assert_eq!(txn.input_transfers[1].index, 1);
        assert_eq!(txn.input_transfers[0].fee_percent, 100_000_000);
        assert_eq!(txn.output_transfers[0].amount, "2000000000");
        let base = txn.base.as_ref().unwrap();
        assert!(base.public_key.is_none());
        assert_eq!(base.nonce, 0);
    }

    #[test]
    fn test_totals_must_match() {
        let transfer = Transfer {
            funding: Funding::Wallets(vec![wallet("alpha", "1")]),
            outputs: vec![TransferOutput::new(RECIPIENT, "0.9")],
            contract_fee: None,
            memo: None,
        };
        let err = assemble_transfer(&transfer, "$ZRA+0000", &scale(), &[1], fee()).unwrap_err();
        assert!(matches!(err, TxError::InvalidInput { ref field, .. } if field == "outputs"));
    }

    #[test]
    fn test_precision_loss_names_field() {
        let transfer = Transfer {
            funding: Funding::Wallets(vec![wallet("alpha", "1.23456")]),
            outputs: vec![TransferOutput::new(RECIPIENT, "1.23456")],
            contract_fee: None,
            memo: None,
        };
        let err = assemble_transfer(&transfer, "$TEST+0001", &Scale::pow10(3), &[1], fee()).unwrap_err();
        assert!(matches!(err, TxError::PrecisionLoss { ref field, .. } if field == "inputs[0].amount"));
    }

    #[test]
    fn test_allowance_funding_order() {
        let spender = wallet("spender", "");
        let transfer = Transfer {
            funding: Funding::Allowance {
                spender: spender.credentials,
                grantors: vec![
                    AllowanceInput {
                        grantor_address: GRANTOR.into(),
                        amount: "1".into(),
                        fees: FeeShare::new("100"),
                    },
                    AllowanceInput {
                        grantor_address: RECIPIENT.into(),
                        amount: "2".into(),
                        fees: FeeShare::new("0"),
                    },
                ],
            },
            outputs: vec![TransferOutput::new("5DjbNXETa6z3h6NnRTCvW1iw4RYZ1pSAfqBazYoF9JuJ", "3")],
            contract_fee: None,
            memo: None,
        };
        assert_eq!(transfer.nonce_count(), 3);
        let txn = assemble_transfer(&transfer, "$ZRA+0000", &scale(), &[10, 20, 30], fee()).unwrap();
        let auth = txn.auth.as_ref().unwrap();
        assert_eq!(auth.nonce, vec![10]);
        assert_eq!(auth.allowance_nonce, vec![20, 30]);
        assert_eq!(auth.allowance_address[0], zera_types::base58::decode(GRANTOR).unwrap());
        assert_eq!(txn.input_transfers.len(), 2);
        assert_eq!(txn.input_transfers[1].amount, "2000000000");

        let ready = sign_and_hash(txn, transfer.signers()).unwrap();
        assert_eq!(ready.message().auth.as_ref().unwrap().signature.len(), 1);
    }

    #[test]
    fn test_signatures_verify_per_wallet() {
        let a = wallet("alpha", "1");
        let b = wallet("beta", "1");
        let keys: Vec<_> = [&a, &b]
            .iter()
            .map(|w| match &w.credentials.descriptor {
                AuthorizationDescriptor::Single(k) => k.clone(),
                _ => unreachable!(),
            })
            .collect();
        let transfer = Transfer {
            funding: Funding::Wallets(vec![a, b]),
            outputs: vec![TransferOutput::new(RECIPIENT, "2")],
            contract_fee: Some(FeeSpec::new("$ZRA+0000", "5").unwrap()),
            memo: Some("rent".into()),
        };
        let txn = assemble_transfer(&transfer, "$ZRA+0000", &scale(), &[1, 1], fee()).unwrap();
        assert_eq!(txn.contract_fee_amount.as_deref(), Some("5"));
        let ready = sign_and_hash(txn, transfer.signers()).unwrap();
        verify_signatures(&ready, &keys).unwrap();
    }

    #[test]
    fn test_multi_key_wallet_rejected() {
        let ed = ed25519_from_phrase("alpha", HashToken::Blake3).unwrap();
        let ed448 = ed448_from_phrase("alpha", HashToken::Blake3).unwrap();
        let group = crate::auth::MultiKeyGroup {
            keys: vec![
                crate::auth::MultiKeyEntry { class: 1, key: ed.public_key.clone() },
                crate::auth::MultiKeyEntry { class: 1, key: ed448.public_key.clone() },
            ],
            patterns: vec![vec![crate::auth::PatternEntry { class: 1, required: 1 }]],
            hash_tokens: vec![HashToken::Blake3],
        };
        let creds = Credentials::new(
            AuthorizationDescriptor::multi(group).unwrap(),
            vec![SigningKey::new(zera_crypto::Algorithm::Ed25519, ed.private_key.to_vec()).unwrap()],
        );
        let transfer = Transfer {
            funding: Funding::Wallets(vec![WalletInput {
                credentials: creds,
                amount: "1".into(),
                fees: FeeShare::new("100"),
            }]),
            outputs: vec![TransferOutput::new(RECIPIENT, "1")],
            contract_fee: None,
            memo: None,
        };
        assert!(matches!(
            assemble_transfer(&transfer, "$ZRA+0000", &scale(), &[1], fee()),
            Err(TxError::Authorization(_))
        ));
    }

    #[test]
    fn test_duplicate_outputs_rejected() {
        let transfer = Transfer {
            funding: Funding::Wallets(vec![wallet("alpha", "2")]),
            outputs: vec![TransferOutput::new(RECIPIENT, "1"), TransferOutput::new(RECIPIENT, "1")],
            contract_fee: None,
            memo: None,
        };
        assert!(assemble_transfer(&transfer, "$ZRA+0000", &scale(), &[1], fee()).is_err());
    }
}
