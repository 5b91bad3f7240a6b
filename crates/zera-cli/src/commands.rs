//! CLI command implementations.

use crate::{AppContext, SignerArgs};
use zera_crypto::keys::{ed25519_from_phrase, ed448_from_phrase, generate_ed448};
use zera_crypto::{address_of, generate_ed25519, Algorithm, KeyPair};
use zera_rpc::{resolve_nonces, resolve_scale, NonceConfig, ScaleConfig};
use zera_tx::mint::{build_mint, submit_mint, Mint};
use zera_tx::transfer::{build_transfer, submit_transfer, FeeShare, Funding, Transfer, TransferOutput, WalletInput};
use zera_tx::vote::{build_vote, submit_vote, Vote};
use zera_tx::{BuildContext, Credentials, FeeSpec, ReadyTransaction, TxnEnvelope};
use zera_types::constants::NATIVE_CONTRACT_ID;
use zera_types::{HashToken, KeyText};

type Result = std::result::Result<(), Box<dyn std::error::Error>>;

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Nonce source for the signer's own address.
fn signer_nonces(ctx: &AppContext, credentials: &Credentials) -> std::result::Result<NonceConfig, Box<dyn std::error::Error>> {
    let key = match &credentials.descriptor {
        zera_tx::AuthorizationDescriptor::Single(key) => key,
        other => return Err(format!("{} has no wallet address", other).into()),
    };
    let address = address_of(key)?;
    log::debug!("signer address {}", address);
    Ok(NonceConfig::indexer(ctx.indexer.clone(), vec![address]))
}

fn print_ready<T: TxnEnvelope>(ready: &ReadyTransaction<T>) {
    println!("Transaction:");
    println!("  Type: {:?}", T::TXN_TYPE);
    println!("  Hash: {}", ready.hash_hex());
    println!("  Raw:  {}", hex::encode(ready.to_bytes()));
}

// ─── Keys ───────────────────────────────────────────────────────────────────

pub fn keygen(algorithm: Algorithm, token: HashToken, phrase: Option<&str>) -> Result {
    let pair: KeyPair = match (algorithm, phrase) {
        (Algorithm::Ed25519, Some(phrase)) => ed25519_from_phrase(phrase, token)?,
        (Algorithm::Ed448, Some(phrase)) => ed448_from_phrase(phrase, token)?,
        (Algorithm::Ed25519, None) => generate_ed25519(&mut rand::thread_rng(), token)?,
        (Algorithm::Ed448, None) => generate_ed448(&mut rand::thread_rng(), token)?,
    };

    println!("Algorithm:   {}", pair.algorithm);
    println!("Public key:  {}", pair.public_key);
    println!("Private key: {}", pair.private_key_base58().as_str());
    println!("Address:     {}", pair.address);
    Ok(())
}

pub fn show_address(public_key: &str) -> Result {
    let key = KeyText::parse(public_key)?;
    println!("{}", address_of(&key)?);
    Ok(())
}

// ─── Lookups ────────────────────────────────────────────────────────────────

pub async fn show_nonces(ctx: &AppContext, addresses: Vec<String>, from_validator: bool) -> Result {
    let config = if from_validator {
        NonceConfig::validator(ctx.validator()?, addresses.clone())
    } else {
        NonceConfig::indexer(ctx.indexer.clone(), addresses.clone())
    };
    let nonces = resolve_nonces(&config).await?;

    let listing: serde_json::Map<String, serde_json::Value> = addresses
        .into_iter()
        .zip(nonces)
        .map(|(address, nonce)| (address, serde_json::Value::from(nonce)))
        .collect();
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

pub async fn show_scale(ctx: &AppContext, symbol: &str) -> Result {
    let scale = resolve_scale(&ScaleConfig::indexer(symbol, ctx.indexer.clone())).await?;
    println!("{} = {} parts", symbol, scale);
    Ok(())
}

// ─── Transactions ───────────────────────────────────────────────────────────

pub async fn transfer(ctx: &AppContext, signer: &SignerArgs, to: &str, amount: &str, asset: &str) -> Result {
    let credentials = Credentials::single(&signer.public_key, &signer.private_key)?;
    let nonces = signer_nonces(ctx, &credentials)?;
    let scale = ScaleConfig::indexer(asset, ctx.indexer.clone());

    let transfer = Transfer {
        funding: Funding::Wallets(vec![WalletInput {
            credentials,
            amount: amount.to_string(),
            fees: FeeShare::new("100"),
        }]),
        outputs: vec![TransferOutput::new(to, amount)],
        contract_fee: None,
        memo: signer.memo.clone(),
    };

    println!("Transfer:");
    println!("  To:     {}", to);
    println!("  Amount: {} {}", amount, asset);
    println!("  Fee:    {} {}", signer.fee, NATIVE_CONTRACT_ID);
    println!();

    let ready = build_transfer(&nonces, &scale, &transfer, FeeSpec::zra(&signer.fee)?).await?;
    finish(ctx, signer, ready, |validator, ready| async move {
        submit_transfer(validator, &ctx.node, ready).await
    })
    .await
}

pub async fn mint(ctx: &AppContext, signer: &SignerArgs, contract: &str, amount: &str, to: &str) -> Result {
    let credentials = Credentials::single(&signer.public_key, &signer.private_key)?;
    let nonces = signer_nonces(ctx, &credentials)?;
    let scale = ScaleConfig::indexer(contract, ctx.indexer.clone());
    let mint = Mint {
        contract_id: contract.to_string(),
        amount: amount.to_string(),
        recipient: to.to_string(),
    };

    let mut build = BuildContext::new(&nonces, &credentials, FeeSpec::zra(&signer.fee)?);
    if let Some(memo) = signer.memo.as_deref() {
        build = build.with_memo(memo);
    }
    let ready = build_mint(build, &scale, &mint).await?;
    finish(ctx, signer, ready, |validator, ready| async move {
        submit_mint(validator, &ctx.node, ready).await
    })
    .await
}

pub async fn vote(
    ctx: &AppContext,
    signer: &SignerArgs,
    contract: &str,
    proposal: &str,
    support: Option<bool>,
    option: Option<u32>,
) -> Result {
    if support.is_none() && option.is_none() {
        return Err("a vote needs --support or --option".into());
    }
    let credentials = Credentials::single(&signer.public_key, &signer.private_key)?;
    let nonces = signer_nonces(ctx, &credentials)?;
    let vote = Vote {
        contract_id: contract.to_string(),
        proposal_id: proposal.to_string(),
        support,
        option,
    };

    let mut build = BuildContext::new(&nonces, &credentials, FeeSpec::zra(&signer.fee)?);
    if let Some(memo) = signer.memo.as_deref() {
        build = build.with_memo(memo);
    }
    let ready = build_vote(build, &vote).await?;
    finish(ctx, signer, ready, |validator, ready| async move {
        submit_vote(validator, &ctx.node, ready).await
    })
    .await
}

/// Print the signed transaction, then submit it when asked to.
async fn finish<'a, T, F, Fut>(ctx: &'a AppContext, signer: &SignerArgs, ready: ReadyTransaction<T>, submit: F) -> Result
where
    T: TxnEnvelope,
    F: FnOnce(&'a str, ReadyTransaction<T>) -> Fut,
    Fut: std::future::Future<Output = std::result::Result<(), zera_tx::TxError>>,
{
    print_ready(&ready);
    if !signer.submit {
        println!();
        println!("Not submitted (pass --submit to send).");
        return Ok(());
    }

    let validator = ctx.validator()?;
    let hash = ready.hash_hex();
    submit(validator, ready).await?;
    println!();
    println!("Submitted {} to {}", hash, validator);
    Ok(())
}
