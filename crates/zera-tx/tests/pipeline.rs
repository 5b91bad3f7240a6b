//! End-to-end builds through the public API with pinned nonces and scales.
//!
//! Nothing here touches the network: every nonce comes from overrides and
//! every scale from a fixed value.

use zera_crypto::keys::{ed25519_from_phrase, ed448_from_phrase, KeyPair};
use zera_rpc::{NonceConfig, RpcConfig, ScaleConfig};
use zera_tx::contract::{build_token_contract, Denomination, TokenContract};
use zera_tx::mint::{build_mint, Mint};
use zera_tx::transfer::{build_transfer, AllowanceInput, FeeShare, Funding, Transfer, TransferOutput, WalletInput};
use zera_tx::vote::{build_vote, Vote};
use zera_tx::{
    sign_and_hash, verify_signatures, AuthorizationDescriptor, BuildContext, Credentials, FeeSpec, MultiKeyEntry,
    MultiKeyGroup, PatternEntry, SigningKey, TxError,
};
use zera_types::{HashToken, KeyText, Scale};

const RECIPIENT: &str = "8ZfvifzSPMhhhivnH6NtaBXcmF3vsSaiB8KBULTetBcR";
const GRANTOR: &str = "23ULwo87vyjEUtZZyKjgVa34b3VE7d6kfWY9MBDM8nVb";

fn pair(phrase: &str) -> KeyPair {
    ed25519_from_phrase(phrase, HashToken::Blake3).unwrap()
}

fn credentials(pair: &KeyPair, restricted: bool) -> Credentials {
    let text = if restricted {
        format!("r_{}", pair.public_key)
    } else {
        pair.public_key.to_string()
    };
    Credentials::single(&text, &pair.private_key_base58()).unwrap()
}

fn pinned(nonces: Vec<u64>) -> NonceConfig {
    let addresses = nonces.iter().map(|n| format!("addr{}", n)).collect();
    NonceConfig::indexer(RpcConfig::default(), addresses).with_overrides(nonces)
}

fn zra() -> ScaleConfig {
    ScaleConfig::fixed("$ZRA+0000", Scale::pow10(9))
}

#[tokio::test]
async fn test_resigning_is_stable() {
    let owner = pair("stable owner");
    let creds = credentials(&owner, false);
    let nonces = pinned(vec![3]);
    let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("0.1").unwrap());
    let contract = TokenContract::new("$STBL+0001", "STBL", "Stable", Denomination::new("100", "cent"));

    let ready = build_token_contract(ctx, &contract).await.unwrap();
    let bytes = ready.to_bytes();
    let hash = *ready.hash();

    let again = sign_and_hash(ready.into_message(), &creds.signers).unwrap();
    assert_eq!(again.to_bytes(), bytes);
    assert_eq!(*again.hash(), hash);
    verify_signatures(&again, &[owner.public_key.clone()]).unwrap();
}

#[tokio::test]
async fn test_wallet_transfer_signatures_verify() {
    let a = pair("wallet a");
    let b = pair("wallet b");
    let transfer = Transfer {
        funding: Funding::Wallets(vec![
            WalletInput { credentials: credentials(&a, false), amount: "0.75".into(), fees: FeeShare::new("50") },
            WalletInput { credentials: credentials(&b, false), amount: "0.25".into(), fees: FeeShare::new("50") },
        ]),
        outputs: vec![TransferOutput::new(RECIPIENT, "1")],
        contract_fee: None,
        memo: None,
    };

    let ready = build_transfer(&pinned(vec![5, 6]), &zra(), &transfer, FeeSpec::zra("0.01").unwrap())
        .await
        .unwrap();
    let auth = ready.message().auth.as_ref().unwrap();
    assert_eq!(auth.nonce, vec![5, 6]);
    verify_signatures(&ready, &[a.public_key.clone(), b.public_key.clone()]).unwrap();

    // Wrong key order fails.
    assert!(verify_signatures(&ready, &[b.public_key.clone(), a.public_key.clone()]).is_err());
}

#[tokio::test]
async fn test_allowance_transfer_nonce_order() {
    let spender = pair("spender");
    let transfer = Transfer {
        funding: Funding::Allowance {
            spender: credentials(&spender, false),
            grantors: vec![
                AllowanceInput { grantor_address: GRANTOR.into(), amount: "4".into(), fees: FeeShare::new("100") },
                AllowanceInput { grantor_address: RECIPIENT.into(), amount: "1".into(), fees: FeeShare::new("0") },
            ],
        },
        outputs: vec![TransferOutput::new("5DjbNXETa6z3h6NnRTCvW1iw4RYZ1pSAfqBazYoF9JuJ", "5")],
        contract_fee: None,
        memo: Some("allowance".into()),
    };

    let ready = build_transfer(&pinned(vec![11, 21, 31]), &zra(), &transfer, FeeSpec::zra("0.01").unwrap())
        .await
        .unwrap();
    let auth = ready.message().auth.as_ref().unwrap();
    assert_eq!(auth.nonce, vec![11]);
    assert_eq!(auth.allowance_nonce, vec![21, 31]);
    assert_eq!(auth.allowance_address.len(), 2);
    verify_signatures(&ready, &[spender.public_key.clone()]).unwrap();

    // Too few nonces for spender plus grantors.
    let err = build_transfer(&pinned(vec![11, 21]), &zra(), &transfer, FeeSpec::zra("0.01").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, TxError::InvalidInput { ref field, .. } if field == "nonces"));
}

#[tokio::test]
async fn test_restricted_operation_rejected_before_lookup() {
    let plain = credentials(&pair("plain"), false);
    let nonces = pinned(vec![1]);
    let ctx = BuildContext::new(&nonces, &plain, FeeSpec::zra("1").unwrap());
    // The indexer behind this scale is never reachable; the privilege check fails first.
    let scale = ScaleConfig::indexer("$TEST+0000", RpcConfig::new("http://127.0.0.1:9", ""));
    let mint = Mint { contract_id: "$TEST+0000".into(), amount: "1".into(), recipient: RECIPIENT.into() };

    let err = build_mint(ctx, &scale, &mint).await.unwrap_err();
    assert!(matches!(err, TxError::Authorization(_)));
}

#[test]
fn test_descriptor_options_exclusive() {
    let key = pair("exclusive").public_key.to_string();
    assert!(AuthorizationDescriptor::from_parts(Some(key.as_str()), None, None, None, None).is_ok());
    assert!(AuthorizationDescriptor::from_parts(Some(key.as_str()), Some("$ZRA+0000"), None, None, None).is_err());
    assert!(AuthorizationDescriptor::from_parts(None, None, None, None, None).is_err());
}

#[tokio::test]
async fn test_multi_key_vote() {
    let a = ed25519_from_phrase("multi a", HashToken::Sha3_256).unwrap();
    let b = ed448_from_phrase("multi b", HashToken::Sha3_256).unwrap();
    let group = MultiKeyGroup {
        keys: vec![
            MultiKeyEntry { class: 1, key: a.public_key.clone() },
            MultiKeyEntry { class: 2, key: b.public_key.clone() },
        ],
        patterns: vec![vec![PatternEntry { class: 1, required: 1 }, PatternEntry { class: 2, required: 1 }]],
        hash_tokens: vec![HashToken::Blake3],
    };
    let signers = vec![
        SigningKey::for_public_key(&a.public_key, &a.private_key_base58()).unwrap(),
        SigningKey::for_public_key(&b.public_key, &b.private_key_base58()).unwrap(),
    ];
    let creds = Credentials::new(AuthorizationDescriptor::multi(group).unwrap(), signers);
    let nonces = pinned(vec![2]);
    let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("0.02").unwrap());
    let vote = Vote {
        contract_id: "$ZRA+0000".into(),
        proposal_id: "ab".repeat(32),
        support: Some(true),
        option: None,
    };

    let ready = build_vote(ctx, &vote).await.unwrap();
    let base = ready.message().base.as_ref().unwrap();
    let multi = base.public_key.as_ref().unwrap().multi.as_ref().unwrap();
    assert_eq!(multi.signatures.len(), 2);
    assert!(base.signature.is_empty());
    let keys: Vec<KeyText> = vec![a.public_key, b.public_key];
    verify_signatures(&ready, &keys).unwrap();
}
