//! Live checks against a ZERA network.
//!
//! Ignored by default. Run with:
//!   ZERA_INDEXER_URL=... ZERA_INDEXER_AUTH=... ZERA_TEST_ADDRESS=... \
//!   cargo test -p zera-rpc --test testnet -- --ignored

use zera_rpc::{resolve_nonces, resolve_scale, NonceConfig, RpcConfig, ScaleConfig};

fn indexer_config() -> Option<RpcConfig> {
    let auth = std::env::var("ZERA_INDEXER_AUTH").ok()?;
    let url = std::env::var("ZERA_INDEXER_URL")
        .unwrap_or_else(|_| zera_types::constants::DEFAULT_INDEXER_URL.to_string());
    Some(RpcConfig::new(&url, &auth))
}

#[tokio::test]
#[ignore]
async fn test_live_native_scale() {
    let Some(config) = indexer_config() else {
        eprintln!("ZERA_INDEXER_AUTH not set, skipping");
        return;
    };
    let scale = resolve_scale(&ScaleConfig::indexer("$ZRA+0000", config))
        .await
        .unwrap();
    assert_eq!(scale.to_string(), "1000000000");
}

#[tokio::test]
#[ignore]
async fn test_live_indexer_nonce() {
    let (Some(config), Ok(address)) = (indexer_config(), std::env::var("ZERA_TEST_ADDRESS")) else {
        eprintln!("ZERA_INDEXER_AUTH / ZERA_TEST_ADDRESS not set, skipping");
        return;
    };
    let nonces = resolve_nonces(&NonceConfig::indexer(config, vec![address]))
        .await
        .unwrap();
    assert_eq!(nonces.len(), 1);
    assert!(nonces[0] >= 1);
}

#[tokio::test]
#[ignore]
async fn test_live_validator_nonce() {
    let (Ok(validator), Ok(address)) = (
        std::env::var("ZERA_VALIDATOR"),
        std::env::var("ZERA_TEST_ADDRESS"),
    ) else {
        eprintln!("ZERA_VALIDATOR / ZERA_TEST_ADDRESS not set, skipping");
        return;
    };
    let nonces = resolve_nonces(&NonceConfig::validator(&validator, vec![address]))
        .await
        .unwrap();
    assert!(nonces[0] >= 1);
}
