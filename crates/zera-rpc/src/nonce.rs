//! Concurrent nonce resolution.
//!
//! A transaction may need nonces for several addresses at once (the signer
//! plus every allowance grantor). Lookups run concurrently, bounded by a
//! semaphore, and results are returned in input order. The first failure
//! cancels the remaining lookups and fails the batch.

use crate::error::RpcError;
use crate::indexer::{IndexerClient, RpcConfig};
use crate::node::{NodeClient, NodeConfig};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use zera_types::constants::{DEFAULT_NONCE_IN_FLIGHT, GOVERNANCE_PREFIX, MIN_NONCE_IN_FLIGHT};

/// Anything that can answer "what nonce should this address use next".
#[async_trait]
pub trait NonceSource: Send + Sync {
    async fn next_nonce(&self, address: &str) -> Result<u64, RpcError>;
}

#[async_trait]
impl NonceSource for IndexerClient {
    async fn next_nonce(&self, address: &str) -> Result<u64, RpcError> {
        IndexerClient::next_nonce(self, address).await
    }
}

#[async_trait]
impl NonceSource for NodeClient {
    async fn next_nonce(&self, address: &str) -> Result<u64, RpcError> {
        NodeClient::next_nonce(self, address).await
    }
}

/// Where nonces are looked up.
#[derive(Debug, Clone)]
pub enum NonceMode {
    Indexer(RpcConfig),
    Validator { addr: String, config: NodeConfig },
}

/// A batch nonce lookup.
#[derive(Debug, Clone)]
pub struct NonceConfig {
    pub mode: NonceMode,
    pub addresses: Vec<String>,
    /// Returned verbatim, without any lookup, when non-empty. Must hold one
    /// nonce per address.
    pub overrides: Vec<u64>,
    /// Maximum concurrent lookups (at least 2).
    pub max_in_flight: usize,
    /// Per-lookup deadline.
    pub deadline: Option<Duration>,
}

impl NonceConfig {
    pub fn indexer(config: RpcConfig, addresses: Vec<String>) -> Self {
        Self {
            mode: NonceMode::Indexer(config),
            addresses,
            overrides: Vec::new(),
            max_in_flight: DEFAULT_NONCE_IN_FLIGHT,
            deadline: None,
        }
    }

    pub fn validator(addr: &str, addresses: Vec<String>) -> Self {
        Self {
            mode: NonceMode::Validator {
                addr: addr.to_string(),
                config: NodeConfig::default(),
            },
            addresses,
            overrides: Vec::new(),
            max_in_flight: DEFAULT_NONCE_IN_FLIGHT,
            deadline: None,
        }
    }

    pub fn with_overrides(mut self, overrides: Vec<u64>) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Resolve the next nonce of every configured address, in order.
///
/// Governance addresses resolve to 0 without a lookup. When every address is
/// a governance address no connection is made at all.
pub async fn resolve_nonces(config: &NonceConfig) -> Result<Vec<u64>, RpcError> {
    if !config.overrides.is_empty() {
        if config.overrides.len() != config.addresses.len() {
            return Err(RpcError::Config(format!(
                "{} nonce override(s) for {} address(es)",
                config.overrides.len(),
                config.addresses.len()
            )));
        }
        return Ok(config.overrides.clone());
    }
    check_in_flight(config.max_in_flight)?;
    if config.addresses.is_empty() {
        return Err(RpcError::Config("at least one address is required".into()));
    }
    if config.addresses.iter().all(|a| a.starts_with(GOVERNANCE_PREFIX)) {
        return Ok(vec![0; config.addresses.len()]);
    }

    let source: Arc<dyn NonceSource> = match &config.mode {
        NonceMode::Indexer(rpc) => Arc::new(IndexerClient::with_config(rpc.clone())?),
        NonceMode::Validator { addr, config } => Arc::new(NodeClient::connect_api(addr, config).await?),
    };

    resolve_with(source, &config.addresses, config.max_in_flight, config.deadline).await
}

fn check_in_flight(max_in_flight: usize) -> Result<(), RpcError> {
    if max_in_flight < MIN_NONCE_IN_FLIGHT {
        return Err(RpcError::Config(format!(
            "max_in_flight must be at least {}, got {}",
            MIN_NONCE_IN_FLIGHT, max_in_flight
        )));
    }
    Ok(())
}

/// Resolve nonces for `addresses` against an arbitrary source.
pub async fn resolve_with(
    source: Arc<dyn NonceSource>,
    addresses: &[String],
    max_in_flight: usize,
    deadline: Option<Duration>,
) -> Result<Vec<u64>, RpcError> {
    check_in_flight(max_in_flight)?;
    let mut slots: Vec<Option<u64>> = vec![None; addresses.len()];
    let semaphore = Arc::new(Semaphore::new(max_in_flight));
    let mut join_set = JoinSet::new();

    for (index, address) in addresses.iter().enumerate() {
        if address.starts_with(GOVERNANCE_PREFIX) {
            slots[index] = Some(0);
            continue;
        }

        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        let address = address.clone();

        join_set.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return (index, Err(RpcError::Task("nonce semaphore closed".into()))),
            };
            let lookup = source.next_nonce(&address);
            let result = match deadline {
                Some(limit) => match tokio::time::timeout(limit, lookup).await {
                    Ok(result) => result,
                    Err(_) => Err(RpcError::Timeout {
                        context: format!("nonce of {}", address),
                    }),
                },
                None => lookup.await,
            };
            (index, result)
        });
    }

    log::debug!(
        "resolving {} nonces with at most {} in flight",
        join_set.len(),
        max_in_flight
    );

    while let Some(joined) = join_set.join_next().await {
        let (index, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                join_set.abort_all();
                return Err(RpcError::Task(e.to_string()));
            }
        };
        match result {
            Ok(nonce) => slots[index] = Some(nonce),
            Err(e) => {
                log::warn!("nonce lookup for {} failed: {}", addresses[index], e);
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| RpcError::Task(format!("no nonce resolved for {}", addresses[index])))
        })
        .collect()
}
