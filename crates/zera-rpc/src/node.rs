//! gRPC client for ZERA validators.
//!
//! Validators serve two plaintext gRPC services: the validator API (nonce
//! lookups, port 50051 by default) and the transaction service (submission,
//! port 50052 by default). Messages are the prost types from
//! [`zera_types::proto`]; submission replies are empty.

use crate::error::RpcError;
use std::time::Duration;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use zera_types::constants::{GOVERNANCE_PREFIX, VALIDATOR_API_PORT, VALIDATOR_TXN_PORT};
use zera_types::proto::{NonceRequest, NonceResponse};

/// Fully-qualified gRPC method paths.
pub mod methods {
    pub const NONCE: &str = "/zera_validator.ValidatorService/Nonce";

    pub const COIN: &str = "/zera_txn.TXNService/Coin";
    pub const ALLOWANCE: &str = "/zera_txn.TXNService/Allowance";
    pub const MINT: &str = "/zera_txn.TXNService/Mint";
    pub const ITEM_MINT: &str = "/zera_txn.TXNService/ItemMint";
    pub const NFT: &str = "/zera_txn.TXNService/NFT";
    pub const CONTRACT: &str = "/zera_txn.TXNService/Contract";
    pub const CONTRACT_UPDATE: &str = "/zera_txn.TXNService/ContractUpdate";
    pub const GOVERN_PROPOSAL: &str = "/zera_txn.TXNService/GovernProposal";
    pub const GOVERN_VOTE: &str = "/zera_txn.TXNService/GovernVote";
    pub const COMPLIANCE: &str = "/zera_txn.TXNService/Compliance";
    pub const EXPENSE_RATIO: &str = "/zera_txn.TXNService/ExpenseRatio";
    pub const CURRENCY_EQUIV: &str = "/zera_txn.TXNService/CurrencyEquiv";
}

/// Connection settings for a validator.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub connect_timeout: Duration,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Port appended to nonce lookups when the address has none.
    pub nonce_port: u16,
    /// Port appended to submissions when the address has none.
    pub txn_port: u16,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            nonce_port: VALIDATOR_API_PORT,
            txn_port: VALIDATOR_TXN_PORT,
        }
    }
}

/// Append `:port` when `addr` carries none, and an `http://` scheme when
/// it carries no scheme.
pub fn with_default_port(addr: &str, port: u16) -> String {
    let (scheme, host) = match addr.split_once("://") {
        Some((scheme, host)) => (scheme, host),
        None => ("http", addr),
    };
    if host.contains(':') {
        format!("{}://{}", scheme, host)
    } else {
        format!("{}://{}:{}", scheme, host.trim_end_matches('/'), port)
    }
}

/// A connected validator channel.
#[derive(Clone)]
pub struct NodeClient {
    addr: String,
    grpc: tonic::client::Grpc<Channel>,
}

impl NodeClient {
    /// Connect to `addr`, adding `default_port` when no port is given.
    pub async fn connect(addr: &str, default_port: u16, config: &NodeConfig) -> Result<Self, RpcError> {
        if addr.is_empty() {
            return Err(RpcError::Config("validator address is required".into()));
        }
        let target = with_default_port(addr, default_port);
        let endpoint = Endpoint::from_shared(target.clone())
            .map_err(|e| RpcError::InvalidEndpoint {
                addr: target.clone(),
                message: e.to_string(),
            })?
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout);

        let channel = endpoint.connect().await.map_err(|e| RpcError::Connection {
            addr: target.clone(),
            message: e.to_string(),
        })?;
        log::debug!("connected to validator {}", target);

        Ok(Self {
            addr: target,
            grpc: tonic::client::Grpc::new(channel),
        })
    }

    /// Connect to the validator API used for nonce lookups.
    pub async fn connect_api(addr: &str, config: &NodeConfig) -> Result<Self, RpcError> {
        Self::connect(addr, config.nonce_port, config).await
    }

    /// Connect to the transaction service used for submission.
    pub async fn connect_txn(addr: &str, config: &NodeConfig) -> Result<Self, RpcError> {
        Self::connect(addr, config.txn_port, config).await
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn unary<Req, Resp>(&self, method: &'static str, msg: Req) -> Result<Resp, RpcError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.grpc.clone();
        grpc.ready().await.map_err(|e| RpcError::Connection {
            addr: self.addr.clone(),
            message: e.to_string(),
        })?;

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(
                tonic::Request::new(msg),
                PathAndQuery::from_static(method),
                codec,
            )
            .await
            .map_err(|status| RpcError::Grpc {
                method,
                status: Box::new(status),
            })?;
        Ok(response.into_inner())
    }

    /// Submit a signed transaction to the given transaction-service method.
    pub async fn submit<M>(&self, method: &'static str, txn: M) -> Result<(), RpcError>
    where
        M: prost::Message + Send + Sync + 'static,
    {
        self.unary::<M, ()>(method, txn).await?;
        log::info!("submitted {} to {}", method, self.addr);
        Ok(())
    }

    /// Last nonce recorded for the raw wallet address bytes.
    pub async fn last_nonce(&self, wallet_address: Vec<u8>) -> Result<u64, RpcError> {
        let response: NonceResponse = self
            .unary(methods::NONCE, NonceRequest { wallet_address })
            .await?;
        Ok(response.nonce)
    }

    /// Next nonce to use for a textual address.
    ///
    /// Addresses the validator has never seen start at 1.
    pub async fn next_nonce(&self, address: &str) -> Result<u64, RpcError> {
        let wallet_address = nonce_request_address(address)?;
        match self.last_nonce(wallet_address).await {
            Ok(nonce) => following_nonce(address, nonce),
            Err(e) if e.is_not_found() => Ok(1),
            Err(e) => Err(e),
        }
    }
}

fn following_nonce(address: &str, last: u64) -> Result<u64, RpcError> {
    last.checked_add(1).ok_or_else(|| RpcError::InvalidResponse {
        context: format!("nonce of {}", address),
        body: format!("last nonce {} cannot be incremented", last),
    })
}

/// Wire bytes of an address for a nonce request.
///
/// Governance addresses are sent as their UTF-8 text.
pub fn nonce_request_address(address: &str) -> Result<Vec<u8>, RpcError> {
    if address.starts_with(GOVERNANCE_PREFIX) {
        return Ok(address.as_bytes().to_vec());
    }
    zera_types::base58::decode_address(address).map_err(|e| RpcError::InvalidAddress {
        address: address.to_string(),
        message: e.to_string(),
    })
}
