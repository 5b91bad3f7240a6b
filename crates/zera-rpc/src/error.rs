//! RPC error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error calling {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("authentication failed at {url}")]
    AuthFailed { url: String },

    #[error("malformed response for {context}: {body:?}")]
    InvalidResponse { context: String, body: String },

    #[error("contract with symbol {0} does not exist")]
    ContractNotFound(String),

    #[error("{symbol} is {kind} and has no denomination (always 1 part)")]
    Undenominated { symbol: String, kind: String },

    #[error("invalid validator address {addr:?}: {message}")]
    InvalidEndpoint { addr: String, message: String },

    #[error("failed to connect to validator {addr}: {message}")]
    Connection { addr: String, message: String },

    #[error("{method} failed: {status}")]
    Grpc {
        method: &'static str,
        status: Box<tonic::Status>,
    },

    #[error("invalid address {address:?}: {message}")]
    InvalidAddress { address: String, message: String },

    #[error("request timed out: {context}")]
    Timeout { context: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("worker task failed: {0}")]
    Task(String),
}

impl RpcError {
    /// True for the validator's "address not yet known" answer.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Grpc { status, .. } => status.message().contains("does not exist"),
            _ => false,
        }
    }

    /// True for errors caused by the network rather than the request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Connection { .. } | Self::Timeout { .. }
        ) || matches!(self, Self::HttpStatus { status, .. } if *status >= 500)
    }
}
