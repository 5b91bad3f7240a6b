//! ZERA network clients.
//!
//! Provides the async HTTP client for the ZERA indexer, the gRPC client for
//! validators, concurrent nonce resolution over either of them, and asset
//! scale lookup.
//!
//! # Example
//!
//! ```ignore
//! use zera_rpc::{resolve_nonces, NonceConfig, RpcConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = NonceConfig::indexer(
//!         RpcConfig::new("https://indexer.zera.vision", "api-key"),
//!         vec!["8ZfvifzSPMhhhivnH6NtaBXcmF3vsSaiB8KBULTetBcR".into()],
//!     );
//!     let nonces = resolve_nonces(&config).await.unwrap();
//!     println!("next nonce: {}", nonces[0]);
//! }
//! ```

pub mod error;
pub mod indexer;
pub mod node;
pub mod nonce;
pub mod scale;

pub use error::RpcError;
pub use indexer::{IndexerClient, RpcConfig};
pub use node::{methods, NodeClient, NodeConfig};
pub use nonce::{resolve_nonces, resolve_with, NonceConfig, NonceMode, NonceSource};
pub use scale::{resolve_scale, ScaleConfig, ScaleSource};
