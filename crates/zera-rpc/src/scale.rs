//! Asset scale (parts per whole unit) resolution.

use crate::error::RpcError;
use crate::indexer::{IndexerClient, RpcConfig};
use zera_types::Scale;

/// Where the scale of an asset comes from.
#[derive(Debug, Clone)]
pub enum ScaleSource {
    /// Look the contract up on the indexer.
    Indexer(RpcConfig),
    /// Use a known scale without any lookup.
    Override(Scale),
}

#[derive(Debug, Clone)]
pub struct ScaleConfig {
    pub symbol: String,
    pub source: ScaleSource,
}

impl ScaleConfig {
    pub fn indexer(symbol: &str, config: RpcConfig) -> Self {
        Self {
            symbol: symbol.to_string(),
            source: ScaleSource::Indexer(config),
        }
    }

    pub fn fixed(symbol: &str, scale: Scale) -> Self {
        Self {
            symbol: symbol.to_string(),
            source: ScaleSource::Override(scale),
        }
    }
}

/// Resolve the scale of `config.symbol`.
///
/// Validators do not expose contract lookups, so only the indexer or an
/// explicit override can answer.
pub async fn resolve_scale(config: &ScaleConfig) -> Result<Scale, RpcError> {
    if config.symbol.is_empty() {
        return Err(RpcError::Config("symbol is required".into()));
    }
    match &config.source {
        ScaleSource::Override(scale) => Ok(scale.clone()),
        ScaleSource::Indexer(rpc) => {
            let client = IndexerClient::with_config(rpc.clone())?;
            let scale = client.contract_scale(&config.symbol).await?;
            log::debug!("{} has {} parts per unit", config.symbol, scale);
            Ok(scale)
        }
    }
}
