//! Async HTTP client for the ZERA indexer.
//!
//! The indexer exposes a single `/store` endpoint selected by the
//! `requestType` query parameter. Every request carries `Target: indexer`
//! and an `Authorization` header built from the configured credential.

use crate::error::RpcError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use zera_types::constants::DEFAULT_INDEXER_URL;
use zera_types::Scale;

/// Configuration for an indexer client.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Base URL (e.g., `https://indexer.zera.vision`).
    pub url: String,
    /// API key, or a bearer token when it contains a `.`.
    pub authorization: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Number of retry attempts on transient failure. Zero surfaces the
    /// first network error to the caller.
    pub retries: u32,
    /// Initial delay between retries (doubles each attempt).
    pub retry_delay: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEXER_URL.to_string(),
            authorization: String::new(),
            timeout: Duration::from_secs(30),
            retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RpcConfig {
    pub fn new(url: &str, authorization: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            authorization: authorization.to_string(),
            ..Default::default()
        }
    }
}

/// Build the `Authorization` header value for an indexer credential.
///
/// JWT-style tokens (anything containing `.`) are sent as `Bearer`, plain
/// keys as `Api-Key`.
pub fn authorization_value(credential: &str) -> String {
    if credential.contains('.') {
        format!("Bearer {}", credential)
    } else {
        format!("Api-Key {}", credential)
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ContractGlance {
    #[serde(default)]
    supply_info: SupplyInfo,
    #[serde(default)]
    token_info: TokenInfo,
}

#[derive(Deserialize, Default)]
struct SupplyInfo {
    #[serde(default)]
    parts: Option<Value>,
}

#[derive(Deserialize, Default)]
struct TokenInfo {
    #[serde(default, rename = "type")]
    kind: String,
}

/// Async client for the ZERA indexer.
pub struct IndexerClient {
    client: reqwest::Client,
    config: RpcConfig,
}

impl IndexerClient {
    /// Create a client for `url` with the given credential.
    pub fn new(url: &str, authorization: &str) -> Result<Self, RpcError> {
        Self::with_config(RpcConfig::new(url, authorization))
    }

    /// Create a client with full configuration.
    pub fn with_config(config: RpcConfig) -> Result<Self, RpcError> {
        if config.url.is_empty() {
            return Err(RpcError::Config("indexer URL is required".into()));
        }
        if config.authorization.is_empty() {
            return Err(RpcError::Config(
                "indexer authorization (api key or bearer token) is required".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| RpcError::Http {
                url: config.url.clone(),
                source: e,
            })?;

        Ok(Self { client, config })
    }

    /// Get the configured base URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn build_headers(&self) -> Result<HeaderMap, RpcError> {
        let mut headers = HeaderMap::new();
        headers.insert("Target", HeaderValue::from_static("indexer"));
        let auth = HeaderValue::from_str(&authorization_value(&self.config.authorization))
            .map_err(|_| RpcError::Config("authorization contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    /// POST `/store?requestType=<request_type>&<key>=<value>` and return the body text.
    async fn store(&self, request_type: &str, key: &str, value: &str) -> Result<String, RpcError> {
        let attempts = self.config.retries + 1;
        let mut last_err = RpcError::Timeout {
            context: request_type.to_string(),
        };

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.config.retry_delay * 2u32.saturating_pow(attempt - 1);
                tokio::time::sleep(delay).await;
            }

            match self.do_store(request_type, key, value).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    let should_retry = e.is_transient() && attempt + 1 < attempts;
                    if !should_retry {
                        return Err(e);
                    }
                    log::debug!("{} attempt {} failed: {}", request_type, attempt + 1, e);
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    async fn do_store(&self, request_type: &str, key: &str, value: &str) -> Result<String, RpcError> {
        let url = format!("{}/store", self.config.url);
        let resp = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .query(&[("requestType", request_type), (key, value)])
            .send()
            .await
            .map_err(|e| RpcError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = resp.status().as_u16();

        if status == 401 || status == 403 {
            return Err(RpcError::AuthFailed { url });
        }

        let body = resp.text().await.map_err(|e| RpcError::Http {
            url: url.clone(),
            source: e,
        })?;

        if status >= 400 {
            // The indexer reports unknown contracts in an error body.
            if body.contains("does not exist") {
                return Ok(body);
            }
            return Err(RpcError::HttpStatus {
                url,
                status,
                body: body.chars().take(500).collect(),
            });
        }

        Ok(body)
    }

    /// Next nonce to use for `address`.
    ///
    /// The indexer answers with the plain decimal nonce.
    pub async fn next_nonce(&self, address: &str) -> Result<u64, RpcError> {
        let body = self.store("getNextNonce", "address", address).await?;
        body.trim()
            .parse::<u64>()
            .map_err(|_| RpcError::InvalidResponse {
                context: format!("nonce of {}", address),
                body: body.chars().take(200).collect(),
            })
    }

    /// Parts per whole unit of the asset with `symbol`.
    ///
    /// NFT and SBT contracts have no denomination and are rejected.
    pub async fn contract_scale(&self, symbol: &str) -> Result<Scale, RpcError> {
        if symbol.is_empty() {
            return Err(RpcError::Config("symbol is required".into()));
        }
        let body = self.store("getContractGlance", "symbol", symbol).await?;
        parse_contract_glance(symbol, &body)
    }
}

fn parse_contract_glance(symbol: &str, body: &str) -> Result<Scale, RpcError> {
    let glance: ContractGlance = match serde_json::from_str(body) {
        Ok(g) => g,
        Err(_) if body.contains("does not exist") => {
            return Err(RpcError::ContractNotFound(symbol.to_string()))
        }
        Err(e) => {
            return Err(RpcError::InvalidResponse {
                context: format!("contract glance of {}: {}", symbol, e),
                body: body.chars().take(200).collect(),
            })
        }
    };

    let kind = glance.token_info.kind.to_lowercase();
    if kind == "nft" || kind == "sbt" {
        return Err(RpcError::Undenominated {
            symbol: symbol.to_string(),
            kind,
        });
    }

    let parts = match &glance.supply_info.parts {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };
    Scale::parse(&parts).map_err(|e| RpcError::InvalidResponse {
        context: format!("parts of {}: {}", symbol, e),
        body: body.chars().take(200).collect(),
    })
}
