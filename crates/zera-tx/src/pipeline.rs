//! The build path shared by every single-signer family.
//!
//! Credentials and privilege are checked before any network call. Then the
//! asset scale and nonce are resolved, the family payload is assembled on a
//! fresh envelope, and the result goes through [`sign_slots_and_hash`].

use crate::auth::require_restricted;
use crate::envelope::{Envelope, FeeSpec};
use crate::sign::{sign_slots_and_hash, Credentials, ReadyTransaction, TxnEnvelope};
use crate::TxError;
use zera_rpc::{resolve_nonces, resolve_scale, NodeClient, NodeConfig, NonceConfig, ScaleConfig};
use zera_types::Scale;

/// Privilege a family demands of its authorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Any,
    /// Restricted key, or a governance/inheritance/smart-contract reference.
    Restricted(&'static str),
}

/// Inputs common to every single-signer build.
#[derive(Debug)]
pub struct BuildContext<'a> {
    pub nonces: &'a NonceConfig,
    pub credentials: &'a Credentials,
    pub fee: FeeSpec,
    pub memo: Option<&'a str>,
}

impl<'a> BuildContext<'a> {
    pub fn new(nonces: &'a NonceConfig, credentials: &'a Credentials, fee: FeeSpec) -> Self {
        Self {
            nonces,
            credentials,
            fee,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: &'a str) -> Self {
        self.memo = Some(memo);
        self
    }
}

pub async fn resolve_asset_scale(config: &ScaleConfig) -> Result<Scale, TxError> {
    resolve_scale(config).await.map_err(TxError::Scale)
}

/// Resolve a batch expecting exactly `expected` nonces.
pub async fn resolve_exact(config: &NonceConfig, expected: usize) -> Result<Vec<u64>, TxError> {
    let nonces = resolve_nonces(config).await.map_err(TxError::Nonce)?;
    if nonces.len() != expected {
        return Err(TxError::invalid(
            "nonces",
            format!("expected {} nonce(s), got {}", expected, nonces.len()),
        ));
    }
    Ok(nonces)
}

/// Check credentials and privilege without touching the network.
pub fn authorize(credentials: &Credentials, privilege: Privilege) -> Result<(), TxError> {
    credentials.validate()?;
    if let Privilege::Restricted(operation) = privilege {
        require_restricted(&credentials.descriptor, operation)?;
    }
    Ok(())
}

/// Run a single-signer build with `assemble` supplying the family payload.
pub async fn build_transaction<T, F>(
    ctx: BuildContext<'_>,
    privilege: Privilege,
    assemble: F,
) -> Result<ReadyTransaction<T>, TxError>
where
    T: TxnEnvelope,
    F: FnOnce(Envelope) -> Result<T, TxError>,
{
    authorize(ctx.credentials, privilege)?;
    let public_key = ctx.credentials.descriptor.to_public_key()?;

    let nonce = resolve_exact(ctx.nonces, 1).await?[0];
    log::debug!("{} using nonce {}", ctx.credentials.descriptor, nonce);

    let envelope = Envelope::new(Some(public_key), nonce, ctx.fee).with_memo(ctx.memo);
    let txn = assemble(envelope)?;
    sign_slots_and_hash(txn, ctx.credentials.signature_slots())
}

/// Submit a built transaction to a validator's transaction service.
pub async fn submit<T: TxnEnvelope>(
    validator: &str,
    config: &NodeConfig,
    ready: ReadyTransaction<T>,
) -> Result<(), TxError> {
    let hash = ready.hash_hex();
    let client = NodeClient::connect_txn(validator, config).await?;
    client.submit(T::METHOD, ready.into_message()).await?;
    log::info!("transaction {} accepted by {}", hash, client.addr());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthorizationDescriptor;
    use zera_crypto::keys::ed25519_from_phrase;
    use zera_rpc::RpcConfig;
    use zera_types::proto::MintTxn;
    use zera_types::HashToken;

    const PHRASE: &str =
        "crumble tattoo grape hurry pizza inject remind play believe museum thing mosquito";

    fn credentials(restricted: bool) -> Credentials {
        let pair = ed25519_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let text = if restricted {
            format!("r_{}", pair.public_key)
        } else {
            pair.public_key.to_string()
        };
        Credentials::single(&text, &pair.private_key_base58()).unwrap()
    }

    fn fixed_nonce(nonce: u64) -> NonceConfig {
        NonceConfig::indexer(RpcConfig::default(), vec!["addr".into()]).with_overrides(vec![nonce])
    }

    fn mint(envelope: Envelope) -> Result<MintTxn, TxError> {
        Ok(MintTxn {
            base: Some(envelope.into_base()),
            contract_id: "$ZRA+0000".into(),
            amount: "1".into(),
            recipient_address: vec![2; 32],
        })
    }

    #[tokio::test]
    async fn test_build_uses_resolved_nonce() {
        let creds = credentials(true);
        let nonces = fixed_nonce(42);
        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("0.1").unwrap()).with_memo("hi");
        let ready = build_transaction(ctx, Privilege::Restricted("mint"), mint).await.unwrap();
        let base = ready.message().base.as_ref().unwrap();
        assert_eq!(base.nonce, 42);
        assert_eq!(base.memo.as_deref(), Some("hi"));
        assert_eq!(base.fee_amount, "100000000");
    }

    #[tokio::test]
    async fn test_unrestricted_key_rejected_before_network() {
        let creds = credentials(false);
        // No overrides and an unreachable indexer: any network call would fail differently.
        let nonces = NonceConfig::indexer(RpcConfig::new("http://127.0.0.1:1", "k"), vec!["a".into()]);
        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("0.1").unwrap());
        let err = build_transaction(ctx, Privilege::Restricted("mint"), mint).await.unwrap_err();
        assert!(matches!(err, TxError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_nonce_count_must_be_one() {
        let creds = credentials(false);
        let nonces = NonceConfig::indexer(RpcConfig::default(), vec!["a".into(), "b".into()])
            .with_overrides(vec![1, 2]);
        let ctx = BuildContext::new(&nonces, &creds, FeeSpec::zra("0.1").unwrap());
        let err = build_transaction(ctx, Privilege::Any, mint).await.unwrap_err();
        assert!(matches!(err, TxError::InvalidInput { ref field, .. } if field == "nonces"));
    }

    #[test]
    fn test_reference_descriptors_pass_restricted_check() {
        let gov = Credentials::unsigned(AuthorizationDescriptor::governance("$ZRA+0000").unwrap());
        authorize(&gov, Privilege::Restricted("mint")).unwrap();
    }
}
