//! Two-phase sign-and-hash pipeline.
//!
//! The unsigned message is serialized exactly once and every signer signs
//! those same bytes, in authorization order. The signatures are attached,
//! the message is serialized again, and the SHA3-256 of that encoding
//! becomes the transaction hash. The result is a [`ReadyTransaction`],
//! which offers no mutable access.

use crate::auth::AuthorizationDescriptor;
use crate::TxError;
use prost::Message;
use zera_crypto::{sha3_256, Algorithm, CryptoError};
use zera_rpc::methods;
use zera_types::base58;
use zera_types::constants::HASH_SIZE;
use zera_types::proto::{
    AllowanceTxn, BaseTxn, CoinTxn, ComplianceTxn, ContractUpdateTxn, ExpenseRatioTxn,
    GovernanceProposal, GovernanceVote, InstrumentContract, ItemizedMintTxn, MintTxn, NftTxn,
    SelfCurrencyEquiv, TransactionType,
};
use zera_types::KeyText;
use zeroize::Zeroizing;

// =============================================================================
// Signing Keys
// =============================================================================

/// A raw private key tagged with its algorithm.
pub struct SigningKey {
    algorithm: Algorithm,
    private_key: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    pub fn new(algorithm: Algorithm, private_key: Vec<u8>) -> Result<Self, TxError> {
        let private_key = Zeroizing::new(private_key);
        if private_key.len() != algorithm.private_key_len() {
            return Err(CryptoError::InvalidPrivateKeyLength {
                algorithm,
                expected: algorithm.private_key_len(),
                actual: private_key.len(),
            }
            .into());
        }
        Ok(Self {
            algorithm,
            private_key,
        })
    }

    pub fn from_base58(algorithm: Algorithm, text: &str) -> Result<Self, TxError> {
        let raw = base58::decode_private_key(text).map_err(|e| TxError::invalid("private_key", e))?;
        Self::new(algorithm, raw)
    }

    /// Decode a base58 private key for the algorithm named by `public_key`.
    pub fn for_public_key(public_key: &KeyText, text: &str) -> Result<Self, TxError> {
        let algorithm = Algorithm::for_key(public_key)?;
        Self::from_base58(algorithm, text)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TxError> {
        Ok(zera_crypto::sign(self.algorithm, &self.private_key, payload)?)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Who authorizes a transaction and the private keys that sign for them.
#[derive(Debug)]
pub struct Credentials {
    pub descriptor: AuthorizationDescriptor,
    /// Signing keys in descriptor key order.
    pub signers: Vec<SigningKey>,
    /// Multi-key index each signer signs for, ascending. Empty means signer
    /// `i` signs key `i`.
    pub key_slots: Vec<usize>,
}

impl Credentials {
    pub fn new(descriptor: AuthorizationDescriptor, signers: Vec<SigningKey>) -> Self {
        Self {
            descriptor,
            signers,
            key_slots: Vec::new(),
        }
    }

    /// A multi-key group signed by an arbitrary subset of its keys, each
    /// signer paired with the index of the key it signs for.
    pub fn multi_subset(descriptor: AuthorizationDescriptor, signers: Vec<(usize, SigningKey)>) -> Self {
        let (key_slots, signers) = signers.into_iter().unzip();
        Self {
            descriptor,
            signers,
            key_slots,
        }
    }

    /// Signers laid out by key position; `None` marks a key that does not sign.
    pub fn signature_slots(&self) -> Vec<Option<&SigningKey>> {
        if self.key_slots.is_empty() {
            return self.signers.iter().map(Some).collect();
        }
        let len = self.key_slots.iter().max().map_or(0, |last| last + 1);
        let mut slots = vec![None; len];
        for (&slot, signer) in self.key_slots.iter().zip(&self.signers) {
            slots[slot] = Some(signer);
        }
        slots
    }

    fn slot_of(&self, signer: usize) -> usize {
        self.key_slots.get(signer).copied().unwrap_or(signer)
    }

    /// A single textual public key and its base58 private key.
    pub fn single(public_key: &str, private_key: &str) -> Result<Self, TxError> {
        let key = KeyText::parse(public_key).map_err(|e| TxError::InvalidDescriptor(e.to_string()))?;
        let signer = SigningKey::for_public_key(&key, private_key)?;
        Ok(Self::new(AuthorizationDescriptor::Single(key), vec![signer]))
    }

    /// Governance and smart-contract authorizations carry no local key.
    pub fn unsigned(descriptor: AuthorizationDescriptor) -> Self {
        Self::new(descriptor, Vec::new())
    }

    /// Check signer count and algorithms against the descriptor.
    pub fn validate(&self) -> Result<(), TxError> {
        if !self.key_slots.is_empty() {
            self.validate_key_slots()?;
        }
        match &self.descriptor {
            AuthorizationDescriptor::Single(_) | AuthorizationDescriptor::Multi(_) => {
                let keys = self.descriptor.signing_keys()?;
                let too_many = self.signers.len() > keys.len();
                let exact = matches!(self.descriptor, AuthorizationDescriptor::Single(_));
                if self.signers.is_empty() || too_many || (exact && self.signers.len() != 1) {
                    return Err(TxError::Authorization(format!(
                        "{} expects {} signer(s), got {}",
                        self.descriptor,
                        if exact { "1".to_string() } else { format!("1 to {}", keys.len()) },
                        self.signers.len()
                    )));
                }
                for (i, signer) in self.signers.iter().enumerate() {
                    let slot = self.slot_of(i);
                    let Some((key, algorithm)) = keys.get(slot) else {
                        return Err(TxError::Authorization(format!(
                            "signer {} targets key {} but {} has {} key(s)",
                            i,
                            slot,
                            self.descriptor,
                            keys.len()
                        )));
                    };
                    if signer.algorithm() != *algorithm {
                        return Err(TxError::Authorization(format!(
                            "signer {} is {} but key {} is {}",
                            i,
                            signer.algorithm(),
                            key,
                            algorithm
                        )));
                    }
                }
            }
            AuthorizationDescriptor::Inheritance(symbol) => {
                if self.signers.len() != 1 {
                    return Err(TxError::Authorization(format!(
                        "inherited {} expects 1 signer, got {}",
                        symbol,
                        self.signers.len()
                    )));
                }
            }
            AuthorizationDescriptor::Governance(_) | AuthorizationDescriptor::SmartContract { .. } => {
                if !self.signers.is_empty() {
                    return Err(TxError::Authorization(format!(
                        "{} is authorized on-chain and takes no signers",
                        self.descriptor
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_key_slots(&self) -> Result<(), TxError> {
        if !matches!(self.descriptor, AuthorizationDescriptor::Multi(_)) {
            return Err(TxError::Authorization(format!(
                "{} does not take key indices",
                self.descriptor
            )));
        }
        if self.key_slots.len() != self.signers.len() {
            return Err(TxError::Authorization(format!(
                "{} key indices for {} signer(s)",
                self.key_slots.len(),
                self.signers.len()
            )));
        }
        if self.key_slots.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(TxError::Authorization(format!(
                "key indices {:?} must be strictly ascending",
                self.key_slots
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Transaction Envelopes
// =============================================================================

/// A signable transaction message.
pub trait TxnEnvelope: Message + Clone + Default + Send + Sync + 'static {
    /// Submission method on the transaction service.
    const METHOD: &'static str;
    /// Type tag used when the transaction is embedded in a proposal.
    const TXN_TYPE: TransactionType;

    fn base(&self) -> Option<&BaseTxn>;

    fn base_mut(&mut self) -> &mut BaseTxn;

    /// Signatures in signing order.
    fn signatures(&self) -> Vec<Vec<u8>> {
        let Some(base) = self.base() else {
            return Vec::new();
        };
        match base.public_key.as_ref().and_then(|k| k.multi.as_ref()) {
            Some(multi) => multi.signatures.clone(),
            None if base.signature.is_empty() => Vec::new(),
            None => vec![base.signature.clone()],
        }
    }

    /// Multi-key groups hold one signature per signer; everything else a
    /// single base signature.
    fn set_signatures(&mut self, signatures: Vec<Vec<u8>>) {
        let base = self.base_mut();
        match base.public_key.as_mut().and_then(|k| k.multi.as_mut()) {
            Some(multi) => multi.signatures = signatures,
            None => base.signature = signatures.into_iter().next().unwrap_or_default(),
        }
    }
}

macro_rules! txn_envelope {
    ($msg:ty, $method:expr, $kind:expr) => {
        impl TxnEnvelope for $msg {
            const METHOD: &'static str = $method;
            const TXN_TYPE: TransactionType = $kind;

            fn base(&self) -> Option<&BaseTxn> {
                self.base.as_ref()
            }

            fn base_mut(&mut self) -> &mut BaseTxn {
                self.base.get_or_insert_with(BaseTxn::default)
            }
        }
    };
}

txn_envelope!(AllowanceTxn, methods::ALLOWANCE, TransactionType::AllowanceType);
txn_envelope!(MintTxn, methods::MINT, TransactionType::MintType);
txn_envelope!(ItemizedMintTxn, methods::ITEM_MINT, TransactionType::ItemMintType);
txn_envelope!(NftTxn, methods::NFT, TransactionType::NftType);
txn_envelope!(InstrumentContract, methods::CONTRACT, TransactionType::ContractTxnType);
txn_envelope!(ContractUpdateTxn, methods::CONTRACT_UPDATE, TransactionType::UpdateContractType);
txn_envelope!(GovernanceProposal, methods::GOVERN_PROPOSAL, TransactionType::ProposalType);
txn_envelope!(GovernanceVote, methods::GOVERN_VOTE, TransactionType::VoteType);
txn_envelope!(ComplianceTxn, methods::COMPLIANCE, TransactionType::ComplianceType);
txn_envelope!(ExpenseRatioTxn, methods::EXPENSE_RATIO, TransactionType::ExpenseRatioType);
txn_envelope!(SelfCurrencyEquiv, methods::CURRENCY_EQUIV, TransactionType::SelfCurrencyEquivType);

/// Transfer signatures live in the transfer authentication, one per wallet
/// input.
impl TxnEnvelope for CoinTxn {
    const METHOD: &'static str = methods::COIN;
    const TXN_TYPE: TransactionType = TransactionType::CoinType;

    fn base(&self) -> Option<&BaseTxn> {
        self.base.as_ref()
    }

    fn base_mut(&mut self) -> &mut BaseTxn {
        self.base.get_or_insert_with(BaseTxn::default)
    }

    fn signatures(&self) -> Vec<Vec<u8>> {
        self.auth
            .as_ref()
            .map(|auth| auth.signature.clone())
            .unwrap_or_default()
    }

    fn set_signatures(&mut self, signatures: Vec<Vec<u8>>) {
        self.auth.get_or_insert_with(Default::default).signature = signatures;
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// A signed, hashed transaction. Submit it once; rebuild to change anything.
#[derive(Debug, Clone)]
pub struct ReadyTransaction<T> {
    message: T,
    hash: [u8; HASH_SIZE],
}

impl<T: TxnEnvelope> ReadyTransaction<T> {
    pub fn message(&self) -> &T {
        &self.message
    }

    pub fn hash(&self) -> &[u8; HASH_SIZE] {
        &self.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Wire encoding including signatures and hash.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.message.encode_to_vec()
    }

    pub fn into_message(self) -> T {
        self.message
    }
}

/// Serialize, sign with every signer in order, attach, re-serialize and hash.
pub fn sign_and_hash<'a, T, I>(txn: T, signers: I) -> Result<ReadyTransaction<T>, TxError>
where
    T: TxnEnvelope,
    I: IntoIterator<Item = &'a SigningKey>,
{
    sign_slots_and_hash(txn, signers.into_iter().map(Some))
}

/// Like [`sign_and_hash`], with `None` leaving an empty signature in place
/// for a multi-key entry that does not sign.
pub fn sign_slots_and_hash<'a, T, I>(mut txn: T, signers: I) -> Result<ReadyTransaction<T>, TxError>
where
    T: TxnEnvelope,
    I: IntoIterator<Item = Option<&'a SigningKey>>,
{
    txn.set_signatures(Vec::new());
    txn.base_mut().hash.clear();

    let unsigned = txn.encode_to_vec();
    if unsigned.is_empty() {
        return Err(CryptoError::EmptyPayload.into());
    }

    let signatures = signers
        .into_iter()
        .map(|slot| match slot {
            Some(signer) => signer.sign(&unsigned),
            None => Ok(Vec::new()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("signed {} bytes with {} signer(s)", unsigned.len(), signatures.len());
    if !signatures.is_empty() {
        txn.set_signatures(signatures);
    }

    let hash = sha3_256(&txn.encode_to_vec());
    txn.base_mut().hash = hash.to_vec();
    log::info!("built {:?} transaction {}", T::TXN_TYPE, hex::encode(hash));

    Ok(ReadyTransaction { message: txn, hash })
}

/// Check the hash and every signature of a built transaction.
///
/// `public_keys` are the signing keys in signature order. In a multi-key
/// signature list an empty entry marks a key that did not sign.
pub fn verify_signatures<T: TxnEnvelope>(
    ready: &ReadyTransaction<T>,
    public_keys: &[KeyText],
) -> Result<(), TxError> {
    let signatures = ready.message.signatures();
    if signatures.len() != public_keys.len() {
        return Err(TxError::Authorization(format!(
            "{} signature(s) for {} key(s)",
            signatures.len(),
            public_keys.len()
        )));
    }

    let mut stripped = ready.message.clone();
    stripped.base_mut().hash.clear();
    if sha3_256(&stripped.encode_to_vec()) != ready.hash {
        return Err(TxError::Authorization("transaction hash does not match its contents".into()));
    }

    stripped.set_signatures(Vec::new());
    let unsigned = stripped.encode_to_vec();
    for (key, signature) in public_keys.iter().zip(&signatures) {
        if signature.is_empty() && signatures.len() > 1 {
            continue;
        }
        let algorithm = Algorithm::for_key(key)?;
        zera_crypto::verify(algorithm, key.raw(), &unsigned, signature)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MultiKeyEntry, MultiKeyGroup, PatternEntry};
    use zera_crypto::keys::{ed25519_from_phrase, ed448_from_phrase};
    use zera_crypto::KeyPair;
    use zera_types::proto::MintTxn;
    use zera_types::HashToken;

    const PHRASE: &str =
        "crumble tattoo grape hurry pizza inject remind play believe museum thing mosquito";

    fn mint_for(descriptor: &AuthorizationDescriptor) -> MintTxn {
        MintTxn {
            base: Some(BaseTxn {
                public_key: Some(descriptor.to_public_key().unwrap()),
                fee_amount: "1000".into(),
                fee_id: "$ZRA+0000".into(),
                nonce: 3,
                ..Default::default()
            }),
            contract_id: "$ZRA+0000".into(),
            amount: "500".into(),
            recipient_address: vec![1; 32],
        }
    }

    fn single() -> (KeyText, SigningKey) {
        let pair = ed25519_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let signer = SigningKey::new(Algorithm::Ed25519, pair.private_key.to_vec()).unwrap();
        (pair.public_key, signer)
    }

    #[test]
    fn test_single_sign_and_verify() {
        let (public, signer) = single();
        let descriptor = AuthorizationDescriptor::Single(public.clone());
        let ready = sign_and_hash(mint_for(&descriptor), &[signer]).unwrap();

        assert_eq!(ready.message().signatures().len(), 1);
        assert_eq!(ready.message().base.as_ref().unwrap().hash, ready.hash().to_vec());
        verify_signatures(&ready, &[public]).unwrap();
    }

    #[test]
    fn test_reserialization_is_stable() {
        let (public, signer) = single();
        let ready = sign_and_hash(mint_for(&AuthorizationDescriptor::Single(public)), &[signer]).unwrap();
        assert_eq!(ready.to_bytes(), ready.to_bytes());
        let decoded = MintTxn::decode(ready.to_bytes().as_slice()).unwrap();
        assert_eq!(&decoded, ready.message());
        assert_eq!(ready.hash_hex().len(), 64);
    }

    #[test]
    fn test_tampering_breaks_verification() {
        let (public, signer) = single();
        let ready = sign_and_hash(mint_for(&AuthorizationDescriptor::Single(public.clone())), &[signer]).unwrap();
        let mut message = ready.clone().into_message();
        message.amount = "501".into();
        let tampered = ReadyTransaction {
            message,
            hash: *ready.hash(),
        };
        assert!(verify_signatures(&tampered, &[public]).is_err());
    }

    #[test]
    fn test_multi_signatures_in_key_order() {
        let a = ed25519_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let b = ed448_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let group = MultiKeyGroup {
            keys: vec![
                MultiKeyEntry { class: 1, key: a.public_key.clone() },
                MultiKeyEntry { class: 2, key: b.public_key.clone() },
            ],
            patterns: vec![vec![
                PatternEntry { class: 1, required: 1 },
                PatternEntry { class: 2, required: 1 },
            ]],
            hash_tokens: vec![HashToken::Blake3, HashToken::Sha3_256],
        };
        let descriptor = AuthorizationDescriptor::multi(group).unwrap();
        let signers = vec![
            SigningKey::new(Algorithm::Ed25519, a.private_key.to_vec()).unwrap(),
            SigningKey::new(Algorithm::Ed448, b.private_key.to_vec()).unwrap(),
        ];
        let credentials = Credentials::new(descriptor.clone(), signers);
        credentials.validate().unwrap();

        let ready = sign_and_hash(mint_for(&descriptor), &credentials.signers).unwrap();
        let base = ready.message().base.as_ref().unwrap();
        assert!(base.signature.is_empty());
        assert_eq!(ready.message().signatures().len(), 2);
        verify_signatures(&ready, &[a.public_key.clone(), b.public_key.clone()]).unwrap();
        assert!(verify_signatures(&ready, &[b.public_key, a.public_key]).is_err());
    }

    fn mixed_group() -> (KeyPair, KeyPair, AuthorizationDescriptor) {
        let a = ed25519_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let b = ed448_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let group = MultiKeyGroup {
            keys: vec![
                MultiKeyEntry { class: 1, key: a.public_key.clone() },
                MultiKeyEntry { class: 2, key: b.public_key.clone() },
            ],
            patterns: vec![vec![PatternEntry { class: 2, required: 1 }]],
            hash_tokens: vec![HashToken::Blake3],
        };
        let descriptor = AuthorizationDescriptor::multi(group).unwrap();
        (a, b, descriptor)
    }

    #[test]
    fn test_multi_subset_signs_by_key_index() {
        let (a, b, descriptor) = mixed_group();
        let signer = SigningKey::new(Algorithm::Ed448, b.private_key.to_vec()).unwrap();
        let credentials = Credentials::multi_subset(descriptor.clone(), vec![(1, signer)]);
        credentials.validate().unwrap();

        let ready = sign_slots_and_hash(mint_for(&descriptor), credentials.signature_slots()).unwrap();
        let signatures = ready.message().signatures();
        assert_eq!(signatures.len(), 2);
        assert!(signatures[0].is_empty());
        assert_eq!(signatures[1].len(), 114);
        verify_signatures(&ready, &[a.public_key, b.public_key]).unwrap();
    }

    #[test]
    fn test_multi_subset_validation() {
        let (a, b, descriptor) = mixed_group();
        let ed25519 = || SigningKey::new(Algorithm::Ed25519, a.private_key.to_vec()).unwrap();
        let ed448 = || SigningKey::new(Algorithm::Ed448, b.private_key.to_vec()).unwrap();

        // Algorithm must match the key at the given index.
        let wrong = Credentials::multi_subset(descriptor.clone(), vec![(0, ed448())]);
        assert!(matches!(wrong.validate(), Err(TxError::Authorization(_))));

        let out_of_range = Credentials::multi_subset(descriptor.clone(), vec![(2, ed448())]);
        assert!(out_of_range.validate().is_err());

        let unordered = Credentials::multi_subset(descriptor.clone(), vec![(1, ed448()), (0, ed25519())]);
        assert!(unordered.validate().is_err());

        let single = Credentials::multi_subset(
            AuthorizationDescriptor::Single(a.public_key.clone()),
            vec![(0, ed25519())],
        );
        assert!(single.validate().is_err());

        let both = Credentials::multi_subset(descriptor, vec![(0, ed25519()), (1, ed448())]);
        both.validate().unwrap();
        assert_eq!(both.signature_slots().iter().filter(|s| s.is_some()).count(), 2);
    }

    #[test]
    fn test_credentials_validation() {
        let (public, _) = single();
        let ed448 = ed448_from_phrase(PHRASE, HashToken::Blake3).unwrap();
        let wrong = SigningKey::new(Algorithm::Ed448, ed448.private_key.to_vec()).unwrap();
        let creds = Credentials::new(AuthorizationDescriptor::Single(public.clone()), vec![wrong]);
        assert!(matches!(creds.validate(), Err(TxError::Authorization(_))));

        let none = Credentials::new(AuthorizationDescriptor::Single(public), Vec::new());
        assert!(none.validate().is_err());

        let gov = Credentials::unsigned(AuthorizationDescriptor::governance("$ZRA+0000").unwrap());
        gov.validate().unwrap();
    }

    #[test]
    fn test_private_key_length_checked() {
        assert!(matches!(
            SigningKey::new(Algorithm::Ed25519, vec![0; 32]),
            Err(TxError::Crypto(CryptoError::InvalidPrivateKeyLength { .. }))
        ));
        assert!(SigningKey::new(Algorithm::Ed448, vec![0; 64]).is_err());
    }

    #[test]
    fn test_unsigned_governance_transaction() {
        let descriptor = AuthorizationDescriptor::governance("$ZRA+0000").unwrap();
        let ready = sign_and_hash(mint_for(&descriptor), std::iter::empty::<&SigningKey>()).unwrap();
        assert!(ready.message().signatures().is_empty());
        verify_signatures(&ready, &[]).unwrap();
    }
}
