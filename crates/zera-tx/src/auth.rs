//! Authorization descriptors.
//!
//! A transaction is authorized by exactly one of: a single key, a
//! multi-key threshold group, another contract's key set (inheritance), a
//! governance process, or a smart-contract instance. Administrative
//! operations additionally require a restricted descriptor.

use crate::TxError;
use regex::Regex;
use std::sync::LazyLock;
use zera_crypto::Algorithm;
use zera_types::constants::{GOVERNANCE_PREFIX, SMART_CONTRACT_PREFIX};
use zera_types::proto::{MultiKey, MultiPatterns, PublicKey, RestrictedKey};
use zera_types::{HashToken, KeyText};

/// Contract symbols such as `$ZRA+0000`.
const SYMBOL_PATTERN: &str = r"^\$[A-Z]+\+\d{4}$";

static SYMBOL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(SYMBOL_PATTERN));

/// One key of a multi-key group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKeyEntry {
    pub class: u32,
    pub key: KeyText,
}

/// `required` signatures from keys of `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEntry {
    pub class: u32,
    pub required: u32,
}

/// A threshold group: keys, satisfiable patterns and hash-domain tokens.
///
/// Each pattern is one way of authorizing; every entry in it must be met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiKeyGroup {
    pub keys: Vec<MultiKeyEntry>,
    pub patterns: Vec<Vec<PatternEntry>>,
    pub hash_tokens: Vec<HashToken>,
}

impl MultiKeyGroup {
    /// Restricted groups lead with the `r` hash token.
    pub fn is_restricted(&self) -> bool {
        self.hash_tokens.first() == Some(&HashToken::Restricted)
    }

    fn validate(&self) -> Result<(), TxError> {
        if self.keys.is_empty() {
            return Err(TxError::InvalidDescriptor("multi-key group has no keys".into()));
        }
        if self.patterns.is_empty() {
            return Err(TxError::InvalidDescriptor("multi-key group has no patterns".into()));
        }
        for (i, pattern) in self.patterns.iter().enumerate() {
            if pattern.is_empty() {
                return Err(TxError::InvalidDescriptor(format!("pattern {} is empty", i)));
            }
            for entry in pattern {
                let available = self.keys.iter().filter(|k| k.class == entry.class).count();
                if available == 0 {
                    return Err(TxError::InvalidDescriptor(format!(
                        "pattern {} references class {} which has no keys",
                        i, entry.class
                    )));
                }
                if entry.required == 0 || entry.required as usize > available {
                    return Err(TxError::InvalidDescriptor(format!(
                        "pattern {} requires {} keys of class {} but {} exist",
                        i, entry.required, entry.class, available
                    )));
                }
            }
        }
        Ok(())
    }

    fn to_multi_key(&self) -> MultiKey {
        MultiKey {
            public_keys: self.keys.iter().map(|k| k.key.wire_bytes()).collect(),
            signatures: Vec::new(),
            multi_patterns: self
                .patterns
                .iter()
                .map(|pattern| MultiPatterns {
                    class: pattern.iter().map(|e| e.class).collect(),
                    required: pattern.iter().map(|e| e.required).collect(),
                })
                .collect(),
            hash_tokens: self.hash_tokens.iter().map(|t| t.as_str().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDescriptor {
    Single(KeyText),
    Multi(MultiKeyGroup),
    /// The key set of another contract, by symbol.
    Inheritance(String),
    /// Whatever the governance process of a contract authorizes, by symbol.
    Governance(String),
    SmartContract { name: String, instance: u32 },
}

pub(crate) fn check_symbol(symbol: &str) -> Result<(), TxError> {
    let pattern = SYMBOL
        .as_ref()
        .map_err(|e| TxError::InvalidDescriptor(e.to_string()))?;
    if !pattern.is_match(symbol) {
        return Err(TxError::InvalidDescriptor(format!(
            "{:?} must be in the format $LETTERS+0000 (with exactly 4 digits at the end)",
            symbol
        )));
    }
    Ok(())
}

impl AuthorizationDescriptor {
    /// Parse a single textual key (`[r_]A_c_...`).
    pub fn single(key: &str) -> Result<Self, TxError> {
        let key = KeyText::parse(key).map_err(|e| TxError::InvalidDescriptor(e.to_string()))?;
        Ok(Self::Single(key))
    }

    pub fn multi(group: MultiKeyGroup) -> Result<Self, TxError> {
        group.validate()?;
        Ok(Self::Multi(group))
    }

    pub fn inheritance(symbol: &str) -> Result<Self, TxError> {
        check_symbol(symbol)?;
        Ok(Self::Inheritance(symbol.to_string()))
    }

    pub fn governance(symbol: &str) -> Result<Self, TxError> {
        if symbol.is_empty() {
            return Err(TxError::InvalidDescriptor("governance symbol is empty".into()));
        }
        Ok(Self::Governance(symbol.to_string()))
    }

    pub fn smart_contract(name: &str, instance: u32) -> Result<Self, TxError> {
        if name.is_empty() {
            return Err(TxError::InvalidDescriptor("smart contract name is empty".into()));
        }
        Ok(Self::SmartContract {
            name: name.to_string(),
            instance,
        })
    }

    /// Build from the five optional caller inputs; exactly one must be set.
    pub fn from_parts(
        single: Option<&str>,
        inheritance: Option<&str>,
        multi: Option<MultiKeyGroup>,
        smart_contract: Option<(&str, u32)>,
        governance: Option<&str>,
    ) -> Result<Self, TxError> {
        let populated = [
            single.is_some(),
            inheritance.is_some(),
            multi.is_some(),
            smart_contract.is_some(),
            governance.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if populated != 1 {
            return Err(TxError::InvalidDescriptor(
                "exactly one of the public key options must be set".into(),
            ));
        }

        if let Some(key) = single {
            return Self::single(key);
        }
        if let Some(symbol) = inheritance {
            return Self::inheritance(symbol);
        }
        if let Some(group) = multi {
            return Self::multi(group);
        }
        if let Some((name, instance)) = smart_contract {
            return Self::smart_contract(name, instance);
        }
        match governance {
            Some(symbol) => Self::governance(symbol),
            None => Err(TxError::InvalidDescriptor(
                "exactly one of the public key options must be set".into(),
            )),
        }
    }

    /// Wire authorization structure.
    pub fn to_public_key(&self) -> Result<PublicKey, TxError> {
        let key = match self {
            Self::Single(key) => PublicKey {
                single: key.wire_bytes(),
                ..Default::default()
            },
            Self::Multi(group) => {
                group.validate()?;
                PublicKey {
                    multi: Some(group.to_multi_key()),
                    ..Default::default()
                }
            }
            Self::Inheritance(symbol) => {
                check_symbol(symbol)?;
                PublicKey {
                    single: symbol.as_bytes().to_vec(),
                    ..Default::default()
                }
            }
            Self::Governance(symbol) => PublicKey {
                governance_auth: format!("{}{}", GOVERNANCE_PREFIX, symbol).into_bytes(),
                ..Default::default()
            },
            Self::SmartContract { name, instance } => PublicKey {
                smart_contract_auth: format!("{}{}_{}", SMART_CONTRACT_PREFIX, name, instance)
                    .into_bytes(),
                ..Default::default()
            },
        };
        Ok(key)
    }

    /// Single and multi keys need the restricted marker; the reference
    /// kinds are implicitly privileged.
    pub fn is_restricted(&self) -> bool {
        match self {
            Self::Single(key) => key.is_restricted(),
            Self::Multi(group) => group.is_restricted(),
            Self::Inheritance(_) | Self::Governance(_) | Self::SmartContract { .. } => true,
        }
    }

    /// Keys that must sign, in signature order, with their algorithms.
    ///
    /// Reference kinds have no local keys.
    pub fn signing_keys(&self) -> Result<Vec<(&KeyText, Algorithm)>, TxError> {
        let keys: Vec<&KeyText> = match self {
            Self::Single(key) => vec![key],
            Self::Multi(group) => group.keys.iter().map(|k| &k.key).collect(),
            _ => Vec::new(),
        };
        keys.into_iter()
            .map(|key| {
                Algorithm::for_key(key)
                    .map(|alg| (key, alg))
                    .map_err(|e| TxError::Authorization(e.to_string()))
            })
            .collect()
    }
}

impl std::fmt::Display for AuthorizationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(key) => write!(f, "{}", key),
            Self::Multi(group) => write!(f, "multi-key group of {}", group.keys.len()),
            Self::Inheritance(symbol) => write!(f, "inherited {}", symbol),
            Self::Governance(symbol) => write!(f, "{}{}", GOVERNANCE_PREFIX, symbol),
            Self::SmartContract { name, instance } => {
                write!(f, "{}{}_{}", SMART_CONTRACT_PREFIX, name, instance)
            }
        }
    }
}

/// Fail unless the descriptor may perform administrative operations.
pub fn require_restricted(descriptor: &AuthorizationDescriptor, operation: &str) -> Result<(), TxError> {
    if descriptor.is_restricted() {
        return Ok(());
    }
    Err(TxError::Authorization(format!(
        "{} requires a restricted key (r_), got {}",
        operation, descriptor
    )))
}

/// Permissions granted to one restricted key of a contract.
///
/// Flags default to false.
#[derive(Debug, Clone)]
pub struct RestrictedKeyConfig {
    pub descriptor: AuthorizationDescriptor,
    /// Seconds a transaction from this key waits before executing.
    pub time_delay: i64,
    /// Apply across all contracts.
    pub global: bool,
    pub update_contract: bool,
    pub transfer: bool,
    pub quash: bool,
    pub mint: bool,
    pub vote: bool,
    pub propose: bool,
    pub compliance: bool,
    pub expense_ratio: bool,
    pub cur_equiv: bool,
    pub revoke: bool,
    /// Lower weight is more privileged.
    pub key_weight: u32,
}

impl RestrictedKeyConfig {
    pub fn new(descriptor: AuthorizationDescriptor) -> Self {
        Self {
            descriptor,
            time_delay: 0,
            global: false,
            update_contract: false,
            transfer: false,
            quash: false,
            mint: false,
            vote: false,
            propose: false,
            compliance: false,
            expense_ratio: false,
            cur_equiv: false,
            revoke: false,
            key_weight: 0,
        }
    }
}

/// Build the restricted key list of a contract.
pub fn restricted_keys(configs: &[RestrictedKeyConfig]) -> Result<Vec<RestrictedKey>, TxError> {
    configs
        .iter()
        .map(|config| {
            if !config.descriptor.is_restricted() {
                return Err(TxError::Authorization(format!(
                    "{} is not compatible to be restricted",
                    config.descriptor
                )));
            }
            Ok(RestrictedKey {
                public_key: Some(config.descriptor.to_public_key()?),
                time_delay: config.time_delay,
                global: config.global,
                update_contract: config.update_contract,
                transfer: config.transfer,
                quash: config.quash,
                mint: config.mint,
                vote: config.vote,
                propose: config.propose,
                compliance: config.compliance,
                expense_ratio: config.expense_ratio,
                cur_equiv: config.cur_equiv,
                key_weight: config.key_weight,
                revoke: config.revoke,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    const ED25519_PUB: &str = "A_c_FPXdqFTeqC3rHCaAAXmXbunb8C5BbRZEZNGjt23dAVo7";

    fn encoded(descriptor: &AuthorizationDescriptor) -> String {
        hex::encode(descriptor.to_public_key().unwrap().encode_to_vec())
    }

    fn sample_group() -> MultiKeyGroup {
        MultiKeyGroup {
            keys: vec![
                MultiKeyEntry {
                    class: 1,
                    key: KeyText::parse("A_FPXdqFTeqC3rHCaAAXmXbunb8C5BbRZEZNGjt23dAVo7").unwrap(),
                },
                MultiKeyEntry {
                    class: 2,
                    key: KeyText::parse(
                        "B_8TZAaoUWbGvkxaWdWBXJ3mVHXVXLDJgtbeexkBzj5ySjpru7yZvfuKwGGHt2gtFpQfQCaRnBPU43bV",
                    )
                    .unwrap(),
                },
            ],
            patterns: vec![vec![
                PatternEntry { class: 1, required: 1 },
                PatternEntry { class: 2, required: 1 },
            ]],
            hash_tokens: vec![HashToken::Blake3, HashToken::Sha3_256],
        }
    }

    #[test]
    fn test_single_encoding() {
        let d = AuthorizationDescriptor::single(ED25519_PUB).unwrap();
        assert_eq!(
            encoded(&d),
            "0a24415f635fd5c908ae57a79d4e820f61b20b618fdb782e87a46eaef580ec94c6815b82f90a"
        );
    }

    #[test]
    fn test_multi_encoding() {
        let d = AuthorizationDescriptor::multi(sample_group()).unwrap();
        assert_eq!(
            encoded(&d),
            "12710a22415fd5c908ae57a79d4e820f61b20b618fdb782e87a46eaef580ec94c6815b82f90a0a3b425f3e6467cc0cb5654788058c44db412b47d31f897ead16fc609b621e356c9455ed0fc6e1c59feab234f6385c331f84453bd6a06b6ad218545a001a080a02010212020101220163220161"
        );
    }

    #[test]
    fn test_reference_encodings() {
        let d = AuthorizationDescriptor::inheritance("$ZRA+0000").unwrap();
        assert_eq!(encoded(&d), "0a09245a52412b30303030");

        let d = AuthorizationDescriptor::smart_contract("TestContract", 1234).unwrap();
        assert_eq!(encoded(&d), "1a1473635f54657374436f6e74726163745f31323334");

        let d = AuthorizationDescriptor::governance("$ZRA+0000").unwrap();
        assert_eq!(encoded(&d), "220d676f765f245a52412b30303030");
    }

    #[test]
    fn test_inheritance_symbol_format() {
        for bad in ["InvalidKey", "$zra+0000", "$ZRA+000", "$ZRA+00000", "ZRA+0000"] {
            assert!(matches!(
                AuthorizationDescriptor::inheritance(bad),
                Err(TxError::InvalidDescriptor(_))
            ));
        }
    }

    #[test]
    fn test_symbol_pattern_shared_across_calls() {
        assert!(SYMBOL.as_ref().is_ok());
        for symbol in ["$ZRA+0000", "$ABC+1234", "$LONGNAME+9999"] {
            check_symbol(symbol).unwrap();
            check_symbol(symbol).unwrap();
        }
        assert!(check_symbol("$ZRA+0000 ").is_err());
    }

    #[test]
    fn test_exactly_one_option() {
        let none = AuthorizationDescriptor::from_parts(None, None, None, None, None);
        assert!(matches!(none, Err(TxError::InvalidDescriptor(_))));

        let two = AuthorizationDescriptor::from_parts(
            Some(ED25519_PUB),
            None,
            None,
            None,
            Some("$ZRA+0000"),
        );
        match two {
            Err(TxError::InvalidDescriptor(msg)) => {
                assert_eq!(msg, "exactly one of the public key options must be set")
            }
            other => panic!("unexpected {:?}", other),
        }

        let all = AuthorizationDescriptor::from_parts(
            Some(ED25519_PUB),
            Some("$ZRA+0000"),
            Some(sample_group()),
            Some(("pool", 1)),
            Some("$ZRA+0000"),
        );
        assert!(all.is_err());

        let one = AuthorizationDescriptor::from_parts(None, None, None, Some(("pool", 7)), None).unwrap();
        assert_eq!(one.to_string(), "sc_pool_7");
    }

    #[test]
    fn test_multi_pattern_classes_validated() {
        let mut group = sample_group();
        group.patterns = vec![vec![PatternEntry { class: 9, required: 1 }]];
        assert!(matches!(
            AuthorizationDescriptor::multi(group),
            Err(TxError::InvalidDescriptor(_))
        ));

        let mut group = sample_group();
        group.patterns = vec![vec![PatternEntry { class: 1, required: 2 }]];
        assert!(AuthorizationDescriptor::multi(group).is_err());
    }

    #[test]
    fn test_restricted_detection() {
        let plain = AuthorizationDescriptor::single(ED25519_PUB).unwrap();
        let restricted = AuthorizationDescriptor::single(&format!("r_{}", ED25519_PUB)).unwrap();
        assert!(!plain.is_restricted());
        assert!(restricted.is_restricted());
        assert!(matches!(
            require_restricted(&plain, "mint"),
            Err(TxError::Authorization(_))
        ));
        assert!(require_restricted(&restricted, "mint").is_ok());

        let mut group = sample_group();
        assert!(!AuthorizationDescriptor::Multi(group.clone()).is_restricted());
        group.hash_tokens.insert(0, HashToken::Restricted);
        assert!(AuthorizationDescriptor::Multi(group).is_restricted());

        assert!(AuthorizationDescriptor::governance("$ZRA+0000").unwrap().is_restricted());
        assert!(AuthorizationDescriptor::inheritance("$ZRA+0000").unwrap().is_restricted());
    }

    #[test]
    fn test_restricted_keys_reject_plain_keys() {
        let plain = RestrictedKeyConfig::new(AuthorizationDescriptor::single(ED25519_PUB).unwrap());
        assert!(matches!(restricted_keys(&[plain]), Err(TxError::Authorization(_))));

        let mut config = RestrictedKeyConfig::new(
            AuthorizationDescriptor::single(&format!("r_{}", ED25519_PUB)).unwrap(),
        );
        config.mint = true;
        config.key_weight = 1;
        let keys = restricted_keys(&[config]).unwrap();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].mint);
        assert!(keys[0]
            .public_key
            .as_ref()
            .unwrap()
            .single
            .starts_with(b"r_A_c_"));
    }

    #[test]
    fn test_signing_keys_order() {
        let d = AuthorizationDescriptor::multi(sample_group()).unwrap();
        let keys = d.signing_keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].1, Algorithm::Ed25519);
        assert_eq!(keys[1].1, Algorithm::Ed448);
        assert!(AuthorizationDescriptor::governance("$X+0001")
            .unwrap()
            .signing_keys()
            .unwrap()
            .is_empty());
    }
}
