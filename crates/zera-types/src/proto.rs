//! Protobuf wire schema for ZERA transactions.
//!
//! Hand-written `prost` messages matching the validator's `zera_txn` and
//! `zera_validator` packages. Optional scalar fields are `Option<_>` so that
//! an absent value is distinguishable from zero on the wire. Amounts that
//! may exceed 64 bits travel as decimal strings.

use prost_types::Timestamp;

// =============================================================================
// Authorization
// =============================================================================

/// Authorization key. Exactly one field is populated.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublicKey {
    /// Prefixed single key (`A_c_` + raw) or an inheritance symbol.
    #[prost(bytes = "vec", tag = "1")]
    pub single: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub multi: Option<MultiKey>,
    /// `sc_<name>_<instance>`.
    #[prost(bytes = "vec", tag = "3")]
    pub smart_contract_auth: Vec<u8>,
    /// `gov_<symbol>`.
    #[prost(bytes = "vec", tag = "4")]
    pub governance_auth: Vec<u8>,
}

/// Threshold group of keys.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiKey {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub public_keys: Vec<Vec<u8>>,
    /// One signature per entry of `public_keys`, in the same order.
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub signatures: Vec<Vec<u8>>,
    #[prost(message, repeated, tag = "3")]
    pub multi_patterns: Vec<MultiPatterns>,
    #[prost(string, repeated, tag = "4")]
    pub hash_tokens: Vec<String>,
}

/// One satisfiable pattern: `required[i]` keys of class `class[i]`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiPatterns {
    #[prost(uint32, repeated, tag = "1")]
    pub class: Vec<u32>,
    #[prost(uint32, repeated, tag = "2")]
    pub required: Vec<u32>,
}

// =============================================================================
// Envelope
// =============================================================================

/// Fields common to every transaction family.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BaseTxn {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<PublicKey>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    /// Fee in parts of `fee_id`, as decimal text.
    #[prost(string, tag = "3")]
    pub fee_amount: String,
    #[prost(string, tag = "4")]
    pub fee_id: String,
    #[prost(bytes = "vec", tag = "5")]
    pub signature: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub hash: Vec<u8>,
    #[prost(string, optional, tag = "7")]
    pub memo: Option<String>,
    #[prost(uint64, tag = "8")]
    pub nonce: u64,
}

// =============================================================================
// Transfers
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CoinTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(message, optional, tag = "2")]
    pub auth: Option<TransferAuthentication>,
    #[prost(string, tag = "3")]
    pub contract_id: String,
    #[prost(message, repeated, tag = "4")]
    pub input_transfers: Vec<InputTransfers>,
    #[prost(message, repeated, tag = "5")]
    pub output_transfers: Vec<OutputTransfers>,
    #[prost(string, optional, tag = "6")]
    pub contract_fee_id: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub contract_fee_amount: Option<String>,
}

/// Parallel lists of signer keys, signatures and nonces, plus allowance
/// grantor addresses and their nonces.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransferAuthentication {
    #[prost(message, repeated, tag = "1")]
    pub public_key: Vec<PublicKey>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub signature: Vec<Vec<u8>>,
    #[prost(uint64, repeated, tag = "3")]
    pub nonce: Vec<u64>,
    #[prost(bytes = "vec", repeated, tag = "4")]
    pub allowance_address: Vec<Vec<u8>>,
    #[prost(uint64, repeated, tag = "5")]
    pub allowance_nonce: Vec<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputTransfers {
    #[prost(uint64, tag = "1")]
    pub index: u64,
    #[prost(string, tag = "2")]
    pub amount: String,
    /// Percent of the base fee paid by this input, scaled by 10^6.
    #[prost(uint32, tag = "3")]
    pub fee_percent: u32,
    #[prost(uint32, optional, tag = "4")]
    pub contract_fee_percent: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutputTransfers {
    #[prost(bytes = "vec", tag = "1")]
    pub wallet_address: Vec<u8>,
    #[prost(string, tag = "2")]
    pub amount: String,
    #[prost(string, optional, tag = "3")]
    pub memo: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AllowanceTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(bool, tag = "3")]
    pub authorize: bool,
    #[prost(bytes = "vec", tag = "4")]
    pub wallet_address: Vec<u8>,
    /// Scaled by 10^18.
    #[prost(string, optional, tag = "5")]
    pub allowed_currency_equivalent: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub allowed_amount: Option<String>,
    #[prost(uint32, optional, tag = "7")]
    pub period_months: Option<u32>,
    #[prost(uint32, optional, tag = "8")]
    pub period_seconds: Option<u32>,
    #[prost(message, optional, tag = "9")]
    pub start_time: Option<Timestamp>,
}

// =============================================================================
// Minting and Items
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MintTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(string, tag = "3")]
    pub amount: String,
    #[prost(bytes = "vec", tag = "4")]
    pub recipient_address: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ItemizedMintTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(string, tag = "3")]
    pub item_id: String,
    #[prost(bytes = "vec", tag = "4")]
    pub recipient_address: Vec<u8>,
    #[prost(message, repeated, tag = "5")]
    pub parameters: Vec<KeyValuePair>,
    #[prost(uint64, optional, tag = "6")]
    pub expiry: Option<u64>,
    #[prost(uint64, optional, tag = "7")]
    pub valid_from: Option<u64>,
    #[prost(message, optional, tag = "8")]
    pub contract_fees: Option<ItemContractFees>,
    /// Arbitrary-precision integer as decimal text.
    #[prost(string, optional, tag = "9")]
    pub voting_weight: Option<String>,
}

/// Per-item transfer fees. `fee` is a currency equivalent scaled by 10^18;
/// `burn` and `validator` are percentages scaled by 10^16.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ItemContractFees {
    #[prost(string, tag = "1")]
    pub fee: String,
    #[prost(bytes = "vec", tag = "2")]
    pub fee_address: Vec<u8>,
    #[prost(string, tag = "3")]
    pub burn: String,
    #[prost(string, tag = "4")]
    pub validator: String,
    #[prost(string, repeated, tag = "5")]
    pub allowed_fee_instrument: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NftTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(string, tag = "3")]
    pub item_id: String,
    #[prost(bytes = "vec", tag = "4")]
    pub recipient_address: Vec<u8>,
    #[prost(string, optional, tag = "5")]
    pub contract_fee_id: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub contract_fee_amount: Option<String>,
}

// =============================================================================
// Governance
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GovernanceVote {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(bytes = "vec", tag = "3")]
    pub proposal_id: Vec<u8>,
    #[prost(bool, optional, tag = "4")]
    pub support: Option<bool>,
    #[prost(uint32, optional, tag = "5")]
    pub support_option: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GovernanceProposal {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(string, tag = "3")]
    pub title: String,
    #[prost(string, tag = "4")]
    pub synopsis: String,
    #[prost(string, tag = "5")]
    pub body: String,
    #[prost(string, repeated, tag = "6")]
    pub options: Vec<String>,
    #[prost(message, optional, tag = "7")]
    pub start_timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "8")]
    pub end_timestamp: Option<Timestamp>,
    #[prost(message, repeated, tag = "9")]
    pub governance_txn: Vec<GovernanceTxn>,
}

/// A serialized transaction executed if the proposal passes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GovernanceTxn {
    #[prost(enumeration = "TransactionType", tag = "1")]
    pub txn_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub serialized_txn: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub txn_hash: Vec<u8>,
}

// =============================================================================
// Restricted Operations
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ComplianceTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(message, repeated, tag = "3")]
    pub compliance: Vec<ComplianceAssign>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ComplianceAssign {
    #[prost(bytes = "vec", tag = "1")]
    pub recipient_address: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub compliance_level: u32,
    /// True to assign, false to revoke.
    #[prost(bool, tag = "3")]
    pub assign_revoke: bool,
    #[prost(message, optional, tag = "4")]
    pub expiry: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExpenseRatioTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub addresses: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "4")]
    pub output_address: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SelfCurrencyEquiv {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(message, repeated, tag = "2")]
    pub cur_equiv: Vec<CurrencyEquiv>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CurrencyEquiv {
    #[prost(string, tag = "1")]
    pub contract_id: String,
    /// Rate scaled by 10^18.
    #[prost(string, tag = "2")]
    pub rate: String,
}

// =============================================================================
// Contracts
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InstrumentContract {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(enumeration = "ContractType", tag = "2")]
    pub r#type: i32,
    #[prost(uint64, tag = "3")]
    pub contract_version: u64,
    #[prost(string, tag = "4")]
    pub contract_id: String,
    #[prost(string, tag = "5")]
    pub symbol: String,
    #[prost(string, tag = "6")]
    pub name: String,
    #[prost(message, optional, tag = "7")]
    pub governance: Option<Governance>,
    #[prost(message, repeated, tag = "8")]
    pub restricted_keys: Vec<RestrictedKey>,
    #[prost(message, optional, tag = "9")]
    pub coin_denomination: Option<CoinDenomination>,
    #[prost(string, optional, tag = "10")]
    pub max_supply: Option<String>,
    #[prost(message, repeated, tag = "11")]
    pub max_supply_release: Vec<MaxSupplyRelease>,
    #[prost(message, repeated, tag = "12")]
    pub premint_wallets: Vec<PreMintWallet>,
    #[prost(message, repeated, tag = "13")]
    pub custom_parameters: Vec<KeyValuePair>,
    #[prost(message, repeated, tag = "14")]
    pub expense_ratio: Vec<ExpenseRatio>,
    #[prost(bool, tag = "15")]
    pub update_expense_ratio: bool,
    #[prost(message, optional, tag = "16")]
    pub contract_fees: Option<ContractFees>,
    #[prost(bool, tag = "17")]
    pub update_contract_fees: bool,
    #[prost(uint32, optional, tag = "18")]
    pub quash_threshold: Option<u32>,
    #[prost(message, repeated, tag = "19")]
    pub token_compliance: Vec<TokenCompliance>,
    #[prost(bool, tag = "20")]
    pub kyc_status: bool,
    #[prost(bool, tag = "21")]
    pub immutable_kyc_status: bool,
    /// Initial currency-equivalent rate scaled by 10^18.
    #[prost(string, optional, tag = "22")]
    pub cur_equiv_start: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractUpdateTxn {
    #[prost(message, optional, tag = "1")]
    pub base: Option<BaseTxn>,
    #[prost(string, tag = "2")]
    pub contract_id: String,
    #[prost(uint64, tag = "3")]
    pub contract_version: u64,
    #[prost(string, optional, tag = "4")]
    pub name: Option<String>,
    #[prost(message, optional, tag = "5")]
    pub governance: Option<Governance>,
    #[prost(message, repeated, tag = "6")]
    pub restricted_keys: Vec<RestrictedKey>,
    #[prost(message, optional, tag = "7")]
    pub contract_fees: Option<ContractFees>,
    #[prost(message, repeated, tag = "8")]
    pub custom_parameters: Vec<KeyValuePair>,
    #[prost(message, repeated, tag = "9")]
    pub expense_ratio: Vec<ExpenseRatio>,
    #[prost(message, repeated, tag = "10")]
    pub token_compliance: Vec<TokenCompliance>,
    #[prost(bool, optional, tag = "11")]
    pub kyc_status: Option<bool>,
    #[prost(bool, optional, tag = "12")]
    pub immutable_kyc_status: Option<bool>,
    #[prost(uint32, optional, tag = "13")]
    pub quash_threshold: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Governance {
    #[prost(enumeration = "GovernanceType", tag = "1")]
    pub r#type: i32,
    /// Percent scaled by 100.
    #[prost(uint32, tag = "2")]
    pub regular_quorum: u32,
    #[prost(uint32, optional, tag = "3")]
    pub fast_quorum: Option<u32>,
    #[prost(string, repeated, tag = "4")]
    pub voting_instrument: Vec<String>,
    /// Percent scaled by 10.
    #[prost(uint32, tag = "5")]
    pub threshold: u32,
    #[prost(bool, optional, tag = "6")]
    pub chicken_dinner: Option<bool>,
    #[prost(bool, tag = "7")]
    pub allow_multi: bool,
    #[prost(uint32, optional, tag = "8")]
    pub voting_period: Option<u32>,
    #[prost(string, repeated, tag = "9")]
    pub allowed_proposal_instrument: Vec<String>,
    #[prost(enumeration = "ProposalPeriod", optional, tag = "10")]
    pub proposal_period: Option<i32>,
    #[prost(message, repeated, tag = "11")]
    pub stage_length: Vec<Stage>,
    #[prost(message, optional, tag = "12")]
    pub start_timestamp: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Stage {
    #[prost(uint32, tag = "1")]
    pub length: u32,
    #[prost(enumeration = "ProposalPeriod", tag = "2")]
    pub period: i32,
    #[prost(bool, tag = "3")]
    pub r#break: bool,
    #[prost(uint32, tag = "4")]
    pub max_approved: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RestrictedKey {
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<PublicKey>,
    #[prost(int64, tag = "2")]
    pub time_delay: i64,
    #[prost(bool, tag = "3")]
    pub global: bool,
    #[prost(bool, tag = "4")]
    pub update_contract: bool,
    #[prost(bool, tag = "5")]
    pub transfer: bool,
    #[prost(bool, tag = "6")]
    pub quash: bool,
    #[prost(bool, tag = "7")]
    pub mint: bool,
    #[prost(bool, tag = "8")]
    pub vote: bool,
    #[prost(bool, tag = "9")]
    pub propose: bool,
    #[prost(bool, tag = "10")]
    pub compliance: bool,
    #[prost(bool, tag = "11")]
    pub expense_ratio: bool,
    #[prost(bool, tag = "12")]
    pub cur_equiv: bool,
    #[prost(uint32, tag = "13")]
    pub key_weight: u32,
    #[prost(bool, tag = "14")]
    pub revoke: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CoinDenomination {
    #[prost(string, tag = "1")]
    pub denomination_name: String,
    /// Parts per whole coin.
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PreMintWallet {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MaxSupplyRelease {
    #[prost(message, optional, tag = "1")]
    pub release_date: Option<Timestamp>,
    #[prost(string, tag = "2")]
    pub amount: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyValuePair {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Scheduled expense ratio; `percent` is scaled by 10^4.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExpenseRatio {
    #[prost(uint32, tag = "1")]
    pub day: u32,
    #[prost(uint32, tag = "2")]
    pub month: u32,
    #[prost(uint32, tag = "3")]
    pub percent: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractFees {
    #[prost(string, tag = "1")]
    pub fee: String,
    #[prost(bytes = "vec", tag = "2")]
    pub fee_address: Vec<u8>,
    #[prost(string, tag = "3")]
    pub burn: String,
    #[prost(string, tag = "4")]
    pub validator: String,
    #[prost(string, repeated, tag = "5")]
    pub allowed_fee_instrument: Vec<String>,
    #[prost(enumeration = "ContractFeeType", tag = "6")]
    pub contract_fee_type: i32,
}

/// One acceptable combination of compliance certificates.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenCompliance {
    #[prost(message, repeated, tag = "1")]
    pub compliance: Vec<Compliance>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Compliance {
    #[prost(string, tag = "1")]
    pub contract_id: String,
    #[prost(uint32, tag = "2")]
    pub compliance_level: u32,
}

// =============================================================================
// Validator API
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NonceRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub wallet_address: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NonceResponse {
    /// Last nonce used by the address.
    #[prost(uint64, tag = "1")]
    pub nonce: u64,
}

// =============================================================================
// Enumerations
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ContractType {
    Token = 0,
    Nft = 1,
    Sbt = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum GovernanceType {
    Staged = 0,
    Cycle = 1,
    Adaptive = 2,
    Staggered = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ProposalPeriod {
    Days = 0,
    Months = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ContractFeeType {
    Fixed = 0,
    CurEquivalent = 1,
    Percentage = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TransactionType {
    CoinType = 0,
    MintType = 1,
    ItemMintType = 2,
    ContractTxnType = 3,
    VoteType = 4,
    ProposalType = 5,
    SmartContractType = 6,
    SmartContractExecuteType = 7,
    SelfCurrencyEquivType = 8,
    AuthCurrencyEquivType = 9,
    ExpenseRatioType = 10,
    NftType = 11,
    UpdateContractType = 12,
    ValidatorRegistrationType = 13,
    ValidatorHeartbeatType = 14,
    ProposalResultType = 15,
    DelegatedVotingType = 16,
    RevokeType = 17,
    QuashType = 18,
    FastQuorumType = 19,
    ComplianceType = 20,
    SbtBurnType = 21,
    RequiredVersion = 22,
    SmartContractInstantiateType = 23,
    AllowanceType = 24,
}
