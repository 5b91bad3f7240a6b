//! Core types and constants for the ZERA network SDK.
//!
//! This crate provides the foundational pieces shared by every other ZERA
//! crate: network constants, key and address text codecs, fixed-point
//! amount conversion, and the protobuf wire schema the validators accept.

pub mod amount;
pub mod base58;
pub mod constants;
pub mod proto;

pub use amount::{AmountError, Decimal, Policy, Scale};
pub use base58::{Base58Error, KeyText};
pub use constants::HashToken;
