//! Safe initializer and factory calldata codec
//!
//! Initializer (`setup`) layout after the selector, one 32-byte word each:
//!
//! ```text
//! 0  owners offset (0x100)       5  payment token (zero)
//! 1  threshold                   6  payment (zero)
//! 2  to (zero or SafeToL2Setup)  7  payment receiver
//! 3  data offset                 8  owner count
//! 4  fallback handler            9.. owners, then data length and data
//! ```
//!
//! The v1.4.1 variant embeds a `setupToL2(l2Singleton)` call as `data`; the
//! legacy variants carry empty data, so the two layouts differ in word count.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

use super::words::{address_word, WordReader, WordWriter, SELECTOR_HEX};
use crate::contracts::{ISafeProxyFactory, ISafeSetup, ISafeToL2Setup};
use crate::error::{Error, Result};
use crate::types::{DeploymentParameters, ImplementationVariant};

const OWNERS_OFFSET: usize = 0x100;
const THRESHOLD_WORD: usize = 1;
const FALLBACK_HANDLER_WORD: usize = 4;
const PAYMENT_RECEIVER_WORD: usize = 7;
const OWNER_COUNT_WORD: usize = 8;

/// Byte offset of the initializer argument in `createProxyWithNonce`
const INITIALIZER_OFFSET: usize = 0x60;
const SALT_WORD: usize = 2;

/// Byte offset of the `data` argument for `owner_count` owners
pub fn data_offset(owner_count: usize) -> usize {
    0x120 + 0x20 * owner_count
}

/// Encodes `Safe.setup` calldata for the given variant's layout
pub fn encode_initializer(
    owners: &[Address],
    threshold: u64,
    payment_receiver: Option<Address>,
    fallback_handler: Address,
    variant: ImplementationVariant,
) -> Bytes {
    let l2_setup = variant.addresses().l2_setup;
    let to = l2_setup.map_or(Address::ZERO, |l2| l2.setup_contract);
    let data = l2_setup
        .map(|l2| {
            let mut call = ISafeToL2Setup::setupToL2Call::SELECTOR.to_vec();
            call.extend_from_slice(&address_word(l2.l2_singleton));
            call
        })
        .unwrap_or_default();

    let mut words = WordWriter::with_selector(ISafeSetup::setupCall::SELECTOR);
    words
        .push_usize(OWNERS_OFFSET)
        .push_usize(threshold as usize)
        .push_address(to)
        .push_usize(data_offset(owners.len()))
        .push_address(fallback_handler)
        .push_address(Address::ZERO)
        .push_usize(0)
        .push_address(payment_receiver.unwrap_or(Address::ZERO))
        .push_usize(owners.len());
    for owner in owners {
        words.push_address(*owner);
    }
    words.push_bytes(&data);
    words.finish()
}

/// Encodes `createProxyWithNonce(singleton, initializer, salt)` for the variant's factory
pub fn encode_create_call(params: &DeploymentParameters) -> Bytes {
    let initializer = params.initializer();
    let mut words = WordWriter::with_selector(ISafeProxyFactory::createProxyWithNonceCall::SELECTOR);
    words
        .push_address(params.addresses().safe_singleton)
        .push_usize(INITIALIZER_OFFSET)
        .push_u256(params.salt)
        .push_bytes(&initializer);
    words.finish()
}

/// Fields read back from `setup` calldata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInitializer {
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub fallback_handler: Address,
    pub payment_receiver: Option<Address>,
}

/// Decodes `Safe.setup` calldata given as hex (with or without `0x`)
pub fn decode_initializer(initializer_hex: &str) -> Result<DecodedInitializer> {
    let body = strip_hex_prefix(initializer_hex);
    let selector = body
        .get(..SELECTOR_HEX)
        .ok_or_else(|| Error::MalformedCalldata("initializer shorter than a selector".into()))?;
    if !selector.eq_ignore_ascii_case(&alloy::hex::encode(ISafeSetup::setupCall::SELECTOR)) {
        return Err(Error::MalformedCalldata(format!(
            "initializer selector 0x{} is not setup",
            selector
        )));
    }

    let words = WordReader::new(&body[SELECTOR_HEX..])?;
    let threshold = words.u64(THRESHOLD_WORD)?;
    let fallback_handler = words.address(FALLBACK_HANDLER_WORD)?;
    let payment_receiver = words.address(PAYMENT_RECEIVER_WORD)?;

    let owner_count = words.usize(OWNER_COUNT_WORD)?;
    let first_owner = OWNER_COUNT_WORD + 1;
    if owner_count > words.len().saturating_sub(first_owner) {
        return Err(Error::MalformedCalldata(format!(
            "owner count {} exceeds calldata",
            owner_count
        )));
    }
    let owners = (first_owner..first_owner + owner_count)
        .map(|index| words.address(index))
        .collect::<Result<Vec<_>>>()?;

    Ok(DecodedInitializer {
        owners,
        threshold,
        fallback_handler,
        payment_receiver: (payment_receiver != Address::ZERO).then_some(payment_receiver),
    })
}

/// Decodes a creation transaction's `createProxyWithNonce` input.
///
/// The variant is taken from the fingerprint table; unknown calldata silently
/// decodes as the default variant.
pub fn decode_create_call(calldata_hex: &str) -> Result<DeploymentParameters> {
    let body = strip_hex_prefix(calldata_hex);
    let args = body
        .get(SELECTOR_HEX..)
        .ok_or_else(|| Error::MalformedCalldata("calldata shorter than a selector".into()))?;
    let words = WordReader::new(args)?;

    let salt = words.u256(SALT_WORD)?;
    let offset = words.usize(1)?;
    if offset % 32 != 0 {
        return Err(Error::MalformedCalldata(format!(
            "initializer offset {:#x} is not word aligned",
            offset
        )));
    }
    let length_word = offset / 32;
    let initializer_len = words.usize(length_word)?;
    let initializer = words.hex_bytes(length_word + 1, initializer_len)?;
    let decoded = decode_initializer(initializer)?;

    let params = DeploymentParameters {
        owners: decoded.owners,
        threshold: decoded.threshold,
        salt,
        variant: ImplementationVariant::from_calldata(calldata_hex),
        payment_receiver: decoded.payment_receiver,
    };
    params
        .validate()
        .map_err(|e| Error::MalformedCalldata(e.to_string()))?;
    Ok(params)
}

/// Decodes raw input bytes, see [`decode_create_call`]
pub fn decode_create_input(input: &[u8]) -> Result<DeploymentParameters> {
    decode_create_call(&alloy::hex::encode(input))
}

fn strip_hex_prefix(hex: &str) -> &str {
    let hex = hex.trim();
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}
