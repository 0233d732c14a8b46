//! Deployment parameters recovered from a creation transaction

use alloy::primitives::{Address, Bytes, U256};

use super::ImplementationVariant;
use crate::chain::ChainAddresses;
use crate::create2::compute_create2_address;
use crate::encoding::{encode_create_call, encode_initializer};
use crate::error::{Error, Result};

/// Owners, threshold, salt and variant of a Safe deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentParameters {
    /// Owner order is part of the calldata and therefore of the address
    pub owners: Vec<Address>,
    /// Required confirmations, `1..=owners.len()`
    pub threshold: u64,
    /// CREATE2 salt nonce
    pub salt: U256,
    pub variant: ImplementationVariant,
    /// `None` encodes as the zero address
    pub payment_receiver: Option<Address>,
}

impl DeploymentParameters {
    /// Creates validated parameters without a payment receiver
    pub fn new(
        owners: Vec<Address>,
        threshold: u64,
        salt: U256,
        variant: ImplementationVariant,
    ) -> Result<Self> {
        let params = Self {
            owners,
            threshold,
            salt,
            variant,
            payment_receiver: None,
        };
        params.validate()?;
        Ok(params)
    }

    /// Sets the payment receiver; the zero address means none
    pub fn with_payment_receiver(mut self, receiver: Address) -> Self {
        self.payment_receiver = (receiver != Address::ZERO).then_some(receiver);
        self
    }

    /// Checks owner and threshold invariants
    pub fn validate(&self) -> Result<()> {
        if self.owners.is_empty() {
            return Err(Error::InvalidParameters("no owners".into()));
        }
        if self.threshold == 0 || self.threshold as usize > self.owners.len() {
            return Err(Error::InvalidParameters(format!(
                "threshold {} must be 1-{}",
                self.threshold,
                self.owners.len()
            )));
        }
        Ok(())
    }

    /// Canonical contracts for the variant
    pub fn addresses(&self) -> ChainAddresses {
        self.variant.addresses()
    }

    /// `setup` calldata using the variant's fallback handler
    pub fn initializer(&self) -> Bytes {
        encode_initializer(
            &self.owners,
            self.threshold,
            self.payment_receiver,
            self.addresses().fallback_handler,
            self.variant,
        )
    }

    /// `createProxyWithNonce` calldata for the variant's factory
    pub fn create_call(&self) -> Bytes {
        encode_create_call(self)
    }

    /// Computes the proxy address locally from the factory's creation code
    pub fn predicted_address(&self, creation_code: &Bytes) -> Address {
        let addresses = self.addresses();
        compute_create2_address(
            addresses.proxy_factory,
            addresses.safe_singleton,
            &self.initializer(),
            self.salt,
            creation_code,
        )
    }
}
