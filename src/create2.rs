//! CREATE2 address computation for Safe proxies
//!
//! A proxy's address depends only on the factory, singleton, initializer and
//! salt nonce, which is what makes a Safe reproducible on another chain.

use alloy::primitives::{keccak256, Address, Bytes, U256};

/// Computes the address a Safe proxy factory deploys to:
///
/// ```text
/// salt      = keccak256(keccak256(initializer) ++ saltNonce)
/// init_code = proxyCreationCode ++ uint256(singleton)
/// address   = keccak256(0xff ++ factory ++ salt ++ keccak256(init_code))[12:]
/// ```
///
/// `creation_code` is `SafeProxyFactory.proxyCreationCode()` on the target chain.
pub fn compute_create2_address(
    factory: Address,
    singleton: Address,
    initializer: &Bytes,
    salt_nonce: U256,
    creation_code: &Bytes,
) -> Address {
    let salt = keccak256(
        [
            keccak256(initializer).as_slice(),
            &salt_nonce.to_be_bytes::<32>(),
        ]
        .concat(),
    );
    let init_code_hash = keccak256(
        [creation_code.as_ref(), singleton.into_word().as_slice()].concat(),
    );
    factory.create2(salt.0, init_code_hash.0)
}
