//! Contract ABI definitions used to recover and redeploy Safes

use alloy::primitives::{address, Address};
use alloy::sol;

/// Multicall3, deployed at the same address on every supported chain
pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

sol! {
    /// Events emitted by a Safe proxy
    interface ISafe {
        /// Emitted by the proxy itself while running `setup`
        event SafeSetup(
            address indexed initiator,
            address[] owners,
            uint256 threshold,
            address initializer,
            address fallbackHandler
        );
    }

    /// Safe initializer called by the proxy factory
    interface ISafeSetup {
        function setup(
            address[] calldata _owners,
            uint256 _threshold,
            address to,
            bytes calldata data,
            address fallbackHandler,
            address paymentToken,
            uint256 payment,
            address payable paymentReceiver
        ) external;
    }

    /// Delegate-called during `setup` to switch a v1.4.1 Safe to its L2 singleton
    interface ISafeToL2Setup {
        function setupToL2(address l2Singleton) external;
    }

    /// Safe proxy factory
    #[sol(rpc)]
    interface ISafeProxyFactory {
        /// Deploys a proxy at a CREATE2 address derived from the initializer and salt
        function createProxyWithNonce(
            address _singleton,
            bytes memory initializer,
            uint256 saltNonce
        ) external returns (address proxy);

        /// Returns the proxy creation bytecode used for CREATE2 prediction
        function proxyCreationCode() external pure returns (bytes memory);
    }

    /// Multicall3 batching
    #[sol(rpc)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Call3Value {
            address target;
            bool allowFailure;
            uint256 value;
            bytes callData;
        }

        struct CallResult {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls)
            external
            payable
            returns (CallResult[] memory returnData);

        function aggregate3Value(Call3Value[] calldata calls)
            external
            payable
            returns (CallResult[] memory returnData);
    }

    /// ERC20 subset needed for allowance reconciliation
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);

        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
