//! Solidity interface definitions for on-chain interactions.
//!
//! - [`IERC20`] - the ERC-20 subset used to check and grant allowance
//! - [`IQuickPay`] - the payment contract that moves tokens to the seller

use alloy_sol_types::sol;

sol! {
    /// Minimal ERC-20 interface for allowance management.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    /// QuickPay payment contract.
    ///
    /// `payMerchant` pulls `_amount` of the configured token from the caller,
    /// which must have approved the contract beforehand, and emits
    /// `PaymentMade`.
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IQuickPay {
        event PaymentMade(address indexed payer, address indexed seller, uint256 amount, string reference);

        function payMerchant(address _seller, uint256 _amount, string _reference) external;
    }
}
