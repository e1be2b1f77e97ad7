//! Known networks and contract deployments.

use alloy_primitives::{Address, address};
use quickpay::session::{DEFAULT_TOKEN_DECIMALS, PaymentToken};

/// Avalanche Fuji (testnet) chain ID.
pub const AVALANCHE_FUJI: u64 = 43113;

/// Public JSON-RPC endpoint for Avalanche Fuji.
pub const AVALANCHE_FUJI_RPC_URL: &str = "https://api.avax-test.network/ext/bc/C/rpc";

/// Development deployment of the payment contract on Avalanche Fuji.
pub const DEFAULT_QUICKPAY_ADDRESS: Address = address!("0797cE06a87efF9931D02F3D38791f0f37120450");

/// Development deployment of the mock USDC token on Avalanche Fuji.
pub const DEFAULT_MOCK_USDC_ADDRESS: Address = address!("A19A3613CD8AF1685b131068EdE7a657D3083578");

/// Contract deployments on a single chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Human-readable network name.
    pub name: &'static str,
    /// EIP-155 chain ID.
    pub chain_id: u64,
    /// Default JSON-RPC endpoint.
    pub rpc_url: &'static str,
    /// Payment contract address.
    pub quickpay: Address,
    /// Token the payment contract settles in.
    pub token: Address,
    /// Token decimals.
    pub decimals: u8,
    /// Token display symbol.
    pub symbol: &'static str,
}

impl NetworkConfig {
    /// The payment token as seen by the core crate.
    #[must_use]
    pub fn payment_token(&self) -> PaymentToken {
        PaymentToken {
            address: self.token.to_checksum(None),
            decimals: self.decimals,
            symbol: self.symbol.to_owned(),
        }
    }
}

/// Returns configurations for all known networks.
#[must_use]
pub fn known_networks() -> Vec<NetworkConfig> {
    vec![NetworkConfig {
        name: "avalanche-fuji",
        chain_id: AVALANCHE_FUJI,
        rpc_url: AVALANCHE_FUJI_RPC_URL,
        quickpay: DEFAULT_QUICKPAY_ADDRESS,
        token: DEFAULT_MOCK_USDC_ADDRESS,
        decimals: DEFAULT_TOKEN_DECIMALS,
        symbol: "USDC",
    }]
}

/// Looks up a known network by chain ID.
#[must_use]
pub fn network_by_chain_id(chain_id: u64) -> Option<NetworkConfig> {
    known_networks()
        .into_iter()
        .find(|network| network.chain_id == chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuji_is_known() {
        let fuji = network_by_chain_id(AVALANCHE_FUJI).unwrap();
        assert_eq!(fuji.quickpay, DEFAULT_QUICKPAY_ADDRESS);
        assert_eq!(fuji.decimals, 6);
        let token = fuji.payment_token();
        assert!(
            token
                .address
                .eq_ignore_ascii_case("0xa19a3613cd8af1685b131068ede7a657d3083578")
        );
        assert_eq!(token.symbol, "USDC");
    }

    #[test]
    fn test_unknown_chain() {
        assert!(network_by_chain_id(1).is_none());
    }
}
