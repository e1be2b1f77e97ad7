//! Subcommand implementations.

mod catalog;
mod pay;
mod sell;
mod watch;

use alloy_signer_local::PrivateKeySigner;
use quickpay::catalog::Product;

pub use catalog::{catalog, load_listing};
pub use pay::pay;
pub use sell::sell;
pub use watch::watch;

use crate::config::ChainArgs;
use crate::error::TerminalError;

/// Parses the configured private key, if any.
///
/// # Errors
///
/// Returns [`TerminalError::InvalidPrivateKey`] if the key is set but invalid.
pub fn wallet_signer(chain: &ChainArgs) -> Result<Option<PrivateKeySigner>, TerminalError> {
    let Some(key) = chain.private_key.as_deref().map(str::trim) else {
        return Ok(None);
    };
    if key.is_empty() {
        return Ok(None);
    }
    key.parse()
        .map(Some)
        .map_err(|e: alloy_signer_local::LocalSignerError| {
            TerminalError::InvalidPrivateKey(e.to_string())
        })
}

/// Resolves the seller account: an explicit one, else the wallet address.
///
/// # Errors
///
/// Returns [`TerminalError::InvalidPrivateKey`] if the key is set but invalid.
pub fn seller_account(
    explicit: Option<&str>,
    chain: &ChainArgs,
) -> Result<Option<String>, TerminalError> {
    if let Some(seller) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(Some(seller.to_owned()));
    }
    Ok(wallet_signer(chain)?.map(|signer| signer.address().to_checksum(None)))
}

/// Finds a product by id, by name (case-insensitive), or by 1-based list number.
#[must_use]
pub fn find_product<'a>(products: &'a [Product], query: &str) -> Option<&'a Product> {
    let query = query.trim();
    products
        .iter()
        .find(|p| p.id == query)
        .or_else(|| products.iter().find(|p| p.name.eq_ignore_ascii_case(query)))
        .or_else(|| {
            query
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| products.get(i))
        })
}
