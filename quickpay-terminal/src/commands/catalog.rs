use std::io::Write;

use quickpay::catalog::{CatalogError, CatalogListing, fallback_products, load_catalog};
use quickpay_http::HttpCatalogClient;
use tokio::io::AsyncRead;

use crate::config::CatalogArgs;
use crate::console::Console;
use crate::error::TerminalError;

/// Loads products, falling back to the built-in list if the catalog is
/// unconfigured or unavailable.
pub async fn load_listing(args: &CatalogArgs) -> CatalogListing {
    match HttpCatalogClient::try_new(args.config()) {
        Ok(client) => load_catalog(&client).await,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog not configured, using fallback products");
            CatalogListing {
                products: fallback_products(),
                error: Some(CatalogError::Transport(e.to_string())),
            }
        }
    }
}

/// Prints a listing, one product per line.
///
/// # Errors
///
/// Returns an error if the console cannot be written.
pub fn print_listing<R: AsyncRead + Unpin, W: Write>(
    console: &mut Console<R, W>,
    listing: &CatalogListing,
) -> Result<(), TerminalError> {
    if let Some(error) = &listing.error {
        console.say(format_args!("{error}. Showing sample products."))?;
    }
    for (i, product) in listing.products.iter().enumerate() {
        console.say(format_args!(
            "{:>3}. {} - {} {}",
            i + 1,
            product.name,
            product.price,
            product.currency
        ))?;
    }
    Ok(())
}

/// `catalog`: lists the products a sale can be prefilled from.
///
/// # Errors
///
/// Returns an error if the console cannot be written.
pub async fn catalog(args: &CatalogArgs) -> Result<(), TerminalError> {
    let listing = load_listing(args).await;
    print_listing(&mut Console::stdio(), &listing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_catalog_uses_fallback() {
        let args = CatalogArgs {
            catalog_url: "https://graph.example/v19.0".into(),
            catalog_id: String::new(),
            access_token: String::new(),
        };
        let listing = load_listing(&args).await;
        assert!(listing.is_fallback());
        assert_eq!(listing.products, fallback_products());

        let mut console = Console::new(&b""[..], Vec::new());
        print_listing(&mut console, &listing).unwrap();
        let out = String::from_utf8(console.output().clone()).unwrap();
        assert!(out.contains("Showing sample products."));
        assert!(out.contains("  1. Espresso - 2.50 USD"));
    }
}
