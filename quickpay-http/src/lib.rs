#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! HTTP transport for the QuickPay product catalog.
//!
//! [`HttpCatalogClient`] reads products from a Graph-API style catalog
//! endpoint and implements [`quickpay::catalog::CatalogSource`], so it can be
//! passed to [`quickpay::catalog::load_catalog`] to get the fallback behavior.
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation of catalog requests

pub mod catalog;

pub use catalog::{CatalogConfig, CatalogConfigError, HttpCatalogClient};
