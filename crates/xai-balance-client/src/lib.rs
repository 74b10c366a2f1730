//! xAI billing API client.
//!
//! This crate fetches the postpaid invoice preview for a team and turns it
//! into a [`BillingSnapshot`](xai_balance_core::BillingSnapshot).
//!
//! # Example
//!
//! ```no_run
//! use xai_balance_client::{BillingApi, BillingClient, DEFAULT_BASE_URL};
//! use xai_balance_core::{compute, Credentials};
//!
//! # async fn example() -> Result<(), xai_balance_client::FetchError> {
//! let client = BillingClient::new(DEFAULT_BASE_URL)?;
//! let credentials = Credentials::new("xai-management-key", "team-uuid");
//!
//! let snapshot = client.fetch(&credentials).await?;
//! let figures = compute(&snapshot);
//!
//! println!("{}", figures.status_bar_summary);
//! println!("{}", figures.invoice_detail());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{parse_invoice_preview, BillingApi, BillingClient, ClientOptions, DEFAULT_BASE_URL};
pub use error::FetchError;
pub use types::*;
