//! Core types and calculations for the xAI balance menu.
//!
//! This crate provides everything the menu needs that does not touch the network:
//!
//! - **Credentials**: `Credentials` (API key + team id)
//! - **Snapshots**: `BillingSnapshot`, `BillingCycle`, as returned by the invoice preview
//! - **Money**: `DecimalString`, `MonetaryField`, `format_dollars`
//! - **Figures**: `compute`, `DisplayFigures`, the status bar summary and detail lines
//!
//! # Minor units
//!
//! **All monetary fields arrive as decimal strings in cents.**
//!
//! - `"25000"` → $250.00
//! - `"-740"` → $-7.40 (prepaid credits are negative on the wire)
//! - A field that is missing or does not parse is *unavailable*, never zero

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod credentials;
pub mod error;
pub mod figures;
pub mod money;
pub mod snapshot;

pub use credentials::Credentials;
pub use error::{BalanceError, Result};
pub use figures::{compute, summarize, DisplayFigures, UNAVAILABLE};
pub use money::{format_dollars, rounds_to_zero, DecimalString, MonetaryField, CENTS_PER_DOLLAR};
pub use snapshot::{BillingCycle, BillingSnapshot};
