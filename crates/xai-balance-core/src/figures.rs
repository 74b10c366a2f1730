//! Balance calculations.
//!
//! [`compute`] turns a [`BillingSnapshot`] into the figures the menu shows.
//! It is pure: the same snapshot always yields the same figures.
//!
//! Prepaid figures are sign-inverted. The API reports available prepaid
//! credit as a negative number; the menu shows it as a positive amount.
//! A field that cannot be read makes only the figures derived from it
//! unavailable; the rest are still computed.

use serde::Serialize;

use crate::money::{format_dollars, rounds_to_zero, MonetaryField, CENTS_PER_DOLLAR};
use crate::snapshot::{BillingCycle, BillingSnapshot};

/// Placeholder shown in detail lines for an unavailable figure.
pub const UNAVAILABLE: &str = "n/a";

/// Summary shown when neither component has a nonzero value.
const ZERO_SUMMARY: &str = "$0.00";

/// Display-ready figures derived from one snapshot.
///
/// `None` means the figure is unavailable because an input field could
/// not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFigures {
    /// Postpaid spending limit.
    pub invoice_limit: Option<f64>,
    /// Postpaid amount used this cycle.
    pub invoice_used: Option<f64>,
    /// `invoice_limit - invoice_used`.
    pub invoice_remaining: Option<f64>,
    /// Prepaid credit, sign-inverted from the API value.
    pub prepaid_credit: Option<f64>,
    /// Prepaid credit used, sign-inverted from the API value.
    pub prepaid_used: Option<f64>,
    /// `prepaid_credit - prepaid_used`.
    pub prepaid_balance: Option<f64>,
    /// Compact text for the status bar.
    pub status_bar_summary: String,
    /// Cycle the figures belong to.
    pub billing_cycle: BillingCycle,
    /// Fields that could not be read, in wire order.
    pub unavailable: Vec<MonetaryField>,
}

impl DisplayFigures {
    /// `Invoice limit $L; used $U; remain $R (YYYY-MM)`.
    #[must_use]
    pub fn invoice_detail(&self) -> String {
        format!(
            "Invoice limit {}; used {}; remain {} ({})",
            display(self.invoice_limit),
            display(self.invoice_used),
            display(self.invoice_remaining),
            self.billing_cycle.label(),
        )
    }

    /// `Prepaid credit $C; used $U; balance $B`.
    #[must_use]
    pub fn prepaid_detail(&self) -> String {
        format!(
            "Prepaid credit {}; used {}; balance {}",
            display(self.prepaid_credit),
            display(self.prepaid_used),
            display(self.prepaid_balance),
        )
    }

    /// Whether every input field was readable.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

fn display(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), format_dollars)
}

/// Compute the display figures for a snapshot.
#[must_use]
pub fn compute(snapshot: &BillingSnapshot) -> DisplayFigures {
    let mut unavailable = Vec::new();
    let mut cents = |field: MonetaryField| match snapshot.field(field).cents(field) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(
                field = %field,
                raw = ?snapshot.field(field).as_str(),
                error = %err,
                "Billing field unavailable"
            );
            unavailable.push(field);
            None
        }
    };

    let amount_after_vat = cents(MonetaryField::AmountAfterVat);
    let prepaid_credits = cents(MonetaryField::PrepaidCredits);
    let prepaid_credits_used = cents(MonetaryField::PrepaidCreditsUsed);
    let limit = cents(MonetaryField::EffectiveSpendingLimit);

    let invoice_limit = limit.map(to_dollars);
    let invoice_used = amount_after_vat.map(to_dollars);
    let invoice_remaining = invoice_limit
        .zip(invoice_used)
        .map(|(limit, used)| limit - used);

    let prepaid_credit = prepaid_credits.map(|value| -to_dollars(value));
    let prepaid_used = prepaid_credits_used.map(|value| -to_dollars(value));
    let prepaid_balance = prepaid_credit
        .zip(prepaid_used)
        .map(|(credit, used)| credit - used);

    let prepaid_remaining = prepaid_credits
        .zip(prepaid_credits_used)
        .map(|(credits, used)| (credits - used).abs() / CENTS_PER_DOLLAR);
    let invoice_left = limit
        .zip(amount_after_vat)
        .map(|(limit, used)| (limit - used) / CENTS_PER_DOLLAR);

    DisplayFigures {
        invoice_limit,
        invoice_used,
        invoice_remaining,
        prepaid_credit,
        prepaid_used,
        prepaid_balance,
        status_bar_summary: summarize(prepaid_remaining, invoice_left),
        billing_cycle: snapshot.billing_cycle,
        unavailable,
    }
}

fn to_dollars(cents: f64) -> f64 {
    cents / CENTS_PER_DOLLAR
}

/// Build the status bar text from the prepaid and invoice remainders.
///
/// Each available remainder that does not round to `0.00` contributes a
/// `$X.XX` part, prepaid first; parts are joined by a single space. With
/// no parts the summary is `$0.00`.
#[must_use]
pub fn summarize(prepaid_remaining: Option<f64>, invoice_remaining: Option<f64>) -> String {
    let parts: Vec<String> = [prepaid_remaining, invoice_remaining]
        .into_iter()
        .flatten()
        .filter(|value| !rounds_to_zero(*value))
        .map(format_dollars)
        .collect();

    if parts.is_empty() {
        ZERO_SUMMARY.to_string()
    } else {
        parts.join(" ")
    }
}
