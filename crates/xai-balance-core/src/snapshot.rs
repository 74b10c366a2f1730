//! Billing snapshot types.
//!
//! A snapshot is the parsed invoice preview for one team and one billing
//! cycle. It is immutable once built; every refresh produces a new one.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BalanceError, Result};
use crate::money::{DecimalString, MonetaryField};

/// The year/month window a snapshot pertains to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingCycle {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, `1..=12`.
    pub month: u32,
}

impl BillingCycle {
    /// Create a billing cycle, checking that it names a real month.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidBillingCycle`] if `month` is outside
    /// `1..=12` or the year is out of the supported calendar range.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or(BalanceError::InvalidBillingCycle { year, month })
    }

    /// `YYYY-MM` label shown next to the invoice figures.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parsed invoice preview.
///
/// All monetary fields are in cents, exactly as the API sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSnapshot {
    /// Invoice amount used this cycle.
    pub amount_after_vat: DecimalString,
    /// Prepaid credits (signed; negative means credit available).
    pub prepaid_credits: DecimalString,
    /// Prepaid credits consumed (signed).
    pub prepaid_credits_used: DecimalString,
    /// Postpaid spending limit.
    pub effective_spending_limit: DecimalString,
    /// Cycle the figures belong to.
    pub billing_cycle: BillingCycle,
}

impl BillingSnapshot {
    /// Look up a monetary field by name.
    #[must_use]
    pub fn field(&self, field: MonetaryField) -> &DecimalString {
        match field {
            MonetaryField::AmountAfterVat => &self.amount_after_vat,
            MonetaryField::PrepaidCredits => &self.prepaid_credits,
            MonetaryField::PrepaidCreditsUsed => &self.prepaid_credits_used,
            MonetaryField::EffectiveSpendingLimit => &self.effective_spending_limit,
        }
    }
}
