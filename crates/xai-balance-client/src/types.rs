//! Wire types for the invoice preview endpoint.

use serde::{Deserialize, Serialize};
use xai_balance_core::{BalanceError, BillingCycle, BillingSnapshot, DecimalString};

/// Body of `GET /v1/billing/teams/{teamId}/postpaid/invoice/preview`.
///
/// `coreInvoice` and `billingCycle` are required; monetary values may be
/// missing or malformed and are left for the calculator to judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePreviewResponse {
    /// Invoice amounts.
    pub core_invoice: CoreInvoice,
    /// Postpaid spending limit in cents.
    #[serde(default)]
    pub effective_spending_limit: DecimalString,
    /// Cycle the preview covers.
    pub billing_cycle: BillingCycleBody,
}

/// Invoice amounts in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreInvoice {
    /// Amount used this cycle, VAT included.
    #[serde(default)]
    pub amount_after_vat: DecimalString,
    /// Prepaid credits.
    #[serde(default)]
    pub prepaid_credits: Option<Amount>,
    /// Prepaid credits used.
    #[serde(default)]
    pub prepaid_credits_used: Option<Amount>,
}

/// A `{"val": "..."}` wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Amount {
    /// Amount in cents.
    #[serde(default)]
    pub val: DecimalString,
}

/// Billing cycle as sent by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BillingCycleBody {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
}

impl InvoicePreviewResponse {
    /// Convert to a [`BillingSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidBillingCycle`] if the cycle does not
    /// name a real month.
    pub fn into_snapshot(self) -> Result<BillingSnapshot, BalanceError> {
        let billing_cycle = BillingCycle::new(self.billing_cycle.year, self.billing_cycle.month)?;
        let val = |amount: Option<Amount>| amount.map(|a| a.val).unwrap_or_default();

        Ok(BillingSnapshot {
            amount_after_vat: self.core_invoice.amount_after_vat,
            prepaid_credits: val(self.core_invoice.prepaid_credits),
            prepaid_credits_used: val(self.core_invoice.prepaid_credits_used),
            effective_spending_limit: self.effective_spending_limit,
            billing_cycle,
        })
    }
}
