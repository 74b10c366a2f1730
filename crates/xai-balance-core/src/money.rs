//! Monetary values as transmitted by the billing API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BalanceError, Result};

/// Number of minor units (cents) in one display unit.
pub const CENTS_PER_DOLLAR: f64 = 100.0;

/// The monetary fields of an invoice preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonetaryField {
    /// Invoice amount used this cycle (`coreInvoice.amountAfterVat`).
    AmountAfterVat,
    /// Prepaid credits, negative on the wire (`coreInvoice.prepaidCredits.val`).
    PrepaidCredits,
    /// Prepaid credits consumed (`coreInvoice.prepaidCreditsUsed.val`).
    PrepaidCreditsUsed,
    /// Postpaid spending limit (`effectiveSpendingLimit`).
    EffectiveSpendingLimit,
}

impl MonetaryField {
    /// All fields, in wire order.
    pub const ALL: [Self; 4] = [
        Self::AmountAfterVat,
        Self::PrepaidCredits,
        Self::PrepaidCreditsUsed,
        Self::EffectiveSpendingLimit,
    ];

    /// Name of the field in the API response.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::AmountAfterVat => "amountAfterVat",
            Self::PrepaidCredits => "prepaidCredits",
            Self::PrepaidCreditsUsed => "prepaidCreditsUsed",
            Self::EffectiveSpendingLimit => "effectiveSpendingLimit",
        }
    }
}

impl fmt::Display for MonetaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A decimal amount of cents, kept exactly as received.
///
/// Decoding never fails on the value itself: strings are kept verbatim,
/// numbers are kept in their textual form, `null` and absent keys become
/// [`DecimalString::missing`], and anything else is kept as raw JSON text
/// (which will not parse). Interpretation happens in [`DecimalString::cents`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecimalString(Option<String>);

impl DecimalString {
    /// Wrap a raw decimal string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Some(raw.into()))
    }

    /// A value that was not present in the response.
    #[must_use]
    pub const fn missing() -> Self {
        Self(None)
    }

    /// The raw text, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether the value was absent.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.0.is_none()
    }

    /// Parse the amount in cents.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::FieldUnavailable`] if the value is missing,
    /// empty, non-numeric or not finite.
    pub fn cents(&self, field: MonetaryField) -> Result<f64> {
        self.0
            .as_deref()
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .ok_or(BalanceError::FieldUnavailable { field })
    }

    /// Parse the amount and convert it to display units.
    ///
    /// # Errors
    ///
    /// Same as [`DecimalString::cents`].
    pub fn dollars(&self, field: MonetaryField) -> Result<f64> {
        Ok(self.cents(field)? / CENTS_PER_DOLLAR)
    }
}

impl From<&str> for DecimalString {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for DecimalString {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl Serialize for DecimalString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DecimalString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => Self::missing(),
            serde_json::Value::String(raw) => Self::new(raw),
            serde_json::Value::Number(number) => Self::new(number.to_string()),
            other => Self::new(other.to_string()),
        })
    }
}

/// Format an amount as `$X.XX`.
///
/// Negative amounts keep their sign after the dollar sign (`$-150.00`).
/// Anything that rounds to zero prints as `$0.00`.
#[must_use]
pub fn format_dollars(value: f64) -> String {
    let formatted = format!("{value:.2}");
    if formatted == "-0.00" {
        return "$0.00".to_string();
    }
    format!("${formatted}")
}

/// Whether an amount is shown as `0.00` at two decimals.
#[must_use]
pub fn rounds_to_zero(value: f64) -> bool {
    format!("{:.2}", value.abs()) == "0.00"
}
