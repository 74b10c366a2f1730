//! What the host UI renders.
//!
//! The controller publishes a [`DisplayState`] after every transition. Hosts
//! read the three strings (status bar title, invoice line, prepaid line) and
//! may use the retained figures for a details view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use xai_balance_core::{BillingSnapshot, DisplayFigures};

/// Status bar text when no API key is configured.
pub const NO_KEY_SUMMARY: &str = "No API Key";
/// Status bar text after a failed refresh.
pub const ERROR_SUMMARY: &str = "Error";
/// Status bar text while the first fetch is in flight.
pub const LOADING_SUMMARY: &str = "Loading...";

/// Invoice line when no API key is configured.
pub const INVOICE_NO_KEY: &str = "Invoice: no key";
/// Prepaid line when no API key is configured.
pub const PREPAID_NO_KEY: &str = "Prepaid: no key";
/// Invoice line after a failed refresh.
pub const INVOICE_ERROR: &str = "Invoice: error";
/// Prepaid line after a failed refresh.
pub const PREPAID_ERROR: &str = "Prepaid: error";
/// Invoice line while the first fetch is in flight.
pub const INVOICE_LOADING: &str = "Invoice: loading...";
/// Prepaid line while the first fetch is in flight.
pub const PREPAID_LOADING: &str = "Prepaid: loading...";

/// Where the controller is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPhase {
    /// No usable credentials; nothing is fetched.
    NoCredentials,
    /// Last refresh succeeded.
    Idle,
    /// A fetch is in flight.
    Refreshing,
    /// Last refresh failed.
    Error,
}

/// Everything the presentation layer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    /// Current phase.
    pub phase: RefreshPhase,
    /// Status bar title.
    pub summary: String,
    /// Invoice menu line.
    pub invoice_detail: String,
    /// Prepaid menu line.
    pub prepaid_detail: String,
    /// Figures from the last successful refresh.
    ///
    /// Kept across failed refreshes, so a details view can still show the
    /// last-known numbers while the strings above read "error".
    pub figures: Option<DisplayFigures>,
    /// Snapshot the figures were computed from.
    pub snapshot: Option<BillingSnapshot>,
    /// When the figures were last replaced.
    pub last_updated: Option<DateTime<Utc>>,
    /// Message of the last failed refresh, cleared on success.
    pub last_error: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            phase: RefreshPhase::NoCredentials,
            summary: NO_KEY_SUMMARY.to_string(),
            invoice_detail: INVOICE_NO_KEY.to_string(),
            prepaid_detail: PREPAID_NO_KEY.to_string(),
            figures: None,
            snapshot: None,
            last_updated: None,
            last_error: None,
        }
    }
}

impl DisplayState {
    /// No credentials: no-key markers, figures untouched.
    #[must_use]
    pub fn without_credentials(&self) -> Self {
        Self {
            phase: RefreshPhase::NoCredentials,
            summary: NO_KEY_SUMMARY.to_string(),
            invoice_detail: INVOICE_NO_KEY.to_string(),
            prepaid_detail: PREPAID_NO_KEY.to_string(),
            ..self.clone()
        }
    }

    /// A fetch started.
    ///
    /// Loading markers replace the strings when there is nothing to show yet
    /// or the no-key markers are up; otherwise the previous strings stay.
    #[must_use]
    pub fn refreshing(&self) -> Self {
        let mut next = Self {
            phase: RefreshPhase::Refreshing,
            ..self.clone()
        };
        if self.figures.is_none() || self.phase == RefreshPhase::NoCredentials {
            next.summary = LOADING_SUMMARY.to_string();
            next.invoice_detail = INVOICE_LOADING.to_string();
            next.prepaid_detail = PREPAID_LOADING.to_string();
        }
        next
    }

    /// A fetch succeeded: everything is replaced.
    #[must_use]
    pub fn succeeded(
        &self,
        snapshot: BillingSnapshot,
        figures: DisplayFigures,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            phase: RefreshPhase::Idle,
            summary: figures.status_bar_summary.clone(),
            invoice_detail: figures.invoice_detail(),
            prepaid_detail: figures.prepaid_detail(),
            figures: Some(figures),
            snapshot: Some(snapshot),
            last_updated: Some(at),
            last_error: None,
        }
    }

    /// A fetch failed: error markers, previous figures kept.
    #[must_use]
    pub fn failed(&self, error: impl Into<String>) -> Self {
        Self {
            phase: RefreshPhase::Error,
            summary: ERROR_SUMMARY.to_string(),
            invoice_detail: INVOICE_ERROR.to_string(),
            prepaid_detail: PREPAID_ERROR.to_string(),
            last_error: Some(error.into()),
            ..self.clone()
        }
    }
}
