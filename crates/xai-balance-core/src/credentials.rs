//! API credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BalanceError, Result};

/// Management API key and the team it belongs to.
///
/// Owned by the credential store and passed by value to whoever needs it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Management API key, sent as a bearer token.
    pub api_key: String,
    /// Team whose invoice is queried.
    pub team_id: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(api_key: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            team_id: team_id.into(),
        }
    }

    /// Whether both the key and the team id are non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.team_id.trim().is_empty()
    }

    /// Return the credentials if they are complete.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::NoCredentials`] if either part is blank.
    pub fn into_complete(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(BalanceError::NoCredentials)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("team_id", &self.team_id)
            .finish()
    }
}
