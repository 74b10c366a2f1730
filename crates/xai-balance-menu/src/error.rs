//! Error types for the menu host.

use xai_balance_client::FetchError;

use crate::config::ConfigError;
use crate::controller::RefreshError;
use crate::credentials::StoreError;

/// Any error the menu host can surface.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Credential store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The refresh controller has stopped.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// The billing client could not be built.
    #[error(transparent)]
    Client(#[from] FetchError),
}
