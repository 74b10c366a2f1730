//! xAI balance menu.
//!
//! Polls the xAI management API for the team's invoice preview and keeps
//! the status bar title and menu lines up to date:
//!
//! - **Controller**: [`RefreshController`] owns the refresh state and timer
//! - **Display**: [`DisplayState`] is what the host UI renders
//! - **Credentials**: [`CredentialStore`] implementations and [`submit_credentials`]
//! - **Config**: [`MenuConfig`] from environment variables
//!
//! The host (status bar, dialogs, login items) is not part of this crate;
//! it drives a [`RefreshHandle`] and renders whatever state it publishes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod controller;
pub mod credentials;
pub mod display;
pub mod error;

pub use config::{ConfigError, MenuConfig};
pub use controller::{RefreshController, RefreshError, RefreshHandle, DEFAULT_REFRESH_INTERVAL};
pub use credentials::{
    submit_credentials, ChainedCredentialStore, CredentialStore, EnvCredentialStore,
    FileCredentialStore, MemoryCredentialStore, StoreError,
};
pub use display::{DisplayState, RefreshPhase};
pub use error::MenuError;
