//! xAI balance menu - headless host.
//!
//! Renders the menu state to the log instead of a status bar.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xai_balance_client::{BillingClient, ClientOptions};
use xai_balance_menu::{
    ChainedCredentialStore, CredentialStore, DisplayState, EnvCredentialStore,
    FileCredentialStore, MenuConfig, RefreshController,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,xai_balance=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting xAI balance menu");

    let config = MenuConfig::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        refresh_interval_secs = config.refresh_interval.as_secs(),
        credentials_file = %config.credentials_file.display(),
        "Configuration loaded"
    );

    let client = BillingClient::with_options(
        &config.base_url,
        ClientOptions::with_timeout(config.request_timeout_seconds),
    )?;
    let store = ChainedCredentialStore::new(
        FileCredentialStore::new(&config.credentials_file),
        EnvCredentialStore,
    );

    let (handle, controller) = RefreshController::spawn(Arc::new(client), config.refresh_interval);
    let renderer = handle.on_change(render);

    match store.load() {
        Ok(Some(credentials)) => {
            tracing::info!(team_id = %credentials.team_id, "API key loaded");
            handle.set_credentials(credentials)?;
        }
        Ok(None) => {
            tracing::info!("No API key found");
            handle.refresh()?;
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load credentials");
            handle.refresh()?;
        }
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    handle.shutdown();
    controller.await?;
    renderer.abort();

    Ok(())
}

fn render(state: &DisplayState) {
    tracing::info!(phase = ?state.phase, title = %state.summary, "Status bar updated");
    tracing::info!(
        invoice = %state.invoice_detail,
        prepaid = %state.prepaid_detail,
        "Menu items updated"
    );
}
