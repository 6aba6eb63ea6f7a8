//! `spindex login` -- run the interactive authentication flow

use std::sync::Arc;

use colored::Colorize;

use crate::auth::session::{AuthParams, Authenticator};
use crate::config::Config;
use crate::error::Result;

/// Runs the full interactive login and reports the outcome.
///
/// The obtained token only lives in this process, so the command is mostly
/// useful as a connectivity check; the other commands authenticate on
/// demand.
pub async fn run_login(config: Config) -> Result<()> {
    let http = Arc::new(reqwest::Client::new());
    let auth = Authenticator::new(AuthParams::from_config(&config), http);

    let creds = auth.login().await?;

    println!("{}", "✓ Authentication successful".green());
    tracing::debug!(
        "Received access token of {} chars and refresh token of {} chars",
        creds.access_token.len(),
        creds.refresh_token.len()
    );
    Ok(())
}
