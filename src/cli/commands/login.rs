use crate::api::ApiClient;
use crate::auth::AuthManager;
use crate::cli::Context;
use crate::error::{FleetError, Result};
use std::io::{self, Write};

pub async fn execute(ctx: &Context, email: Option<String>) -> Result<()> {
    let base_url = ctx.base_url()?;
    let client = ApiClient::new(&base_url)?;

    let email = email
        .or_else(|| ctx.config.api.email.clone())
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| {
            FleetError::ConfigError(
                "No email given. Pass --email or set api.email / FLEETWATCH_EMAIL".to_string(),
            )
        })?;

    let password = read_password(&email)?;

    let auth = AuthManager::new()?;
    let session = auth.login(&client, &email, &password).await?;

    println!("✓ Logged in as {} ({})", session.user.name, session.user.role.label_tr());
    println!("  API: {}", session.base_url);
    println!("  Expires in: {}", session.expiration_display());

    Ok(())
}

/// FLEETWATCH_PASSWORD wins over the interactive prompt
fn read_password(email: &str) -> Result<String> {
    if let Ok(password) = std::env::var("FLEETWATCH_PASSWORD") {
        tracing::debug!("Using FLEETWATCH_PASSWORD from environment");
        return Ok(password);
    }

    print!("Password for {}: ", email);
    io::stdout().flush().map_err(FleetError::Io)?;

    let mut password = String::new();
    io::stdin().read_line(&mut password).map_err(FleetError::Io)?;

    let password = password.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(FleetError::AuthenticationFailed(
            "Empty password".to_string(),
        ));
    }
    Ok(password)
}
