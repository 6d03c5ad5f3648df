use crate::api::ApiClient;
use crate::auth::AuthManager;
use crate::cli::Context;
use crate::error::{FleetError, Result};
use crate::models::SessionToken;

pub async fn execute(ctx: &Context, json: bool, verify: bool) -> Result<()> {
    let base_url = match ctx.base_url() {
        Ok(url) => url,
        Err(_) => {
            if json {
                println!("{{\"active\":false,\"reason\":\"not_configured\"}}");
            } else {
                println!("API URL not configured");
            }
            std::process::exit(1);
        }
    };

    let client = ApiClient::new(&base_url)?;
    let auth = AuthManager::new()?;

    let Some(session) = auth.get_cached_token(client.base_url())? else {
        if json {
            println!("{{\"active\":false,\"reason\":\"no_session\"}}");
        } else {
            println!("No active session for {}", client.base_url());
        }
        std::process::exit(1);
    };

    let accepted = if verify {
        Some(verify_session(&client, &session).await?)
    } else {
        None
    };

    if json {
        let status = serde_json::json!({
            "active": accepted.unwrap_or(true),
            "api": session.base_url,
            "user": session.user.email,
            "role": session.user.role,
            "station_id": session.user.station_id,
            "expires_in_minutes": session.expires_in_minutes(),
            "verified": accepted,
        });
        println!("{}", status);
    } else {
        println!(
            "Session active for {} ({}) on {}",
            session.user.email,
            session.user.role.label_tr(),
            session.base_url
        );
        println!("Expires in {}", session.expiration_display());
        match accepted {
            Some(true) => println!("✓ Token accepted by the API"),
            Some(false) => println!("✗ Token rejected by the API - run 'fleetwatch login'"),
            None => {}
        }
    }

    if accepted == Some(false) {
        std::process::exit(1);
    }
    Ok(())
}

/// Whether `GET /api/auth/me` still accepts the cached token
async fn verify_session(client: &ApiClient, session: &SessionToken) -> Result<bool> {
    let client = client.clone().with_token(session.token.clone());
    match client.me().await {
        Ok(user) => {
            tracing::debug!("Token valid for {} ({})", user.email, user.role);
            Ok(true)
        }
        Err(FleetError::TokenExpired) => Ok(false),
        Err(e) => Err(e),
    }
}
