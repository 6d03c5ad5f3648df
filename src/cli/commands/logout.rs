use crate::auth::AuthManager;
use crate::cli::Context;
use crate::error::Result;

pub fn execute(ctx: &Context) -> Result<()> {
    let base_url = ctx.base_url()?;
    let client = crate::api::ApiClient::new(&base_url)?;

    let auth = AuthManager::new()?;
    if auth.logout(client.base_url())? {
        println!("✓ Logged out from {}", client.base_url());
    } else {
        println!("No session found for {}", client.base_url());
    }

    Ok(())
}
