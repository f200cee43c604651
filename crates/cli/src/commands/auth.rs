//! Login, registration and logout.

use tracing::{info, instrument};

use qkart_storefront::{AuthService, Operation};

use super::{CommandError, Context};
use crate::output;

/// Log in and persist the session.
///
/// # Errors
///
/// Returns an error if validation or login fails, or the session cannot be saved.
#[instrument(skip(ctx, password))]
pub async fn login(ctx: &Context, username: &str, password: &str) -> Result<(), CommandError> {
    let session = AuthService::new(&ctx.client)
        .login(username, password)
        .await
        .map_err(CommandError::storefront(Operation::Login))?;

    ctx.sessions.save(&session).await?;

    output::notice("Logged in successfully");
    output::session(Some(&session));
    Ok(())
}

/// Register a new account.
///
/// # Errors
///
/// Returns an error if validation or registration fails.
#[instrument(skip(ctx, password, confirm_password))]
pub async fn register(
    ctx: &Context,
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), CommandError> {
    AuthService::new(&ctx.client)
        .register(username, password, confirm_password)
        .await
        .map_err(CommandError::storefront(Operation::Register))?;

    output::notice("Registered successfully");
    Ok(())
}

/// Forget the saved session.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub async fn logout(ctx: &Context) -> Result<(), CommandError> {
    if ctx.sessions.clear().await? {
        info!("Session cleared");
        output::notice("Logged out");
    } else {
        output::notice("Not logged in");
    }
    Ok(())
}

/// Show who is logged in.
///
/// # Errors
///
/// Returns an error if the session file is unreadable.
pub async fn whoami(ctx: &Context) -> Result<(), CommandError> {
    let session = ctx.sessions.load().await?;
    output::session(session.as_ref());
    Ok(())
}
