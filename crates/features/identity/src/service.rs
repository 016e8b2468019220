//! Session lifecycle operations.
//!
//! Every operation receives the session handle and the user directory it needs; nothing is
//! held in process-wide state.

use crate::error::{IdentityError, IdentityErrorExt};
use paywall_domain::models::User;
use paywall_domain::store::UserDirectory;
use paywall_kernel::BoxError;
use paywall_kernel::server::Session;
use tracing::{debug, info};

/// Binds the user named `username` to the session.
///
/// Only the username is checked; there is no password.
///
/// # Errors
/// [`IdentityError::UserNotFound`] if no user has that exact username, or
/// [`IdentityError::Store`] if the lookup itself fails.
pub async fn login<D>(directory: &D, session: &Session, username: &str) -> Result<User, IdentityError>
where
    D: UserDirectory,
{
    let user = directory
        .find_user_by_username(username)
        .await
        .map_err(BoxError::from)
        .context("Looking up user by username")?
        .ok_or(IdentityError::UserNotFound { context: None })?;

    session.set_user_id(user.id);
    info!(user_id = user.id, "User logged in");

    Ok(user)
}

/// Unbinds the user from the session. The page view counter is kept.
pub fn logout(session: &Session) {
    if let Some(user_id) = session.user_id() {
        info!(user_id, "User logged out");
    }
    session.remove_user_id();
}

/// Resolves the user bound to the session.
///
/// # Errors
/// * [`IdentityError::Unauthenticated`] if no user is bound.
/// * [`IdentityError::UserNotFound`] if the bound id no longer resolves.
/// * [`IdentityError::Store`] if the lookup itself fails.
pub async fn check_session<D>(directory: &D, session: &Session) -> Result<User, IdentityError>
where
    D: UserDirectory,
{
    // A zero id is never a real user and counts as no login.
    let user_id = session
        .user_id()
        .filter(|id| *id != 0)
        .ok_or(IdentityError::Unauthenticated { context: None })?;

    directory
        .find_user_by_id(user_id)
        .await
        .map_err(BoxError::from)
        .context("Looking up session user")?
        .ok_or_else(|| {
            debug!(user_id, "Session refers to a missing user");
            IdentityError::UserNotFound { context: Some(format!("user id {user_id}").into()) }
        })
}

/// Drops the bound user and the page view counter.
pub fn clear_session(session: &Session) {
    session.clear();
    debug!("Session cleared");
}
