use paywall_domain::constants::USER_NOT_FOUND;
use paywall_kernel::BoxError;
use paywall_kernel::server::ApiError;
use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[paywall_derive::paywall_error]
pub enum IdentityError {
    /// No user matches the submitted username, or the session points at a user that no
    /// longer exists.
    #[error("User not found{}", format_context(.context))]
    UserNotFound { context: Option<Cow<'static, str>> },

    /// The session carries no user id.
    #[error("No authenticated user in session{}", format_context(.context))]
    Unauthenticated { context: Option<Cow<'static, str>> },

    /// The user directory failed to answer.
    #[error("User directory error{}: {source}", format_context(.context))]
    Store { source: BoxError, context: Option<Cow<'static, str>> },
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::UserNotFound { context } => {
                Self::NotFound { message: USER_NOT_FOUND.into(), context }
            },
            IdentityError::Unauthenticated { context } => Self::Unauthenticated { context },
            err @ IdentityError::Store { .. } => Self::from(err.to_string()),
        }
    }
}
