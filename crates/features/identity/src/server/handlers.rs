use crate::error::IdentityError;
use crate::service;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use paywall_database::Database;
use paywall_derive::{api_handler, api_model};
use paywall_domain::constants::IDENTITY_TAG;
use paywall_domain::models::User;
use paywall_kernel::server::{ApiError, ErrorResponse, Session};

#[api_model(deny_unknown_fields = false)]
/// Login payload
pub struct LoginRequest {
    /// A missing or null username is treated like an unknown one.
    pub username: Option<String>,
}

#[api_model]
/// Public view of a user
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { id: user.id, username: user.username }
    }
}

#[api_handler(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = OK, description = "User bound to the session", body = UserResponse),
        (status = NOT_FOUND, description = "Unknown or missing username", body = ErrorResponse),
        (status = BAD_REQUEST, description = "Malformed JSON body", body = ErrorResponse),
    ),
    tag = IDENTITY_TAG,
)]
pub(super) async fn login_handler(
    State(db): State<Database>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(payload) = payload?;
    let username = payload
        .username
        .ok_or(IdentityError::UserNotFound { context: Some("missing username".into()) })?;

    let user = service::login(&db, &session, &username).await?;
    Ok(Json(user.into()))
}

#[api_handler(
    delete,
    path = "/logout",
    responses((status = NO_CONTENT, description = "User unbound from the session")),
    tag = IDENTITY_TAG,
)]
pub(super) async fn logout_handler(session: Session) -> StatusCode {
    service::logout(&session);
    StatusCode::NO_CONTENT
}

#[api_handler(
    get,
    path = "/check_session",
    responses(
        (status = OK, description = "User bound to the session", body = UserResponse),
        (status = UNAUTHORIZED, description = "No user in session; empty object"),
        (status = NOT_FOUND, description = "Session user no longer exists", body = ErrorResponse),
    ),
    tag = IDENTITY_TAG,
)]
pub(super) async fn check_session_handler(
    State(db): State<Database>,
    session: Session,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service::check_session(&db, &session).await?;
    Ok(Json(user.into()))
}

#[api_handler(
    delete,
    path = "/clear",
    responses((status = NO_CONTENT, description = "Session data dropped")),
    tag = IDENTITY_TAG,
)]
pub(super) async fn clear_handler(session: Session) -> StatusCode {
    service::clear_session(&session);
    StatusCode::NO_CONTENT
}
