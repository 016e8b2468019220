mod handlers;

use paywall_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub use handlers::{LoginRequest, UserResponse};

/// `/login`, `/logout`, `/check_session` and `/clear`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::login_handler))
        .routes(routes!(handlers::logout_handler))
        .routes(routes!(handlers::check_session_handler))
        .routes(routes!(handlers::clear_handler))
}
