mod handlers;

use paywall_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub use handlers::ArticleResponse;

/// `/articles` and `/articles/{id}`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_articles_handler))
        .routes(routes!(handlers::get_article_handler))
}
