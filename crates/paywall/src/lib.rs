//! Facade crate for the paywall features and shared modules.
//! Re-exports domain/kernel primitives and composes the feature routers.
//! Keep this crate thin: it should compose other crates, not implement business logic.

pub use paywall_articles as articles;
pub use paywall_database as database;
pub use paywall_domain as domain;
pub use paywall_identity as identity;
pub use paywall_kernel as kernel;

pub mod server {
    use paywall_kernel::server::{ApiState, system_router};
    use utoipa_axum::router::OpenApiRouter;

    /// Every route of the service: system, identity and articles.
    #[must_use]
    pub fn router() -> OpenApiRouter<ApiState> {
        system_router().merge(paywall_identity::router()).merge(paywall_articles::router())
    }

}
