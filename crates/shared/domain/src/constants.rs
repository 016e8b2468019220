//! Shared string constants: `OpenAPI` tags, table names, session keys and
//! client-facing messages.

pub const SYSTEM_TAG: &str = "System";
pub const IDENTITY_TAG: &str = "Identity";
pub const ARTICLES_TAG: &str = "Articles";

pub const USER: &str = "user";
pub const ARTICLE: &str = "article";

/// Session key holding the authenticated user's id.
pub const SESSION_USER_ID: &str = "user_id";
/// Session key holding the number of single-article views attempted.
pub const SESSION_PAGE_VIEWS: &str = "page_views";

pub const USER_NOT_FOUND: &str = "User not found";
pub const ARTICLE_NOT_FOUND: &str = "Article not found";
pub const PAGE_VIEW_LIMIT_REACHED: &str = "Maximum pageview limit reached";
