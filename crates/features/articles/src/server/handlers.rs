use crate::policy::{self, ViewOutcome, ViewPolicy};
use axum::Json;
use axum::extract::{Path, State};
use paywall_database::Database;
use paywall_derive::{api_handler, api_model};
use paywall_domain::config::ApiConfig;
use paywall_domain::constants::{ARTICLE_NOT_FOUND, ARTICLES_TAG, PAGE_VIEW_LIMIT_REACHED};
use paywall_domain::models::Article;
use paywall_kernel::server::{ApiError, ErrorResponse, Session};

#[api_model(rename_all = "snake_case")]
/// Article as served to clients
pub struct ArticleResponse {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub content: String,
    pub preview: String,
    pub minutes_to_read: u32,
    pub date: String,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            author: article.author,
            title: article.title,
            content: article.content,
            preview: article.preview,
            minutes_to_read: article.minutes_to_read,
            date: article.date,
        }
    }
}

#[api_handler(
    get,
    path = "/articles",
    responses((status = OK, description = "Every article", body = Vec<ArticleResponse>)),
    tag = ARTICLES_TAG,
)]
pub(super) async fn list_articles_handler(
    State(db): State<Database>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let articles = policy::list_articles(&db).await?;
    Ok(Json(articles.into_iter().map(ArticleResponse::from).collect()))
}

#[api_handler(
    get,
    path = "/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = OK, description = "Article served; counts one page view", body = ArticleResponse),
        (status = NOT_FOUND, description = "No such article; still counted", body = ErrorResponse),
        (status = UNAUTHORIZED, description = "Page view limit reached", body = ErrorResponse),
    ),
    tag = ARTICLES_TAG,
)]
pub(super) async fn get_article_handler(
    State(db): State<Database>,
    State(config): State<ApiConfig>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let policy = ViewPolicy::from(&config.paywall);

    match policy.attempt_view(&session, &db, id).await? {
        ViewOutcome::Served(article) => Ok(Json(article.into())),
        ViewOutcome::NotFound => {
            Err(ApiError::NotFound { message: ARTICLE_NOT_FOUND.into(), context: None })
        },
        ViewOutcome::LimitExceeded => {
            Err(ApiError::Unauthorized { message: PAGE_VIEW_LIMIT_REACHED.into(), context: None })
        },
    }
}
