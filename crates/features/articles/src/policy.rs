//! Page-view quota for single-article reads.
//!
//! Each session carries one counter of attempted views, shared by every article. An attempt
//! always counts, whether it is served, refused or names a missing article. Once the counter
//! passes the quota every further attempt is refused without touching the catalog, until the
//! session is cleared.

use crate::error::{ArticlesError, ArticlesErrorExt};
use paywall_domain::config::PaywallConfig;
use paywall_domain::models::Article;
use paywall_domain::store::ArticleCatalog;
use paywall_kernel::BoxError;
use paywall_kernel::server::Session;
use tracing::debug;

/// Result of one view attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    Served(Article),
    NotFound,
    LimitExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPolicy {
    quota: u32,
}

impl ViewPolicy {
    #[must_use]
    pub const fn new(quota: u32) -> Self {
        Self { quota }
    }

    /// Views a session may attempt before it is refused.
    #[must_use]
    pub const fn quota(&self) -> u32 {
        self.quota
    }

    /// Counts one view attempt against the session and, while under quota, fetches the article.
    ///
    /// The incremented counter is written to the session before the catalog is consulted, so
    /// it stays counted even when the lookup fails.
    ///
    /// # Errors
    /// [`ArticlesError::Store`] if the catalog lookup fails.
    pub async fn attempt_view<C>(
        &self,
        session: &Session,
        catalog: &C,
        article_id: i64,
    ) -> Result<ViewOutcome, ArticlesError>
    where
        C: ArticleCatalog,
    {
        let views = session.page_views().saturating_add(1);
        session.set_page_views(views);

        if views > self.quota {
            debug!(views, quota = self.quota, article_id, "Page view limit reached");
            return Ok(ViewOutcome::LimitExceeded);
        }

        let article = catalog
            .find_article(article_id)
            .await
            .map_err(BoxError::from)
            .context(format!("Looking up article {article_id}"))?;

        Ok(article.map_or(ViewOutcome::NotFound, ViewOutcome::Served))
    }
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self::from(&PaywallConfig::default())
    }
}

impl From<&PaywallConfig> for ViewPolicy {
    fn from(config: &PaywallConfig) -> Self {
        Self::new(config.max_page_views)
    }
}

/// Every article, ordered by id. Reading the list is never counted.
///
/// # Errors
/// [`ArticlesError::Store`] if the catalog fails.
pub async fn list_articles<C>(catalog: &C) -> Result<Vec<Article>, ArticlesError>
where
    C: ArticleCatalog,
{
    catalog.list_articles().await.map_err(BoxError::from).context("Listing articles")
}
