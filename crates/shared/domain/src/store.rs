//! Typed query contracts for the persistence store.
//!
//! The store is read-only from the application's point of view: users and
//! articles are looked up by primary key or exact field match, never written.

use crate::models::{Article, User};
use std::error::Error;
use std::future::Future;

/// Lookups against the `user` table.
pub trait UserDirectory: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send;

    fn find_user_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send;
}

/// Lookups against the `article` table.
pub trait ArticleCatalog: Send + Sync {
    type Error: Error + Send + Sync + 'static;

    fn find_article(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send;

    /// Every article, ordered by id.
    fn list_articles(&self) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send;
}
