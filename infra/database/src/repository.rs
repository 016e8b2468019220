use crate::Database;
use crate::error::{DatabaseError, DatabaseErrorExt};
use paywall_domain::constants::{ARTICLE, USER};
use paywall_domain::models::{Article, User};
use paywall_domain::store::{ArticleCatalog, UserDirectory};
use surrealdb::types::SurrealValue;
use tracing::instrument;

const USER_FIELDS: &str = "record::id(id) AS id, username";
const ARTICLE_FIELDS: &str =
    "record::id(id) AS id, author, title, content, preview, minutes_to_read, date";

#[derive(Debug, SurrealValue)]
struct UserRow {
    id: i64,
    username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self { id: row.id, username: row.username }
    }
}

#[derive(Debug, SurrealValue)]
struct ArticleRow {
    id: i64,
    author: String,
    title: String,
    content: String,
    preview: String,
    minutes_to_read: i64,
    date: String,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DatabaseError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let minutes_to_read =
            u32::try_from(row.minutes_to_read).map_err(|e| DatabaseError::Decode {
                message: e.to_string().into(),
                context: Some(format!("article:{} minutes_to_read", row.id).into()),
            })?;

        Ok(Self {
            id: row.id,
            author: row.author,
            title: row.title,
            content: row.content,
            preview: row.preview,
            minutes_to_read,
            date: row.date,
        })
    }
}

impl UserDirectory for Database {
    type Error = DatabaseError;

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let rows = self
            .query(format!("SELECT {USER_FIELDS} FROM {USER} WHERE username = $username LIMIT 1"))
            .bind(("username", username.to_owned()))
            .await
            .context("Looking up user by username")?
            .take::<Vec<UserRow>>(0)
            .context("Parsing user")?;

        Ok(rows.into_iter().next().map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let rows = self
            .query(format!("SELECT {USER_FIELDS} FROM {USER} WHERE record::id(id) = $id LIMIT 1"))
            .bind(("id", id))
            .await
            .context("Looking up user by id")?
            .take::<Vec<UserRow>>(0)
            .context("Parsing user")?;

        Ok(rows.into_iter().next().map(User::from))
    }
}

impl ArticleCatalog for Database {
    type Error = DatabaseError;

    #[instrument(skip(self))]
    async fn find_article(&self, id: i64) -> Result<Option<Article>, DatabaseError> {
        let rows = self
            .query(format!("SELECT {ARTICLE_FIELDS} FROM {ARTICLE} WHERE record::id(id) = $id LIMIT 1"))
            .bind(("id", id))
            .await
            .context("Looking up article")?
            .take::<Vec<ArticleRow>>(0)
            .context("Parsing article")?;

        rows.into_iter().next().map(Article::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_articles(&self) -> Result<Vec<Article>, DatabaseError> {
        let rows = self
            .query(format!("SELECT {ARTICLE_FIELDS} FROM {ARTICLE} ORDER BY id"))
            .await
            .context("Listing articles")?
            .take::<Vec<ArticleRow>>(0)
            .context("Parsing articles")?;

        rows.into_iter().map(Article::try_from).collect()
    }
}
