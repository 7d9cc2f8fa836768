//! Driven port for news articles.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{Article, ArticleCategory, ArticleDraft, ArticleFilters};
use crate::domain::{Credentials, Error, ListQuery};

/// Article operations; writes require an admin session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesPort: Send + Sync {
    /// One page of articles.
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<ArticleFilters>,
    ) -> Result<Paginated<Article>, Error>;

    /// Article by URL slug.
    async fn by_slug(&self, slug: &str) -> Result<Article, Error>;

    /// Article by identifier, for edit forms.
    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Article, Error>;

    /// Every category.
    async fn categories(&self) -> Result<Vec<ArticleCategory>, Error>;

    /// Create an article.
    async fn create(&self, credentials: &Credentials, draft: &ArticleDraft) -> Result<Article, Error>;

    /// Replace an article's editable fields.
    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article, Error>;

    /// Delete an article.
    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;
}
