//! Articles and projects adapters.

use async_trait::async_trait;
use pagination::Paginated;
use reqwest::Method;

use super::client::{ApiClient, NO_BODY};
use crate::domain::models::{
    Article, ArticleCategory, ArticleDraft, ArticleFilters, Project, ProjectDraft, ProjectFilters,
};
use crate::domain::ports::{ArticlesPort, ProjectsPort};
use crate::domain::{Credentials, Error, ListQuery};

/// [`ArticlesPort`] backed by `/articles`.
#[derive(Debug, Clone)]
pub struct ArticlesApi {
    client: ApiClient,
}

impl ArticlesApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArticlesPort for ArticlesApi {
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<ArticleFilters>,
    ) -> Result<Paginated<Article>, Error> {
        Ok(self
            .client
            .get_page(&["articles"], credentials, &query.query_pairs())
            .await?)
    }

    async fn by_slug(&self, slug: &str) -> Result<Article, Error> {
        Ok(self
            .client
            .get_data(&["articles", "slug", slug], &Credentials::Anonymous, &[])
            .await?)
    }

    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Article, Error> {
        Ok(self.client.get_data(&["articles", id], credentials, &[]).await?)
    }

    async fn categories(&self) -> Result<Vec<ArticleCategory>, Error> {
        Ok(self
            .client
            .get_data(&["articles", "categories"], &Credentials::Anonymous, &[])
            .await?)
    }

    async fn create(&self, credentials: &Credentials, draft: &ArticleDraft) -> Result<Article, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["articles"], credentials, Some(draft))
            .await?)
    }

    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article, Error> {
        Ok(self
            .client
            .send_data(Method::PATCH, &["articles", id], credentials, Some(draft))
            .await?)
    }

    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &["articles", id], credentials, NO_BODY)
            .await?)
    }
}

/// [`ProjectsPort`] backed by `/projects`.
#[derive(Debug, Clone)]
pub struct ProjectsApi {
    client: ApiClient,
}

impl ProjectsApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProjectsPort for ProjectsApi {
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<ProjectFilters>,
    ) -> Result<Paginated<Project>, Error> {
        Ok(self
            .client
            .get_page(&["projects"], credentials, &query.query_pairs())
            .await?)
    }

    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Project, Error> {
        Ok(self.client.get_data(&["projects", id], credentials, &[]).await?)
    }

    async fn create(&self, credentials: &Credentials, draft: &ProjectDraft) -> Result<Project, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["projects"], credentials, Some(draft))
            .await?)
    }

    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &ProjectDraft,
    ) -> Result<Project, Error> {
        Ok(self
            .client
            .send_data(Method::PATCH, &["projects", id], credentials, Some(draft))
            .await?)
    }

    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &["projects", id], credentials, NO_BODY)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::models::ArticleStatus;
    use httpmock::prelude::*;
    use pagination::PageRequest;
    use reqwest::Url;
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &MockServer) -> ApiClient {
        let url = Url::parse(&server.base_url()).expect("mock URL");
        ApiClient::new(&url, Duration::from_secs(2)).expect("client")
    }

    fn article_json() -> serde_json::Value {
        json!({
            "id": "a1",
            "title": "Maraude de janvier",
            "slug": "maraude-de-janvier",
            "content": "Bilan de la **maraude**.",
            "status": "PUBLISHED",
            "createdAt": "2024-01-12T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn lists_published_articles_with_filters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/articles")
                    .query_param("page", "1")
                    .query_param("status", "PUBLISHED")
                    .query_param("category", "actualites");
                then.status(200).json_body(json!({
                    "data": [article_json()],
                    "meta": { "total": 1, "page": 1, "limit": 10, "totalPages": 1 }
                }));
            })
            .await;

        let query = ListQuery::new(
            PageRequest::first(10),
            ArticleFilters::published(Some("actualites".to_owned())),
        );
        let page = ArticlesApi::new(client(&server))
            .list(&Credentials::Anonymous, &query)
            .await
            .expect("page");
        assert_eq!(page.data[0].status, ArticleStatus::Published);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/articles/slug/disparu");
                then.status(404).json_body(json!({ "message": "Article not found" }));
            })
            .await;

        let err = ArticlesApi::new(client(&server))
            .by_slug("disparu")
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn project_updates_use_patch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/api/v1/projects/p1")
                    .header("authorization", "Bearer admin");
                then.status(200).json_body(json!({
                    "data": {
                        "id": "p1",
                        "title": "Local",
                        "description": "Un local pour l'accueil",
                        "targetAmount": "5000",
                        "collectedAmount": "1250",
                        "status": "ACTIVE"
                    }
                }));
            })
            .await;

        let credentials = Credentials::Bearer(
            crate::domain::AccessToken::new("admin").expect("token"),
        );
        let project = ProjectsApi::new(client(&server))
            .update(&credentials, "p1", &ProjectDraft::default())
            .await
            .expect("updated");
        assert_eq!(project.progress_percent(), Some(25));
        mock.assert_async().await;
    }
}
