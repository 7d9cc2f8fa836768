//! News articles and their categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::content::plain_summary;
use crate::domain::{ListFilters, push_filter};

const SUMMARY_CHARS: usize = 180;

wire_enum! {
    /// Article lifecycle: `DRAFT → PUBLISHED → ARCHIVED`.
    pub enum ArticleStatus {
        /// Being written.
        Draft => ("DRAFT", "Brouillon"),
        /// Publicly visible.
        Published => ("PUBLISHED", "Publié"),
        /// Withdrawn from listings.
        Archived => ("ARCHIVED", "Archivé"),
    }
}

/// Article category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCategory {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// News article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Backend identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// URL slug.
    pub slug: String,
    /// Author-provided summary.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Body markup.
    #[serde(default)]
    pub content: String,
    /// Lifecycle status.
    pub status: ArticleStatus,
    /// Linked categories.
    #[serde(default)]
    pub categories: Vec<ArticleCategory>,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Explicit excerpt, or a summary of the first paragraph.
    #[must_use]
    pub fn summary(&self) -> String {
        self.excerpt
            .as_deref()
            .map(str::trim)
            .filter(|excerpt| !excerpt.is_empty())
            .map_or_else(
                || plain_summary(&self.content, SUMMARY_CHARS),
                str::to_owned,
            )
    }

    /// Most recent modification, for sitemaps.
    #[must_use]
    pub fn last_modified(&self) -> Option<&DateTime<Utc>> {
        self.updated_at.as_ref().or(self.published_at.as_ref())
    }
}

/// Create/update body for articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    /// Title.
    pub title: String,
    /// URL slug; the backend derives one from the title when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Body markup.
    pub content: String,
    /// Lifecycle status.
    pub status: ArticleStatus,
    /// Linked category identifiers.
    pub category_ids: Vec<String>,
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: None,
            excerpt: None,
            content: String::new(),
            status: ArticleStatus::Draft,
            category_ids: Vec::new(),
        }
    }
}

impl From<&Article> for ArticleDraft {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            slug: Some(article.slug.clone()),
            excerpt: article.excerpt.clone(),
            content: article.content.clone(),
            status: article.status,
            category_ids: article
                .categories
                .iter()
                .map(|category| category.id.clone())
                .collect(),
        }
    }
}

/// Article list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

impl ArticleFilters {
    /// Filters matching public articles, optionally within a category.
    #[must_use]
    pub fn published(category: Option<String>) -> Self {
        Self {
            status: Some(ArticleStatus::Published.as_str().to_owned()),
            category,
            search: None,
        }
    }
}

impl ListFilters for ArticleFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let status = self
            .status
            .as_deref()
            .and_then(ArticleStatus::parse)
            .map(ArticleStatus::as_str);
        push_filter(&mut pairs, "status", status);
        push_filter(&mut pairs, "category", self.category.as_deref());
        push_filter(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn article(excerpt: Option<&str>) -> Article {
        serde_json::from_value(json!({
            "id": "a1",
            "title": "Bilan",
            "slug": "bilan",
            "excerpt": excerpt,
            "content": "# Bilan\n\nMerci à **tous** les bénévoles.",
            "status": "PUBLISHED"
        }))
        .expect("article decodes")
    }

    #[rstest]
    #[case(Some("Résumé"), "Résumé")]
    #[case(Some("  "), "Merci à tous les bénévoles.")]
    #[case(None, "Merci à tous les bénévoles.")]
    fn summary_prefers_excerpt(#[case] excerpt: Option<&str>, #[case] expected: &str) {
        assert_eq!(article(excerpt).summary(), expected);
    }

    #[rstest]
    fn published_filter_keeps_category() {
        let filters = ArticleFilters::published(Some("vie-asso".to_owned()));
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("status", "PUBLISHED".to_owned()),
                ("category", "vie-asso".to_owned()),
            ]
        );
    }
}
