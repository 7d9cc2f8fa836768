//! Fundraising projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, ListFilters, push_filter};

wire_enum! {
    /// Project status.
    pub enum ProjectStatus {
        /// Not visible publicly.
        Draft => ("DRAFT", "Brouillon"),
        /// Open to donations.
        Active => ("ACTIVE", "En cours"),
        /// Target reached or closed.
        Completed => ("COMPLETED", "Terminé"),
        /// Hidden from listings.
        Archived => ("ARCHIVED", "Archivé"),
    }
}

/// Fundraising project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Backend identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// URL slug, when the backend assigns one.
    #[serde(default)]
    pub slug: Option<String>,
    /// Long description (markup).
    #[serde(default)]
    pub description: String,
    /// Fundraising target.
    #[serde(default)]
    pub target_amount: Option<Amount>,
    /// Amount collected so far.
    #[serde(default)]
    pub collected_amount: Amount,
    /// Status.
    pub status: ProjectStatus,
    /// Last modification time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Collected share of the target, when a target is set.
    #[must_use]
    pub fn progress_percent(&self) -> Option<u8> {
        self.target_amount
            .as_ref()
            .map(|target| self.collected_amount.percent_of(target))
    }
}

/// Create/update body for projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    /// Title.
    pub title: String,
    /// Description (markup).
    pub description: String,
    /// Fundraising target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Amount>,
    /// Status.
    pub status: ProjectStatus,
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            target_amount: project.target_amount,
            status: project.status,
        }
    }
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            target_amount: None,
            status: ProjectStatus::Draft,
        }
    }
}

/// Project list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Free-text search on the title.
    pub search: Option<String>,
}

impl ProjectFilters {
    /// Filters matching projects open to donations.
    #[must_use]
    pub fn active() -> Self {
        Self {
            status: Some(ProjectStatus::Active.as_str().to_owned()),
            search: None,
        }
    }
}

impl ListFilters for ProjectFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let status = self
            .status
            .as_deref()
            .and_then(ProjectStatus::parse)
            .map(ProjectStatus::as_str);
        push_filter(&mut pairs, "status", status);
        push_filter(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn progress_requires_target() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "title": "Maraude hiver",
            "collectedAmount": 250,
            "targetAmount": 1000,
            "status": "ACTIVE"
        }))
        .expect("project decodes");
        assert_eq!(project.progress_percent(), Some(25));

        let open_ended = Project {
            target_amount: None,
            ..project
        };
        assert_eq!(open_ended.progress_percent(), None);
    }

    #[rstest]
    fn active_filter_uses_wire_value() {
        assert_eq!(
            ProjectFilters::active().query_pairs(),
            vec![("status", "ACTIVE".to_owned())]
        );
    }
}
