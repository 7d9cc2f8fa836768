//! Volunteer trainings and enrollments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EventStatus;
use crate::domain::{ListFilters, push_filter};

/// Training session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    /// Backend identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Venue.
    #[serde(default)]
    pub location: Option<String>,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// Length in hours.
    #[serde(default)]
    pub duration_hours: Option<u32>,
    /// Maximum attendance.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Enrollments so far.
    #[serde(default)]
    pub enrolled_count: u32,
    /// Publication status.
    pub status: EventStatus,
}

impl Training {
    /// Whether a member may still enroll.
    #[must_use]
    pub fn accepts_enrollments(&self) -> bool {
        self.status == EventStatus::Published
            && self
                .capacity
                .is_none_or(|capacity| self.enrolled_count < capacity)
    }
}

/// A member's enrollment in a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEnrollment {
    /// Backend identifier.
    pub id: String,
    /// Training enrolled in.
    pub training: Training,
    /// Enrollment time.
    pub created_at: DateTime<Utc>,
}

/// Create/update body for trainings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Venue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// Length in hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<u32>,
    /// Maximum attendance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Publication status.
    pub status: EventStatus,
}

/// Training list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrainingFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Free-text search on the title.
    pub search: Option<String>,
}

impl TrainingFilters {
    /// Filters matching publicly visible trainings.
    #[must_use]
    pub fn published() -> Self {
        Self {
            status: Some(EventStatus::Published.as_str().to_owned()),
            search: None,
        }
    }
}

impl ListFilters for TrainingFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let status = self
            .status
            .as_deref()
            .and_then(EventStatus::parse)
            .map(EventStatus::as_str);
        push_filter(&mut pairs, "status", status);
        push_filter(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}
