//! Association events and member registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ListFilters, push_filter};

wire_enum! {
    /// Publication status shared by events and trainings.
    pub enum EventStatus {
        /// Not visible publicly.
        Draft => ("DRAFT", "Brouillon"),
        /// Open for registration.
        Published => ("PUBLISHED", "Publié"),
        /// Called off.
        Canceled => ("CANCELED", "Annulé"),
        /// Took place.
        Completed => ("COMPLETED", "Terminé"),
    }
}

/// Scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Backend identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description (markup).
    #[serde(default)]
    pub description: String,
    /// Venue.
    #[serde(default)]
    pub location: Option<String>,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Maximum attendance; `None` means unlimited.
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Registrations so far.
    #[serde(default)]
    pub registration_count: u32,
    /// Publication status.
    pub status: EventStatus,
}

impl Event {
    /// Places left, when capacity is limited.
    #[must_use]
    pub fn remaining_places(&self) -> Option<u32> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.registration_count))
    }

    /// Whether a member may still register.
    #[must_use]
    pub fn accepts_registrations(&self) -> bool {
        self.status == EventStatus::Published && self.remaining_places() != Some(0)
    }
}

/// A member's registration to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    /// Backend identifier.
    pub id: String,
    /// Event registered to.
    pub event: Event,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Create/update body for events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Venue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Maximum attendance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Publication status.
    pub status: EventStatus,
}

/// Event list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Free-text search on the title.
    pub search: Option<String>,
}

impl EventFilters {
    /// Filters matching publicly visible events.
    #[must_use]
    pub fn published() -> Self {
        Self {
            status: Some(EventStatus::Published.as_str().to_owned()),
            search: None,
        }
    }
}

impl ListFilters for EventFilters {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn event(capacity: Option<u32>, count: u32, status: &str) -> Event {
        serde_json::from_value(json!({
            "id": "e1",
            "title": "Repas solidaire",
            "startsAt": "2024-12-20T18:00:00Z",
            "capacity": capacity,
            "registrationCount": count,
            "status": status
        }))
        .expect("event decodes")
    }

    #[rstest]
    #[case(Some(20), 5, "PUBLISHED", true)]
    #[case(Some(20), 20, "PUBLISHED", false)]
    #[case(None, 400, "PUBLISHED", true)]
    #[case(Some(20), 0, "CANCELED", false)]
    fn registration_window(
        #[case] capacity: Option<u32>,
        #[case] count: u32,
        #[case] status: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(event(capacity, count, status).accepts_registrations(), expected);
    }

    #[rstest]
    fn overbooked_events_report_zero_places() {
        assert_eq!(event(Some(10), 12, "PUBLISHED").remaining_places(), Some(0));
    }
}
