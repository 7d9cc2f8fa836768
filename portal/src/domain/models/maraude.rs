//! Street-outreach sessions, encounters and their reference data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Beneficiary;
use crate::domain::{ListFilters, push_filter};

wire_enum! {
    /// Outreach session status.
    pub enum MaraudeStatus {
        /// Scheduled.
        Planned => ("PLANNED", "Planifiée"),
        /// Team is out.
        InProgress => ("IN_PROGRESS", "En cours"),
        /// Done.
        Completed => ("COMPLETED", "Terminée"),
        /// Called off.
        Canceled => ("CANCELED", "Annulée"),
    }
}

/// Area covered by outreach teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaraudeZone {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Kind of need recorded during an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedCategory {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Contact with a person during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    /// Backend identifier.
    pub id: String,
    /// Case record, when the person consented to one.
    #[serde(default)]
    pub beneficiary: Option<Beneficiary>,
    /// Needs expressed.
    #[serde(default)]
    pub needs: Vec<NeedCategory>,
    /// Service the person was referred to.
    #[serde(default)]
    pub referral: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Encounter time.
    pub created_at: DateTime<Utc>,
}

/// Scheduled outreach session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaraudeSession {
    /// Backend identifier.
    pub id: String,
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Status.
    pub status: MaraudeStatus,
    /// Zone covered.
    #[serde(default)]
    pub zone: Option<MaraudeZone>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Encounters logged so far.
    #[serde(default)]
    pub encounters: Vec<Encounter>,
}

impl MaraudeSession {
    /// Zone name, or a placeholder.
    #[must_use]
    pub fn zone_name(&self) -> &str {
        self.zone.as_ref().map_or("Zone non définie", |zone| zone.name.as_str())
    }
}

/// Body of `POST /maraude/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    /// Start time.
    pub starts_at: DateTime<Utc>,
    /// End time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Zone covered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /maraude/sessions/{id}/encounters`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterDraft {
    /// Case record met, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_id: Option<String>,
    /// Need category identifiers.
    pub need_ids: Vec<String>,
    /// Referral.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Create body for zones and need categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NamedDraft {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Session list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Zone identifier.
    pub zone_id: Option<String>,
}

impl ListFilters for SessionFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let status = self
            .status
            .as_deref()
            .and_then(MaraudeStatus::parse)
            .map(MaraudeStatus::as_str);
        push_filter(&mut pairs, "status", status);
        push_filter(&mut pairs, "zoneId", self.zone_id.as_deref());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn decodes_session_with_encounters() {
        let session: MaraudeSession = serde_json::from_value(json!({
            "id": "s1",
            "startsAt": "2024-01-10T19:00:00Z",
            "status": "IN_PROGRESS",
            "encounters": [{
                "id": "enc1",
                "needs": [{ "id": "n1", "name": "Alimentation" }],
                "referral": "Accueil de jour",
                "createdAt": "2024-01-10T19:30:00Z"
            }]
        }))
        .expect("session decodes");
        assert_eq!(session.status, MaraudeStatus::InProgress);
        assert_eq!(session.zone_name(), "Zone non définie");
        assert_eq!(session.encounters[0].needs[0].name, "Alimentation");
    }

    #[rstest]
    fn encounter_draft_skips_empty_fields() {
        let body = serde_json::to_value(EncounterDraft {
            need_ids: vec!["n1".to_owned()],
            ..EncounterDraft::default()
        })
        .expect("serialise");
        assert_eq!(body, json!({ "needIds": ["n1"] }));
    }
}
