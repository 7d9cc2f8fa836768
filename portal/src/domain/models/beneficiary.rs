//! Anonymised outreach case records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ListFilters, push_filter};

wire_enum! {
    /// Housing situation reported at the last encounter.
    pub enum HousingStatus {
        /// Sleeping rough.
        Street => ("STREET", "Rue"),
        /// Emergency shelter.
        Shelter => ("SHELTER", "Hébergement d'urgence"),
        /// Squat.
        Squat => ("SQUAT", "Squat"),
        /// Living in a vehicle.
        Vehicle => ("VEHICLE", "Véhicule"),
        /// Temporary accommodation.
        Temporary => ("TEMPORARY", "Hébergement temporaire"),
        /// Housed.
        Housed => ("HOUSED", "Logé"),
        /// Not known.
        Unknown => ("UNKNOWN", "Inconnu"),
    }
}

wire_enum! {
    /// Consent to keep a case record.
    pub enum ConsentStatus {
        /// Not asked yet.
        Pending => ("PENDING", "En attente"),
        /// Consent given.
        Given => ("GIVEN", "Donné"),
        /// Consent refused.
        Refused => ("REFUSED", "Refusé"),
        /// Consent withdrawn.
        Withdrawn => ("WITHDRAWN", "Retiré"),
    }
}

/// Case record for a person met during outreach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    /// Backend identifier.
    pub id: String,
    /// Pseudonym; never a legal name.
    pub alias: String,
    /// Age bracket, such as `30-40`.
    #[serde(default)]
    pub age_range: Option<String>,
    /// Housing situation.
    pub housing_status: HousingStatus,
    /// Record consent.
    pub consent_status: ConsentStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Last encounter time.
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// Create/update body for beneficiaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryDraft {
    /// Pseudonym.
    pub alias: String,
    /// Age bracket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    /// Housing situation.
    pub housing_status: HousingStatus,
    /// Record consent.
    pub consent_status: ConsentStatus,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for BeneficiaryDraft {
    fn default() -> Self {
        Self {
            alias: String::new(),
            age_range: None,
            housing_status: HousingStatus::Unknown,
            consent_status: ConsentStatus::Pending,
            notes: None,
        }
    }
}

impl From<&Beneficiary> for BeneficiaryDraft {
    fn from(record: &Beneficiary) -> Self {
        Self {
            alias: record.alias.clone(),
            age_range: record.age_range.clone(),
            housing_status: record.housing_status,
            consent_status: record.consent_status,
            notes: record.notes.clone(),
        }
    }
}

/// Beneficiary list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryFilters {
    /// Free-text search on the alias.
    pub search: Option<String>,
    /// Housing status wire value.
    pub housing_status: Option<String>,
    /// Consent status wire value.
    pub consent_status: Option<String>,
}

impl ListFilters for BeneficiaryFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_filter(&mut pairs, "search", self.search.as_deref());
        let housing = self
            .housing_status
            .as_deref()
            .and_then(HousingStatus::parse)
            .map(HousingStatus::as_str);
        push_filter(&mut pairs, "housingStatus", housing);
        let consent = self
            .consent_status
            .as_deref()
            .and_then(ConsentStatus::parse)
            .map(ConsentStatus::as_str);
        push_filter(&mut pairs, "consentStatus", consent);
        pairs
    }
}
