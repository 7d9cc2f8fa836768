//! Donations, payment intents and fiscal receipts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, ListFilters, push_filter};

wire_enum! {
    /// Donation lifecycle: `PENDING → COMPLETED | REFUNDED | REJECTED`.
    pub enum DonationStatus {
        /// Payment not confirmed yet.
        Pending => ("PENDING", "En attente"),
        /// Payment confirmed.
        Completed => ("COMPLETED", "Confirmé"),
        /// Refunded to the donor.
        Refunded => ("REFUNDED", "Remboursé"),
        /// Payment refused.
        Rejected => ("REJECTED", "Refusé"),
    }
}

/// Project summary embedded in a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project identifier.
    pub id: String,
    /// Project title.
    pub title: String,
}

/// Donor identity, on admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Donor {
    /// Best available display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            name
        }
    }
}

/// One-time contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Backend identifier.
    pub id: String,
    /// Amount in euros.
    pub amount: Amount,
    /// Lifecycle status.
    pub status: DonationStatus,
    /// Earmarked project identifier.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Earmarked project summary.
    #[serde(default)]
    pub project: Option<ProjectRef>,
    /// Hide the donor on public listings.
    #[serde(default)]
    pub is_anonymous: bool,
    /// Message left by the donor.
    #[serde(default)]
    pub message: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Donor identity, when disclosed.
    #[serde(default)]
    pub donor: Option<Donor>,
}

impl Donation {
    /// Project title, or the general fund.
    #[must_use]
    pub fn destination(&self) -> &str {
        self.project
            .as_ref()
            .map_or("Fonds général", |project| project.title.as_str())
    }
}

/// Result of `POST /donations`: the donation plus the payment client secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationIntent {
    /// Pending donation.
    pub donation: Donation,
    /// Secret bound to the hosted payment element.
    pub client_secret: String,
}

/// Fiscal receipt reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Backend identifier.
    pub id: String,
    /// Official receipt number.
    pub receipt_number: String,
    /// Download location.
    pub file_url: String,
    /// Amount covered.
    pub amount: Amount,
    /// Fiscal year, for annual receipts.
    #[serde(default)]
    pub year: Option<i32>,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
}

/// Body of `POST /donations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    /// Amount in euros.
    pub amount: Amount,
    /// Earmarked project, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Hide the donor on public listings.
    pub is_anonymous: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /donations/receipts/annual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnualReceiptRequest {
    /// Fiscal year.
    pub year: i32,
}

/// Donation list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DonationFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Free-text search on donor or project.
    pub search: Option<String>,
}

impl ListFilters for DonationFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let status = self
            .status
            .as_deref()
            .and_then(DonationStatus::parse)
            .map(DonationStatus::as_str);
        push_filter(&mut pairs, "status", status);
        push_filter(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}
