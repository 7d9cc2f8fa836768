//! Memberships and membership types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::domain::{Amount, ListFilters, push_filter};

wire_enum! {
    /// Membership lifecycle: `PENDING → ACTIVE → EXPIRED | CANCELED | REJECTED`.
    pub enum MembershipStatus {
        /// Awaiting payment or validation.
        Pending => ("PENDING", "En attente"),
        /// Current membership.
        Active => ("ACTIVE", "Active"),
        /// Past its end date.
        Expired => ("EXPIRED", "Expirée"),
        /// Cancelled by the member or an admin.
        Canceled => ("CANCELED", "Annulée"),
        /// Refused by an admin.
        Rejected => ("REJECTED", "Refusée"),
    }
}

impl MembershipStatus {
    /// Whether a renewal may be requested.
    #[must_use]
    pub const fn is_renewable(self) -> bool {
        matches!(self, Self::Active | Self::Expired)
    }
}

/// Purchasable membership offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipType {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Price in euros.
    pub price: Amount,
    /// Validity in months.
    pub duration_months: u32,
}

/// A member's enrollment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Backend identifier.
    pub id: String,
    /// Member number, assigned once the membership is validated.
    #[serde(default)]
    pub member_number: Option<String>,
    /// Lifecycle status.
    pub status: MembershipStatus,
    /// Start of validity.
    #[serde(default, deserialize_with = "super::lenient_date::deserialize")]
    pub start_date: Option<DateTime<Utc>>,
    /// End of validity.
    #[serde(default, deserialize_with = "super::lenient_date::deserialize")]
    pub end_date: Option<DateTime<Utc>>,
    /// Offer subscribed to.
    #[serde(default)]
    pub membership_type: Option<MembershipType>,
    /// Member, on admin listings.
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `POST /memberships`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMembership {
    /// Chosen offer.
    pub membership_type_id: String,
}

/// Body of `PATCH /memberships/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MembershipStatusChange {
    /// Requested status.
    pub status: MembershipStatus,
}

/// Back-office membership list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MembershipFilters {
    /// Status wire value.
    pub status: Option<String>,
    /// Free-text search on member name or number.
    pub search: Option<String>,
}

impl ListFilters for MembershipFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let status = self
            .status
            .as_deref()
            .and_then(MembershipStatus::parse)
            .map(MembershipStatus::as_str);
        push_filter(&mut pairs, "status", status);
        push_filter(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decodes_date_only_validity() {
        let membership: Membership = serde_json::from_str(
            r#"{"id":"m1","memberNumber":"NS-2024-0042","status":"ACTIVE","startDate":"2024-01-15","endDate":"2025-01-15T00:00:00Z"}"#,
        )
        .expect("membership decodes");
        assert_eq!(membership.member_number.as_deref(), Some("NS-2024-0042"));
        let start = membership.start_date.expect("start date");
        assert_eq!(super::super::format_date(&start), "15/01/2024");
    }

    #[rstest]
    #[case(MembershipStatus::Active, true)]
    #[case(MembershipStatus::Expired, true)]
    #[case(MembershipStatus::Pending, false)]
    #[case(MembershipStatus::Rejected, false)]
    fn renewable_statuses(#[case] status: MembershipStatus, #[case] expected: bool) {
        assert_eq!(status.is_renewable(), expected);
    }

    #[rstest]
    fn status_change_serialises_wire_value() {
        let body = serde_json::to_value(MembershipStatusChange {
            status: MembershipStatus::Canceled,
        })
        .expect("serialise");
        assert_eq!(body, serde_json::json!({ "status": "CANCELED" }));
    }
}
