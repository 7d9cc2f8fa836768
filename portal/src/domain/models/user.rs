//! Platform accounts as seen by the back-office.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::auth::Role;
use crate::domain::{ListFilters, push_filter};

/// Account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier.
    pub id: String,
    /// Sign-in email.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Role claim.
    pub role: Role,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// `First Last`, or the email when both names are blank.
    #[must_use]
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_owned()
        }
    }
}

/// Back-office user list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserFilters {
    /// Free-text search on name and email.
    pub search: Option<String>,
    /// Role wire value.
    pub role: Option<String>,
}

impl ListFilters for UserFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_filter(&mut pairs, "search", self.search.as_deref());
        let role = self.role.as_deref().and_then(Role::parse).map(Role::as_str);
        push_filter(&mut pairs, "role", role);
        pairs
    }
}

/// Body of `PATCH /users/{id}/role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleChange {
    /// Role to assign.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unknown_role_filters_are_dropped() {
        let filters = UserFilters {
            search: Some("ada".to_owned()),
            role: Some("TREASURER".to_owned()),
        };
        assert_eq!(filters.query_pairs(), vec![("search", "ada".to_owned())]);
    }

    #[rstest]
    fn full_name_falls_back_to_email() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"ada@example.org","firstName":"","lastName":" ","role":"MEMBER"}"#,
        )
        .expect("user decodes");
        assert_eq!(user.full_name(), "ada@example.org");
    }
}
