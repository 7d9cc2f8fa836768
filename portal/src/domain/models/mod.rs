//! Backend resource shapes.
//!
//! Records are owned by the backend; the portal only types them. Lifecycle
//! transitions happen server side, so status enums here are read-only views
//! plus the values an admin may request.

/// Declare a wire enum with its backend value and French label.
macro_rules! wire_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => ($wire:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in lifecycle order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Backend value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Label shown in the UI.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// `(wire value, label)` pairs for drop-downs.
            #[must_use]
            pub fn options() -> Vec<(&'static str, &'static str)> {
                Self::ALL
                    .iter()
                    .map(|value| (value.as_str(), value.label()))
                    .collect()
            }

            /// Parse a backend value, ignoring case and surrounding blanks.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(raw))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

mod article;
mod beneficiary;
mod donation;
mod event;
mod maraude;
mod membership;
mod project;
mod training;
mod user;

pub use article::{Article, ArticleCategory, ArticleDraft, ArticleFilters, ArticleStatus};
pub use beneficiary::{
    Beneficiary, BeneficiaryDraft, BeneficiaryFilters, ConsentStatus, HousingStatus,
};
pub use donation::{
    AnnualReceiptRequest, Donation, DonationFilters, DonationIntent, DonationStatus, Donor,
    NewDonation, ProjectRef, Receipt,
};
pub use event::{Event, EventDraft, EventFilters, EventRegistration, EventStatus};
pub use maraude::{
    Encounter, EncounterDraft, MaraudeSession, MaraudeStatus, MaraudeZone, NamedDraft,
    NeedCategory, SessionDraft, SessionFilters,
};
pub use membership::{
    Membership, MembershipFilters, MembershipStatus, MembershipStatusChange, MembershipType,
    NewMembership,
};
pub use project::{Project, ProjectDraft, ProjectFilters, ProjectStatus};
pub use training::{Training, TrainingDraft, TrainingEnrollment, TrainingFilters};
pub use user::{RoleChange, User, UserFilters};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format a timestamp as `dd/mm/YYYY`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use portal::domain::models::format_date;
///
/// let date = Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).single().expect("valid date");
/// assert_eq!(format_date(&date), "07/03/2024");
/// ```
#[must_use]
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// Format a timestamp as `dd/mm/YYYY HH:MM`.
#[must_use]
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Format an optional timestamp; absent values render as `-`.
#[must_use]
pub fn format_optional_date(value: Option<&DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_owned(), format_date)
}

/// Parse a timestamp typed in a form: RFC 3339, `datetime-local`
/// (`YYYY-MM-DDTHH:MM`) or a plain date.
#[must_use]
pub fn parse_form_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }
    if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(value.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|value| value.and_utc())
}

/// Value for a `datetime-local` input.
#[must_use]
pub fn to_form_datetime(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M").to_string()
}

/// Serde helper accepting RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
pub(crate) mod lenient_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de};

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_form_datetime(value)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {value}"))),
        }
    }
}
