//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{
    ArticlesPort, AuthGateway, BeneficiariesPort, DonationsPort, EventsPort, MaraudePort,
    MembershipsPort, ProjectsPort, TrainingsPort, UsersPort,
};

/// Parameter object bundling every port implementation.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// External auth recipe.
    pub auth: Arc<dyn AuthGateway>,
    /// News articles.
    pub articles: Arc<dyn ArticlesPort>,
    /// Fundraising projects.
    pub projects: Arc<dyn ProjectsPort>,
    /// Events and registrations.
    pub events: Arc<dyn EventsPort>,
    /// Trainings and enrollments.
    pub trainings: Arc<dyn TrainingsPort>,
    /// Donations and receipts.
    pub donations: Arc<dyn DonationsPort>,
    /// Memberships.
    pub memberships: Arc<dyn MembershipsPort>,
    /// Account administration.
    pub users: Arc<dyn UsersPort>,
    /// Outreach case records.
    pub beneficiaries: Arc<dyn BeneficiariesPort>,
    /// Outreach sessions, zones and need categories.
    pub maraude: Arc<dyn MaraudePort>,
}

/// Site-wide rendering settings.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Public origin used for absolute links (sitemap, payment return URL).
    pub public_url: Url,
    /// Rows per list page.
    pub page_size: u32,
    /// Payment provider publishable key; payments are disabled without it.
    pub payment_publishable_key: Option<String>,
}

impl SiteSettings {
    /// Absolute URL of a local `path`.
    ///
    /// # Examples
    /// ```
    /// use portal::inbound::http::state::SiteSettings;
    /// use url::Url;
    ///
    /// let site = SiteSettings {
    ///     public_url: Url::parse("https://nouveausouffle.org/").expect("url"),
    ///     page_size: 10,
    ///     payment_publishable_key: None,
    /// };
    /// assert_eq!(site.absolute("/articles/a"), "https://nouveausouffle.org/articles/a");
    /// ```
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        self.public_url
            .join(path)
            .map_or_else(|_| path.to_owned(), |url| url.to_string())
    }

    /// Absolute URL whose path is `segments`, each one percent-encoded, so a
    /// slug containing spaces, `?` or `/` stays a single segment.
    ///
    /// # Examples
    /// ```
    /// use portal::inbound::http::state::SiteSettings;
    /// use url::Url;
    ///
    /// let site = SiteSettings {
    ///     public_url: Url::parse("https://nouveausouffle.org/").expect("url"),
    ///     page_size: 10,
    ///     payment_publishable_key: None,
    /// };
    /// assert_eq!(
    ///     site.resource_url(&["articles", "a b?"]),
    ///     "https://nouveausouffle.org/articles/a%20b%3F"
    /// );
    /// ```
    #[must_use]
    pub fn resource_url(&self, segments: &[&str]) -> String {
        let mut url = self.public_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(segments);
        }
        url.to_string()
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// External auth recipe.
    pub auth: Arc<dyn AuthGateway>,
    /// News articles.
    pub articles: Arc<dyn ArticlesPort>,
    /// Fundraising projects.
    pub projects: Arc<dyn ProjectsPort>,
    /// Events and registrations.
    pub events: Arc<dyn EventsPort>,
    /// Trainings and enrollments.
    pub trainings: Arc<dyn TrainingsPort>,
    /// Donations and receipts.
    pub donations: Arc<dyn DonationsPort>,
    /// Memberships.
    pub memberships: Arc<dyn MembershipsPort>,
    /// Account administration.
    pub users: Arc<dyn UsersPort>,
    /// Outreach case records.
    pub beneficiaries: Arc<dyn BeneficiariesPort>,
    /// Outreach sessions, zones and need categories.
    pub maraude: Arc<dyn MaraudePort>,
    /// Rendering settings.
    pub site: SiteSettings,
}

impl HttpState {
    /// Construct state from a ports bundle and site settings.
    #[must_use]
    pub fn new(ports: HttpStatePorts, site: SiteSettings) -> Self {
        let HttpStatePorts {
            auth,
            articles,
            projects,
            events,
            trainings,
            donations,
            memberships,
            users,
            beneficiaries,
            maraude,
        } = ports;
        Self {
            auth,
            articles,
            projects,
            events,
            trainings,
            donations,
            memberships,
            users,
            beneficiaries,
            maraude,
            site,
        }
    }
}
