//! Route protection policy shared by the cookie gate and the session
//! extractors.
//!
//! Both enforcement layers classify paths with [`RouteAccess::classify`] so
//! they always agree on which routes are protected. Only the session layer
//! decides authorization; the cookie gate merely short-circuits requests that
//! cannot possibly carry a session.

use url::form_urlencoded;

use super::auth::SessionPayload;

/// Route used to sign in.
pub const LOGIN_PATH: &str = "/auth/login";
/// Landing page of the member area.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Prefix of the admin back-office.
pub const ADMIN_PREFIX: &str = "/admin";
/// Query parameter carrying the post-login destination.
pub const REDIRECT_PARAM: &str = "redirect";

/// Access class of a portal route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone may view the route.
    Public,
    /// A valid session is required.
    Member,
    /// A valid session with an admin role is required.
    Admin,
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

impl RouteAccess {
    /// Classify a request path by prefix, on segment boundaries.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::RouteAccess;
    ///
    /// assert_eq!(RouteAccess::classify("/admin/articles"), RouteAccess::Admin);
    /// assert_eq!(RouteAccess::classify("/dashboard"), RouteAccess::Member);
    /// assert_eq!(RouteAccess::classify("/administration"), RouteAccess::Public);
    /// ```
    #[must_use]
    pub fn classify(path: &str) -> Self {
        if has_prefix(path, ADMIN_PREFIX) {
            Self::Admin
        } else if has_prefix(path, DASHBOARD_PATH) {
            Self::Member
        } else {
            Self::Public
        }
    }

    /// Whether a session is required at all.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Public)
    }
}

/// Outcome of the precise guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the route.
    Allow,
    /// No valid session: go to login, then come back to `return_to`.
    Login {
        /// Sanitised destination after login.
        return_to: String,
    },
    /// Signed in but under-privileged: go to the member dashboard.
    Dashboard,
}

impl GuardDecision {
    /// Decide whether `session` may view a route of class `access`.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{GuardDecision, RouteAccess};
    ///
    /// let decision = GuardDecision::decide(RouteAccess::Member, None, "/dashboard/donations");
    /// assert_eq!(
    ///     decision,
    ///     GuardDecision::Login { return_to: "/dashboard/donations".to_owned() }
    /// );
    /// ```
    #[must_use]
    pub fn decide(access: RouteAccess, session: Option<&SessionPayload>, requested: &str) -> Self {
        match (access, session) {
            (RouteAccess::Public, _) => Self::Allow,
            (_, None) => Self::Login {
                return_to: sanitize_return_path(requested)
                    .unwrap_or(DASHBOARD_PATH)
                    .to_owned(),
            },
            (RouteAccess::Member, Some(_)) => Self::Allow,
            (RouteAccess::Admin, Some(payload)) if payload.role.is_admin() => Self::Allow,
            (RouteAccess::Admin, Some(_)) => Self::Dashboard,
        }
    }

    /// Location to redirect to, or `None` for [`GuardDecision::Allow`].
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::Login { return_to } => Some(login_location(return_to)),
            Self::Dashboard => Some(DASHBOARD_PATH.to_owned()),
        }
    }
}

/// Accept only local absolute paths as post-login destinations.
///
/// Protocol-relative (`//host`), backslash-smuggled and absolute URLs are
/// rejected so the login form cannot be used as an open redirect.
///
/// # Examples
/// ```
/// use portal::domain::sanitize_return_path;
///
/// assert_eq!(sanitize_return_path("/dashboard?page=2"), Some("/dashboard?page=2"));
/// assert_eq!(sanitize_return_path("//evil.example"), None);
/// assert_eq!(sanitize_return_path("https://evil.example"), None);
/// ```
#[must_use]
pub fn sanitize_return_path(raw: &str) -> Option<&str> {
    let candidate = raw.trim();
    let local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control);
    local.then_some(candidate)
}

/// Login URL carrying `return_to` as the redirect parameter.
///
/// # Examples
/// ```
/// use portal::domain::login_location;
///
/// assert_eq!(
///     login_location("/dashboard/membership"),
///     "/auth/login?redirect=%2Fdashboard%2Fmembership"
/// );
/// ```
#[must_use]
pub fn login_location(return_to: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
    format!("{LOGIN_PATH}?{REDIRECT_PARAM}={encoded}")
}
