//! Authentication primitives: credentials, roles and the session payload.
//!
//! The auth recipe itself runs in the backend. The portal only validates
//! form inputs, carries the opaque access token it hands out, and reads the
//! session payload (user id and role claim) it reports.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Domain error returned when login or registration inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like `local@domain`.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
    /// A required name was blank.
    EmptyName {
        /// Offending form field.
        field: &'static str,
    },
}

impl CredentialsValidationError {
    /// Form field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::MalformedEmail => "email",
            Self::EmptyPassword => "password",
            Self::EmptyName { field } => field,
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "L'adresse e-mail est obligatoire."),
            Self::MalformedEmail => write!(f, "L'adresse e-mail est invalide."),
            Self::EmptyPassword => write!(f, "Le mot de passe est obligatoire."),
            Self::EmptyName { .. } => write!(f, "Ce champ est obligatoire."),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

fn normalise_email(raw: &str) -> Result<String, CredentialsValidationError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(CredentialsValidationError::EmptyEmail);
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_ascii_lowercase())
        }
        _ => Err(CredentialsValidationError::MalformedEmail),
    }
}

/// Validated login credentials forwarded to the auth recipe.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and contains an `@`.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.org ", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.org");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] for blank or malformed inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = normalise_email(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    first_name: String,
    last_name: String,
}

impl Registration {
    /// Construct a registration from raw form inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] for blank names or invalid
    /// credentials.
    pub fn try_from_parts(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let first_name = first_name.trim();
        if first_name.is_empty() {
            return Err(CredentialsValidationError::EmptyName { field: "firstName" });
        }
        let last_name = last_name.trim();
        if last_name.is_empty() {
            return Err(CredentialsValidationError::EmptyName { field: "lastName" });
        }
        Ok(Self {
            credentials: LoginCredentials::try_from_parts(email, password)?,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }

    /// Credentials part of the registration.
    #[must_use]
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Trimmed first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Trimmed last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Role claim carried by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Registered account without membership.
    User,
    /// Member with an active or past membership.
    Member,
    /// Volunteer taking part in outreach.
    Volunteer,
    /// Association administrator.
    Admin,
    /// Administrator allowed to manage other administrators.
    SuperAdmin,
    /// Any role this portal does not know about; never privileged.
    #[serde(other)]
    Unknown,
}

/// Roles allowed into the admin back-office.
pub const ADMIN_ROLES: [Role; 2] = [Role::Admin, Role::SuperAdmin];

impl Role {
    /// Whether the role belongs to [`ADMIN_ROLES`].
    #[must_use]
    pub fn is_admin(self) -> bool {
        ADMIN_ROLES.contains(&self)
    }

    /// Wire value, as used in query filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Member => "MEMBER",
            Self::Volunteer => "VOLUNTEER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// French label shown in the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "Utilisateur",
            Self::Member => "Adhérent",
            Self::Volunteer => "Bénévole",
            Self::Admin => "Administrateur",
            Self::SuperAdmin => "Super administrateur",
            Self::Unknown => "Inconnu",
        }
    }

    /// Roles an administrator can assign from the back-office.
    pub const ASSIGNABLE: [Self; 5] = [
        Self::User,
        Self::Member,
        Self::Volunteer,
        Self::Admin,
        Self::SuperAdmin,
    ];

    /// Parse a wire value, ignoring case; unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ASSIGNABLE
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Session payload reported by the auth recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Backend user identifier.
    pub user_id: String,
    /// Account email.
    pub email: String,
    /// Role claim.
    pub role: Role,
    /// Optional first name for greetings.
    #[serde(default)]
    pub first_name: Option<String>,
}

impl SessionPayload {
    /// Name used in greetings, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(self.email.as_str())
    }
}

/// Opaque access token issued by the auth recipe.
///
/// The token is wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token; blank tokens are rejected.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(raw)))
        }
    }

    /// Raw token value for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Credentials attached to an outbound backend call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Public call without a session.
    #[default]
    Anonymous,
    /// Call on behalf of the signed-in user.
    Bearer(AccessToken),
}

impl Credentials {
    /// Access token, when the call is authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Anonymous => None,
            Self::Bearer(token) => Some(token),
        }
    }
}

/// Result of a successful sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct SignedIn {
    /// Token to store in the cookie session.
    pub token: AccessToken,
    /// Session payload of the new session.
    pub session: SessionPayload,
}
