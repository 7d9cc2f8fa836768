//! Driven port for the external auth recipe.
//!
//! The portal never verifies passwords or tokens itself. It forwards form
//! inputs, stores the opaque token it receives, and asks the recipe for the
//! session payload whenever a protected route is requested.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, Registration, SessionPayload, SignedIn};

/// Auth recipe operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<SignedIn, Error>;

    /// Create an account and open its first session.
    async fn sign_up(&self, registration: &Registration) -> Result<SignedIn, Error>;

    /// Revoke the session bound to `token`.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), Error>;

    /// Payload of the session bound to `token`.
    ///
    /// Returns `Ok(None)` when the recipe reports the session as missing or
    /// expired; `Err` is reserved for the recipe being unreachable.
    async fn session(&self, token: &AccessToken) -> Result<Option<SessionPayload>, Error>;

    /// Trigger a password-reset email.
    async fn request_password_reset(&self, email: &str) -> Result<(), Error>;
}
