//! Driven port for account administration.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{User, UserFilters};
use crate::domain::{Credentials, Error, ListQuery, Role};

/// Account operations (admin).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersPort: Send + Sync {
    /// One page of accounts.
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<UserFilters>,
    ) -> Result<Paginated<User>, Error>;

    /// Assign a role.
    async fn change_role(&self, credentials: &Credentials, id: &str, role: Role) -> Result<User, Error>;
}
