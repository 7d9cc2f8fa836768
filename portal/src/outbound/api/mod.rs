//! Reqwest adapters for the association backend.
//!
//! One [`ApiClient`] is shared by every adapter; each adapter implements a
//! single domain port and translates [`ApiError`] into domain errors.

mod articles;
mod auth;
mod client;
mod donations;
mod dto;
mod error;
mod events;
mod maraude;
mod memberships;

pub use articles::{ArticlesApi, ProjectsApi};
pub use auth::AuthApi;
pub use client::ApiClient;
pub use donations::DonationsApi;
pub use error::ApiError;
pub use events::{EventsApi, TrainingsApi};
pub use maraude::{BeneficiariesApi, MaraudeApi};
pub use memberships::{MembershipsApi, UsersApi};
