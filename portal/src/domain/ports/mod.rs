//! Domain ports for the hexagonal boundary.
//!
//! Every backend resource is reached through one trait. Inbound handlers
//! depend on these traits only; the reqwest adapters in
//! `crate::outbound::api` implement them.

mod articles;
mod auth_gateway;
mod beneficiaries;
mod donations;
mod events;
mod maraude;
mod memberships;
mod projects;
mod trainings;
mod users;

pub use articles::ArticlesPort;
#[cfg(test)]
pub use articles::MockArticlesPort;
pub use auth_gateway::AuthGateway;
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use beneficiaries::BeneficiariesPort;
#[cfg(test)]
pub use beneficiaries::MockBeneficiariesPort;
pub use donations::DonationsPort;
#[cfg(test)]
pub use donations::MockDonationsPort;
pub use events::EventsPort;
#[cfg(test)]
pub use events::MockEventsPort;
pub use maraude::MaraudePort;
#[cfg(test)]
pub use maraude::MockMaraudePort;
pub use memberships::MembershipsPort;
#[cfg(test)]
pub use memberships::MockMembershipsPort;
pub use projects::ProjectsPort;
#[cfg(test)]
pub use projects::MockProjectsPort;
pub use trainings::TrainingsPort;
#[cfg(test)]
pub use trainings::MockTrainingsPort;
pub use users::UsersPort;
#[cfg(test)]
pub use users::MockUsersPort;
