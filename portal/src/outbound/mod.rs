//! Outbound adapters implementing domain ports for external collaborators.
//!
//! - **api**: reqwest-backed adapters for the association backend and its
//!   auth recipe.
//!
//! Adapters are thin translators between domain types and the backend's JSON
//! envelopes. They contain no business logic.

pub mod api;
