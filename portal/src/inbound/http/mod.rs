//! HTTP inbound adapter rendering the portal's pages.
//!
//! Handlers are grouped by area: the public site, the auth screens, the
//! member dashboard, the admin back-office and its maraude module. All of
//! them render server-side HTML and depend on domain ports only.

pub mod admin;
pub mod auth;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod html;
pub mod listing;
pub mod maraude;
pub mod member;
pub mod public;
pub mod report;
pub mod routes;
pub mod seo;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;
