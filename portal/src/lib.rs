//! Nouveau Souffle association portal.
//!
//! Server-rendered pages over the association backend: the public site, the
//! member area, the admin back-office and its maraude module.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
