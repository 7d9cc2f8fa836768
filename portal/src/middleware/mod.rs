//! Request middleware.
//!
//! Purpose: request lifecycle concerns that run before any handler, such as
//! trace identifiers and the coarse session-cookie gate.

pub mod session_gate;
pub mod trace;

pub use session_gate::SessionGate;
pub use trace::Trace;
