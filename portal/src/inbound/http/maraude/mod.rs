//! Street-outreach back-office.
//!
//! Sessions, the anonymised beneficiaries met during them, and the zone and
//! need-category reference lists. Every screen is admin only and shares the
//! back-office helpers in [`super::admin`].

pub mod beneficiaries;
pub mod reference;
pub mod sessions;
