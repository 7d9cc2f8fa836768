//! Member dashboard.
//!
//! Every handler takes a [`MemberSession`], so the session is validated with
//! the auth gateway before any backend call is made on the member's behalf.

pub mod activities;
pub mod dashboard;
pub mod donations;
pub mod membership;

use super::html::Page;
use super::session::MemberSession;

/// Member-area page with the queued flash message.
pub(crate) fn member_page(member: &MemberSession, title: &str) -> Page {
    Page::new(title)
        .nav(member.nav())
        .banner_opt(member.context().take_flash())
}
