//! Domain primitives and ports.
//!
//! Purpose: type the backend resources the portal displays, and hold the
//! transport-agnostic policies every screen shares (route protection, list
//! state, money, content rendering). Nothing in here knows about Actix or
//! reqwest.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload and its category.
//! - RouteAccess / GuardDecision: route protection policy.
//! - ListController / ViewState: list view state machine.
//! - Amount: euro amounts and the tax-deduction estimate.
//! - render_markup: article body renderer.

pub mod auth;
pub mod content;
pub mod error;
pub mod guard;
pub mod listing;
pub mod models;
pub mod money;
pub mod ports;
pub mod trace_id;
pub mod view_state;

pub use self::auth::{
    ADMIN_ROLES, AccessToken, Credentials, CredentialsValidationError, LoginCredentials,
    Registration, Role, SessionPayload, SignedIn,
};
pub use self::content::{escape_html, plain_summary, render_markup};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::guard::{
    ADMIN_PREFIX, DASHBOARD_PATH, GuardDecision, LOGIN_PATH, REDIRECT_PARAM, RouteAccess,
    login_location, sanitize_return_path,
};
pub use self::listing::{
    ListController, ListFilters, ListQuery, RequestSequencer, Ticket, non_blank, push_filter,
};
pub use self::money::{Amount, AmountError, TAX_DEDUCTION_RATE};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::view_state::ViewState;

/// Convenient handler result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
