//! Coarse session gate for protected route prefixes.
//!
//! Requests to member or admin routes that carry no session cookie at all
//! cannot be authorised, so they are redirected to the login page before any
//! handler or backend call runs. Cookie presence is never treated as
//! authorisation: handlers still resolve the session through the
//! `MemberSession` and `AdminSession` extractors.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{RouteAccess, login_location};

/// Name of the encrypted session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Middleware redirecting cookie-less requests away from protected routes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use portal::middleware::SessionGate;
///
/// let app = App::new().wrap(SessionGate);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionGate;

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware { service }))
    }
}

/// Service wrapper produced by [`SessionGate`].
pub struct SessionGateMiddleware<S> {
    service: S,
}

fn requested_target(req: &ServiceRequest) -> String {
    match req.query_string() {
        "" => req.path().to_owned(),
        query => format!("{}?{query}", req.path()),
    }
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let protected = RouteAccess::classify(req.path()).is_protected();
        if protected && req.cookie(SESSION_COOKIE).is_none() {
            let location = login_location(&requested_target(&req));
            debug!(path = %req.path(), "no session cookie on protected route");
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;

    async fn gated(
        uri: &str,
        cookie: Option<Cookie<'static>>,
    ) -> ServiceResponse<EitherBody<actix_web::body::BoxBody>> {
        let app = actix_test::init_service(
            App::new()
                .wrap(SessionGate)
                .default_service(web::to(|| async { HttpResponse::Ok().body("contenu") })),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri(uri);
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        actix_test::call_service(&app, request.to_request()).await
    }

    #[rstest]
    #[case("/dashboard/donations?page=2", "/auth/login?redirect=%2Fdashboard%2Fdonations%3Fpage%3D2")]
    #[case("/admin", "/auth/login?redirect=%2Fadmin")]
    #[actix_web::test]
    async fn redirects_cookieless_requests(#[case] uri: &str, #[case] expected: &str) {
        let res = gated(uri, None).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(expected)
        );
    }

    #[rstest]
    #[case("/")]
    #[case("/articles/bilan")]
    #[case("/administration")]
    #[actix_web::test]
    async fn public_routes_pass(#[case] uri: &str) {
        let res = gated(uri, None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn any_cookie_reaches_the_handler() {
        let res = gated("/dashboard", Some(Cookie::new(SESSION_COOKIE, "opaque"))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
