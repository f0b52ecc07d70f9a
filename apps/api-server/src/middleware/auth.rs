//! Session gate - authentication extractors.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use std::future::{Ready, ready};
use std::sync::Arc;

use ripple_core::domain::SessionIdentity;
use ripple_core::ports::{AuthError, TokenService};
use ripple_shared::ErrorResponse;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated identity extractor - the gate for operations that require
/// a session.
///
/// Use this in handlers that must fail with 401 when no session is
/// attached:
/// ```ignore
/// async fn create_post(identity: Identity) -> impl Responder {
///     format!("posting as {}", identity.0.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub SessionIdentity);

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::SessionExpired => ErrorResponse::unauthorized()
                .with_detail("Your session has expired. Please login again."),
            AuthError::MissingSession => {
                ErrorResponse::unauthorized().with_detail("Please login to continue.")
            }
            AuthError::InvalidToken(_) => {
                ErrorResponse::unauthorized().with_detail("Invalid session.")
            }
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(tokens) = req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() else {
            tracing::error!("TokenService not found in app data");
            return ready(Err(AuthenticationError(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ))));
        };

        let Some(token) = session_token(req) else {
            return ready(Err(AuthenticationError(AuthError::MissingSession)));
        };

        match tokens.validate(&token) {
            Ok(identity) => ready(Ok(Identity(identity))),
            Err(e) => ready(Err(AuthenticationError(e))),
        }
    }
}

/// The session token attached to a request: the session cookie, or an
/// `Authorization: Bearer` header for non-browser clients.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Optional identity extractor - never fails. Page routes use this and
/// present the failure as a redirect to the login page instead of a 401.
pub struct OptionalIdentity(pub Option<SessionIdentity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => ready(Ok(OptionalIdentity(Some(identity.0)))),
            Err(_) => ready(Ok(OptionalIdentity(None))),
        }
    }
}

/// Session cookie set on login.
pub fn session_cookie(token: String, ttl_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(ttl_seconds))
        .finish()
}

/// Expired session cookie set on logout. Removing an absent cookie is a
/// no-op, which keeps logout idempotent.
pub fn session_removal() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use actix_web::{test::TestRequest, web};
    use ripple_infra::{SessionConfig, SessionTokenService};
    use uuid::Uuid;

    use super::*;

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(SessionTokenService::new(SessionConfig {
            secret: "test-secret".to_string(),
            ttl_hours: 1,
            issuer: "test".to_string(),
        }))
    }

    #[actix_web::test]
    async fn request_without_session_is_rejected() {
        let req = TestRequest::default()
            .app_data(web::Data::new(token_service()))
            .to_http_request();

        let result = Identity::from_request(&req, &mut Payload::None).into_inner();

        assert!(matches!(
            result,
            Err(AuthenticationError(AuthError::MissingSession))
        ));
    }

    #[actix_web::test]
    async fn valid_session_cookie_is_accepted() {
        let tokens = token_service();
        let token = tokens
            .issue(&SessionIdentity::new(Uuid::new_v4(), "alice"))
            .unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(tokens))
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_http_request();

        let identity = Identity::from_request(&req, &mut Payload::None)
            .into_inner()
            .unwrap();

        assert_eq!(identity.0.username, "alice");
    }

    #[actix_web::test]
    async fn tampered_token_is_rejected_but_optional_identity_is_not() {
        let req = TestRequest::default()
            .app_data(web::Data::new(token_service()))
            .cookie(Cookie::new(SESSION_COOKIE, "garbage"))
            .to_http_request();

        let gate = Identity::from_request(&req, &mut Payload::None).into_inner();
        let optional = OptionalIdentity::from_request(&req, &mut Payload::None)
            .into_inner()
            .unwrap();

        assert!(gate.is_err());
        assert!(optional.0.is_none());
    }
}
