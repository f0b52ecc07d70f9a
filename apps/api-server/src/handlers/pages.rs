//! Server-rendered page routes.
//!
//! Form routes follow post/redirect/get: a failed submission redirects back
//! with a flash message instead of re-rendering in place.

use std::sync::Arc;

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};

use ripple_core::ports::TokenService;
use ripple_shared::dto::{LoginRequest, PostPayload, RegisterRequest};

use crate::middleware::auth::{self, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::flash::{self, Flash};
use crate::state::AppState;

/// GET / - landing page, or straight to the feed for a live session.
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    if identity.0.is_some() {
        return Ok(redirect("/feed"));
    }

    render(&state, &req, "index.html.tera", tera::Context::new())
}

/// GET /register
pub async fn register_form(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    render(&state, &req, "register.html.tera", tera::Context::new())
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    match state
        .auth
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(username = %user.username, "User registered");
            Ok(redirect_with_flash("/login", Flash::Registered))
        }
        Err(err) => {
            tracing::debug!(error = %err, "Registration rejected");
            Ok(redirect_with_flash("/register", Flash::from_error(&err)))
        }
    }
}

/// GET /login
pub async fn login_form(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    render(&state, &req, "login.html.tera", tera::Context::new())
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    form: web::Form<LoginRequest>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    match state.auth.login(&form.username, &form.password).await {
        Ok(identity) => {
            let token = tokens
                .issue(&identity)
                .map_err(|e| AppError::Internal(e.to_string()))?;

            tracing::info!(username = %identity.username, "User logged in");

            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/feed"))
                .cookie(auth::session_cookie(token, tokens.ttl_seconds()))
                .cookie(Flash::LoggedIn.cookie())
                .finish())
        }
        Err(err) => {
            // One message for both unknown username and wrong password.
            tracing::debug!("Login rejected");
            Ok(redirect_with_flash("/login", Flash::from_error(&err)))
        }
    }
}

/// GET /logout - clears the session unconditionally; idempotent.
pub async fn logout() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(auth::session_removal())
        .cookie(Flash::LoggedOut.cookie())
        .finish()
}

/// GET /feed - the most recent posts, newest first.
pub async fn feed(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let Some(identity) = identity.0 else {
        return Ok(redirect("/login"));
    };

    let items = state.feed.feed(state.feed_page_size).await?;
    let posts: Vec<PostPayload> = items.into_iter().map(PostPayload::from).collect();

    let mut ctx = tera::Context::new();
    ctx.insert("posts", &posts);
    ctx.insert("current_user", &identity.username);
    ctx.insert("realtime_port", &state.realtime_port);

    render(&state, &req, "feed.html.tera", ctx)
}

/// GET /profile/{username} - one author's posts, newest first.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let Some(identity) = identity.0 else {
        return Ok(redirect("/login"));
    };

    let username = path.into_inner();
    let (user, items) = state.feed.posts_by_author(&username).await?;
    let posts: Vec<PostPayload> = items.into_iter().map(PostPayload::from).collect();

    let mut ctx = tera::Context::new();
    ctx.insert("profile_user", &user.username);
    ctx.insert("posts", &posts);
    ctx.insert("current_user", &identity.username);

    render(&state, &req, "profile.html.tera", ctx)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

fn redirect_with_flash(location: &str, flash: Flash) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .cookie(flash.cookie())
        .finish()
}

/// Render a template, folding in (and consuming) any pending flash message.
fn render(
    state: &AppState,
    req: &HttpRequest,
    template: &str,
    mut ctx: tera::Context,
) -> AppResult<HttpResponse> {
    let flash = flash::peek(req);
    if let Some(message) = flash {
        ctx.insert("flash", message);
    }

    let body = state.templates.render(template, &ctx)?;

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());
    if flash.is_some() {
        response.cookie(flash::removal());
    }

    Ok(response.body(body))
}
