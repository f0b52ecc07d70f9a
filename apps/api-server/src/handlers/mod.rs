//! HTTP handlers and route configuration.

mod health;
mod pages;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::index))
        .service(
            web::resource("/register")
                .route(web::get().to(pages::register_form))
                .route(web::post().to(pages::register)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(pages::login_form))
                .route(web::post().to(pages::login)),
        )
        .route("/logout", web::get().to(pages::logout))
        .route("/feed", web::get().to(pages::feed))
        .route("/profile/{username}", web::get().to(pages::profile))
        .route("/create_post", web::post().to(posts::create_post))
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)));
}
