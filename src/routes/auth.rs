use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // JSON API
        .route("/auth/register", post(handlers::api_register))
        .route("/auth/login", post(handlers::api_login))
        .route("/auth/logout", post(handlers::api_logout))
        // HTML pages
        .route(
            "/login",
            get(handlers::login_page).post(handlers::login_submit),
        )
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register_submit),
        )
        .route("/logout", post(handlers::logout))
}
