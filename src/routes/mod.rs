pub mod api;
pub mod assets;
pub mod auth;
pub mod home;
pub mod listings;

use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// The full application router: JSON API, HTML pages, static assets, and
/// the uniform 404 fallback for everything unmatched.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::browse))
        .route("/assets/{*path}", get(assets::serve))
        .merge(api::router())
        .merge(auth::router())
        .merge(listings::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
