use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::db::models::{Category, Product};
use crate::db::{categories, products};
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::state::AppState;

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// One listing card plus what the current viewer may do with it.
pub struct ListingCard {
    pub product: Product,
    pub is_owner: bool,
}

#[derive(Template)]
#[template(path = "pages/browse.html")]
pub struct BrowseTemplate {
    pub nav_user: Option<String>,
    pub categories: Vec<Category>,
    pub selected_category: Option<i64>,
    pub view_mine: bool,
    pub cards: Vec<ListingCard>,
    pub empty_message: &'static str,
}

#[derive(Deserialize)]
pub struct BrowseQuery {
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    pub view: Option<String>,
}

/// Browse page: all listings with an optional category filter, or the
/// current user's own listings. The two dimensions are mutually exclusive;
/// the mine view drops the filter.
pub async fn browse(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Response> {
    let user = maybe_user.0;
    let view_mine = query.view.as_deref() == Some("my");
    let selected_category = if view_mine {
        None
    } else {
        query.category_id.as_deref().and_then(|raw| raw.parse().ok())
    };

    let listings = if view_mine {
        match &user {
            Some(user) => products::list_by_owner(&state.db, user.id)?,
            // Not signed in: the mine view is empty, not an error
            None => Vec::new(),
        }
    } else {
        products::list(&state.db, selected_category)?
    };

    let viewer_id = user.as_ref().map(|u| u.id);
    let cards = listings
        .into_iter()
        .map(|product| ListingCard {
            is_owner: viewer_id == Some(product.user_id),
            product,
        })
        .collect();

    let empty_message = if view_mine {
        "You have not created any products yet."
    } else {
        "No products found for the selected filter."
    };

    Ok(Html(BrowseTemplate {
        nav_user: user.map(|u| u.username),
        categories: categories::list(&state.db)?,
        selected_category,
        view_mine,
        cards,
        empty_message,
    })
    .into_response())
}
