use askama::Template;
use axum::extract::{Form, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use url::Url;

use crate::db::models::{Category, Product, User};
use crate::db::{categories, products, users};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::routes::home::Html;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listings/{id}", get(detail))
        .route("/listings/{id}/sold", post(sold_submit))
        .route("/listings/{id}/delete", post(delete_submit))
        .route("/sell", get(sell_page).post(sell_submit))
}

/// Validate a listing payload and resolve it into store input. Runs before
/// any insert; the same checks back both the JSON API and the sell form.
#[allow(clippy::too_many_arguments)]
pub fn build_listing(
    state: &AppState,
    category_id: Option<i64>,
    title: Option<&str>,
    price: Option<f64>,
    description: Option<String>,
    location: Option<String>,
    image_url: Option<String>,
    show_email: bool,
    show_whatsapp: bool,
    show_messenger: bool,
) -> AppResult<products::NewProduct> {
    let category_id =
        category_id.ok_or_else(|| AppError::BadRequest("Category is required".into()))?;
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Title is required".into()))?;
    let price = price.ok_or_else(|| AppError::BadRequest("Price is required".into()))?;

    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::BadRequest(
            "Price must be a valid positive number".into(),
        ));
    }
    if !categories::exists(&state.db, category_id)? {
        return Err(AppError::BadRequest("Unknown category".into()));
    }

    let image_url = none_if_empty(image_url);
    if let Some(ref raw) = image_url {
        let parsed =
            Url::parse(raw).map_err(|_| AppError::BadRequest("Invalid image URL".into()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::BadRequest("Image URL must be http(s)".into()));
        }
    }

    Ok(products::NewProduct {
        category_id,
        title: title.to_string(),
        description: none_if_empty(description),
        price,
        location: none_if_empty(location),
        image_url,
        show_email,
        show_whatsapp,
        show_messenger,
    })
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Template)]
#[template(path = "pages/error.html")]
pub struct ErrorTemplate {
    pub nav_user: Option<String>,
    pub message: String,
}

fn error_page(status: StatusCode, nav_user: Option<String>, message: &str) -> Response {
    let body = ErrorTemplate {
        nav_user,
        message: message.to_string(),
    };
    match body.render() {
        Ok(html) => (
            status,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "pages/listing_detail.html")]
pub struct DetailTemplate {
    pub nav_user: Option<String>,
    pub product: Product,
    pub seller: User,
    pub is_owner: bool,
}

/// Listing detail page. The id segment is checked against a digits-only
/// pattern before the store is touched.
pub async fn detail(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let nav_user = maybe_user.0.as_ref().map(|u| u.username.clone());

    let id = match crate::routes::api::parse_id(&id) {
        Ok(id) => id,
        Err(_) => {
            return Ok(error_page(
                StatusCode::BAD_REQUEST,
                nav_user,
                "Invalid product id",
            ))
        }
    };

    let Some(product) = products::get(&state.db, id)? else {
        return Ok(error_page(
            StatusCode::NOT_FOUND,
            nav_user,
            "Product not found.",
        ));
    };
    let seller = users::get(&state.db, product.user_id)?
        .ok_or_else(|| AppError::Internal(format!("Listing {} has no seller row", product.id)))?;

    let is_owner = maybe_user.0.as_ref().is_some_and(|u| u.id == product.user_id);

    Ok(Html(DetailTemplate {
        nav_user,
        product,
        seller,
        is_owner,
    })
    .into_response())
}

/// Values echoed back into the sell form when validation fails. Text inputs
/// stay raw strings; checkboxes arrive as "on" or not at all.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SellForm {
    pub category_id: Option<i64>,
    pub title: String,
    pub price: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub show_email: Option<String>,
    pub show_whatsapp: Option<String>,
    pub show_messenger: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/sell.html")]
pub struct SellTemplate {
    pub nav_user: Option<String>,
    pub categories: Vec<Category>,
    pub form: SellForm,
    pub error: Option<String>,
}

pub async fn sell_page(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
) -> AppResult<Response> {
    let Some(user) = maybe_user.0 else {
        return Ok(Redirect::to("/login").into_response());
    };

    Ok(Html(SellTemplate {
        nav_user: Some(user.username),
        categories: categories::list(&state.db)?,
        form: SellForm {
            // The create form defaults to exposing the seller's email
            show_email: Some("on".to_string()),
            ..SellForm::default()
        },
        error: None,
    })
    .into_response())
}

pub async fn sell_submit(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Form(form): Form<SellForm>,
) -> AppResult<Response> {
    let Some(user) = maybe_user.0 else {
        return Ok(Redirect::to("/login").into_response());
    };

    // The price input arrives as text; anything non-numeric fails here, the
    // same pre-submission check the browser-side form performs.
    let price = match form.price.trim() {
        "" => None,
        raw => match raw.parse::<f64>() {
            Ok(price) => Some(price),
            Err(_) => {
                return render_sell_error(
                    &state,
                    user.username,
                    form,
                    "Price must be a valid positive number",
                );
            }
        },
    };

    let new = build_listing(
        &state,
        form.category_id,
        Some(&form.title),
        price,
        Some(form.description.clone()),
        Some(form.location.clone()),
        Some(form.image_url.clone()),
        form.show_email.is_some(),
        form.show_whatsapp.is_some(),
        form.show_messenger.is_some(),
    );

    match new {
        Ok(new) => {
            let product = products::create(&state.db, user.id, &new)?;
            tracing::info!("User {} created product {}", user.id, product.id);
            Ok(Redirect::to(&format!("/listings/{}", product.id)).into_response())
        }
        Err(AppError::BadRequest(message)) => render_sell_error(&state, user.username, form, &message),
        Err(e) => Err(e),
    }
}

fn render_sell_error(
    state: &AppState,
    username: String,
    form: SellForm,
    message: &str,
) -> AppResult<Response> {
    Ok(Html(SellTemplate {
        nav_user: Some(username),
        categories: categories::list(&state.db)?,
        form,
        error: Some(message.to_string()),
    })
    .into_response())
}

/// Owner guard shared by the page mutations. Loads the row and compares
/// against the session principal, never a form field.
fn owned(state: &AppState, user: &CurrentUser, raw_id: &str) -> AppResult<Product> {
    let id = crate::routes::api::parse_id(raw_id)?;
    let product = products::get(&state.db, id)?.ok_or(AppError::NotFound)?;
    if product.user_id != user.id {
        return Err(AppError::Forbidden);
    }
    Ok(product)
}

pub async fn sold_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let product = owned(&state, &user, &id)?;
    products::mark_sold(&state.db, product.id)?;
    Ok(Redirect::to(&format!("/listings/{}", product.id)).into_response())
}

pub async fn delete_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let product = owned(&state, &user, &id)?;
    products::delete(&state.db, product.id)?;
    tracing::info!("User {} deleted product {}", user.id, product.id);
    Ok(Redirect::to("/").into_response())
}
