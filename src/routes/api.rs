use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::Product;
use crate::db::products;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::routes::listings::build_listing;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route("/products", get(list_products).post(create_product))
        .route("/products/mine", get(my_products))
        .route("/products/{id}", get(get_product).delete(delete_product))
        .route("/products/{id}/sold", patch(mark_sold))
}

/// Parse a path id. Anything but plain digits is a 400 before the store is
/// touched.
pub(crate) fn parse_id(raw: &str) -> AppResult<i64> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest("Invalid product id".into()));
    }
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid product id".into()))
}

/// Load a product and verify the acting identity owns it. Every mutation
/// goes through here; the client-side gating is advisory only.
fn owned_product(state: &AppState, user: &CurrentUser, id: i64) -> AppResult<Product> {
    let product = products::get(&state.db, id)?.ok_or(AppError::NotFound)?;
    if product.user_id != user.id {
        return Err(AppError::Forbidden);
    }
    Ok(product)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_categories(State(state): State<AppState>) -> AppResult<Response> {
    let categories = crate::db::categories::list(&state.db)?;
    Ok(Json(categories).into_response())
}

#[derive(Deserialize)]
struct ListProductsQuery {
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let category_id = match query.category_id.as_deref() {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::BadRequest("Invalid categoryId".into()))?,
        ),
        None => None,
    };
    let products = products::list(&state.db, category_id)?;
    Ok(Json(products))
}

async fn my_products(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let products = products::list_by_owner(&state.db, user.id)?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id)?;
    let product = products::get(&state.db, id)?.ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub show_email: Option<bool>,
    pub show_whatsapp: Option<bool>,
    pub show_messenger: Option<bool>,
}

async fn create_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Response> {
    let new = build_listing(
        &state,
        payload.category_id,
        payload.title.as_deref(),
        payload.price,
        payload.description,
        payload.location,
        payload.image_url,
        payload.show_email.unwrap_or(true),
        payload.show_whatsapp.unwrap_or(false),
        payload.show_messenger.unwrap_or(false),
    )?;

    let product = products::create(&state.db, user.id, &new)?;
    tracing::info!("User {} created product {}", user.id, product.id);
    Ok((StatusCode::CREATED, Json(product)).into_response())
}

async fn mark_sold(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id)?;
    owned_product(&state, &user, id)?;

    // Idempotent: already-sold listings stay sold
    products::mark_sold(&state.db, id)?;
    let product = products::get(&state.db, id)?.ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    owned_product(&state, &user, id)?;

    products::delete(&state.db, id)?;
    tracing::info!("User {} deleted product {}", user.id, id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_digits() {
        assert_eq!(parse_id("42").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert!(parse_id("abc").is_err());
        assert!(parse_id("12abc").is_err());
        assert!(parse_id("-5").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn parse_id_rejects_overflow() {
        assert!(parse_id("99999999999999999999999999").is_err());
    }
}
