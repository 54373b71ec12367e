//! Typed client for the marketplace REST API.
//!
//! Non-2xx responses are translated into [`ApiError`] values carrying the
//! server's `message` body. The client keeps a cookie store, so a `login`
//! or `register` call authenticates every request that follows.

use serde::{Deserialize, Serialize};

use crate::db::models::{Category, Product};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid product id")]
    InvalidId,

    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_whatsapp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_messenger: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-2xx response to a typed failure, pulling the message out of
    /// the uniform `{ "message": ... }` error body.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());

        Err(match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            code => ApiError::Api {
                status: code,
                message,
            },
        })
    }

    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let response = self.http.get(self.url("/health")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self.http.get(self.url("/categories")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn products(&self, category_id: Option<i64>) -> Result<Vec<Product>, ApiError> {
        let mut request = self.http.get(self.url("/products"));
        if let Some(category_id) = category_id {
            request = request.query(&[("categoryId", category_id)]);
        }
        let response = request.send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn my_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.http.get(self.url("/products/mine")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Fetch one product. A non-numeric id fails locally; no request is
    /// issued.
    pub async fn product(&self, id: &str) -> Result<Product, ApiError> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::InvalidId);
        }
        let response = self
            .http
            .get(self.url(&format!("/products/{}", id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_product(&self, listing: &NewListing) -> Result<Product, ApiError> {
        let response = self
            .http
            .post(self.url("/products"))
            .json(listing)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn mark_sold(&self, id: i64) -> Result<Product, ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("/products/{}/sold", id)))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/products/{}", id)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountInfo, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AccountInfo, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.http.post(self.url("/auth/logout")).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn non_numeric_id_fails_without_a_request() {
        // Base URL points nowhere; the check must short-circuit first
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        for id in ["abc", "12abc", "-5", "", "1.5"] {
            let result = client.product(id).await;
            assert!(matches!(result, Err(ApiError::InvalidId)), "id {id:?}");
        }
    }

    #[test]
    fn new_listing_serializes_camel_case_and_omits_unset() {
        let listing = NewListing {
            category_id: Some(1),
            title: Some("Desk".to_string()),
            price: Some(500.0),
            ..NewListing::default()
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["categoryId"], 1);
        assert_eq!(json["title"], "Desk");
        assert_eq!(json["price"], 500.0);
        assert!(json.get("imageUrl").is_none());
        assert!(json.get("showEmail").is_none());
    }
}
