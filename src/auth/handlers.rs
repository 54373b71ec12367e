use askama::Template;
use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::session;
use crate::db::models::User;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::extractors::{self, MaybeUser};
use crate::routes::home::Html;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub whatsapp: Option<String>,
    pub messenger: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Create the account and start a session. Returns the user and the
/// Set-Cookie value.
fn register_account(state: &AppState, input: &RegisterInput) -> AppResult<(User, String)> {
    let username = input.username.trim();
    let email = input.email.trim();

    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if users::username_or_email_taken(&state.db, username, email)? {
        return Err(AppError::BadRequest(
            "Username or email is already taken".into(),
        ));
    }

    let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;
    let user = users::create(
        &state.db,
        &users::NewUser {
            username,
            email,
            password_hash: &password_hash,
            whatsapp: input.whatsapp.as_deref().filter(|s| !s.trim().is_empty()),
            messenger: input.messenger.as_deref().filter(|s| !s.trim().is_empty()),
        },
    )?;

    let token = session::create_session(&state.db, user.id, state.config.auth.session_hours)?;
    let cookie = session::session_cookie(
        &state.config.auth.cookie_name,
        &token,
        state.config.auth.session_hours,
    );
    Ok((user, cookie))
}

/// Verify credentials and start a session.
fn login_account(state: &AppState, input: &LoginInput) -> AppResult<(User, String)> {
    let user = users::find_by_username(&state.db, input.username.trim())?
        .ok_or(AppError::Unauthorized)?;

    if !bcrypt::verify(&input.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = session::create_session(&state.db, user.id, state.config.auth.session_hours)?;
    let cookie = session::session_cookie(
        &state.config.auth.cookie_name,
        &token,
        state.config.auth.session_hours,
    );
    Ok((user, cookie))
}

fn end_session(state: &AppState, headers: &HeaderMap) -> AppResult<String> {
    if let Some(token) = extractors::session_token(headers, &state.config.auth.cookie_name) {
        session::delete_session(&state.db, token)?;
    }
    Ok(session::clear_cookie(&state.config.auth.cookie_name))
}

// -- JSON API --

pub async fn api_register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Response> {
    let (user, cookie) = register_account(&state, &input)?;
    tracing::info!("Registered user {}", user.username);
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    )
        .into_response())
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Response> {
    let (user, cookie) = login_account(&state, &input)?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    )
        .into_response())
}

pub async fn api_logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let cookie = end_session(&state, &headers)?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response())
}

// -- HTML pages --

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub nav_user: Option<String>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub nav_user: Option<String>,
    pub error: Option<String>,
}

pub async fn login_page(maybe_user: MaybeUser) -> Response {
    if maybe_user.0.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(LoginTemplate {
        nav_user: None,
        error: None,
    })
    .into_response()
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(input): Form<LoginInput>,
) -> AppResult<Response> {
    match login_account(&state, &input) {
        Ok((_, cookie)) => Ok((
            StatusCode::SEE_OTHER,
            [
                (header::SET_COOKIE, cookie),
                (header::LOCATION, "/".to_string()),
            ],
        )
            .into_response()),
        Err(AppError::Unauthorized) => Ok(Html(LoginTemplate {
            nav_user: None,
            error: Some("Invalid username or password".to_string()),
        })
        .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn register_page(maybe_user: MaybeUser) -> Response {
    if maybe_user.0.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(RegisterTemplate {
        nav_user: None,
        error: None,
    })
    .into_response()
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(input): Form<RegisterInput>,
) -> AppResult<Response> {
    match register_account(&state, &input) {
        Ok((user, cookie)) => {
            tracing::info!("Registered user {}", user.username);
            Ok((
                StatusCode::SEE_OTHER,
                [
                    (header::SET_COOKIE, cookie),
                    (header::LOCATION, "/".to_string()),
                ],
            )
                .into_response())
        }
        Err(AppError::BadRequest(message)) => Ok(Html(RegisterTemplate {
            nav_user: None,
            error: Some(message),
        })
        .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let cookie = end_session(&state, &headers)?;
    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, cookie),
            (header::LOCATION, "/".to_string()),
        ],
    )
        .into_response())
}
