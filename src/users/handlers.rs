use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::{MessageResponse, RegisterRequest, UpdateUserRequest, UserListResponse, UserOut},
    repo::User,
};
use crate::{
    auth::password::hash_password,
    error::ApiError,
    pagination::{total_pages, Pagination},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(register))
        .route("/users/:id", get(get_user))
        .route("/users/:id", patch(update_user))
        .route("/users/:id", delete(delete_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = User::list(&state.db, p.limit(), p.offset()).await?;
    let total = User::count(&state.db).await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserOut::from).collect(),
        total,
        page: p.page,
        total_pages: total_pages(total, p.limit()),
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "name, email and password are required".into(),
        ));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::BadRequest("email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &hash,
        payload.phone.as_deref(),
    )
    .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserOut>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserOut>, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".into()));
    }

    if let Some(email) = &payload.email {
        if !is_valid_email(email) {
            return Err(ApiError::BadRequest("invalid email".into()));
        }
    }

    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("user not found".into()));
    }

    let user = User::update(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.phone.as_ref().map(|p| p.as_deref()),
    )
    .await?;

    info!(user_id = user.id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("user not found".into()));
    }
    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse {
        message: "account deleted".into(),
    }))
}
