use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use super::repo::{self, Insurance};
use crate::{error::ApiError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/insurances", get(list_insurances))
}

#[instrument(skip(state))]
pub async fn list_insurances(
    State(state): State<AppState>,
) -> Result<Json<Vec<Insurance>>, ApiError> {
    let rows = repo::list_all(&state.db).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound("no insurances available".into()));
    }
    Ok(Json(rows))
}
