use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ProfessionalOut, SearchQuery},
    repo::{self, SearchFilters},
};
use crate::{error::ApiError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/professionals", get(search_professionals))
        .route("/professionals/:id", get(get_professional))
}

#[instrument(skip(state))]
pub async fn search_professionals(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<ProfessionalOut>>, ApiError> {
    let filters = SearchFilters {
        specialty: q.specialty.as_deref(),
        location: q.location.as_deref(),
        name: q.name.as_deref(),
        insurance_id: q.insurance_id,
        uninsured: q.uninsured,
    };
    let rows = repo::search(&state.db, &filters).await?;

    // An empty result set is a 404, matching the historical behavior clients
    // depend on.
    if rows.is_empty() {
        return Err(ApiError::NotFound("no professionals found".into()));
    }

    Ok(Json(rows.into_iter().map(ProfessionalOut::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_professional(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProfessionalOut>, ApiError> {
    let row = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("professional not found".into()))?;
    Ok(Json(row.into()))
}
