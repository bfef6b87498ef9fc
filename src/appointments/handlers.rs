use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::{
    dto::{AppointmentListResponse, AppointmentOut, CreateAppointmentRequest},
    repo,
};
use crate::{
    error::ApiError,
    pagination::{total_pages, Pagination},
    professionals, state::AppState, users::repo::User,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments))
        .route("/appointments", post(create_appointment))
        .route("/appointments/:id", get(get_appointment))
}

fn is_in_past(at: OffsetDateTime, now: OffsetDateTime) -> bool {
    at < now
}

/// Two racing bookings can both pass the `slot_taken` pre-check; the loser
/// trips the unique slot constraint and must still come out as a conflict,
/// not a server error.
fn map_create_error(e: anyhow::Error) -> ApiError {
    match e.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
            ApiError::Conflict("the selected time slot is not available".into())
        }
        _ => ApiError::Internal(e),
    }
}

#[instrument(skip(state))]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<AppointmentListResponse>, ApiError> {
    let rows = repo::list(&state.db, p.limit(), p.offset()).await?;
    let total = repo::count(&state.db).await?;
    Ok(Json(AppointmentListResponse {
        appointments: rows.into_iter().map(AppointmentOut::from).collect(),
        total,
        page: p.page,
        total_pages: total_pages(total, p.limit()),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentOut>), ApiError> {
    let user = User::find_by_id(&state.db, payload.user_id).await?;
    let professional_exists =
        professionals::repo::exists(&state.db, payload.professional_id).await?;
    if user.is_none() || !professional_exists {
        return Err(ApiError::NotFound("user or professional not found".into()));
    }

    if is_in_past(payload.scheduled_at, OffsetDateTime::now_utc()) {
        return Err(ApiError::BadRequest(
            "appointment time cannot be in the past".into(),
        ));
    }

    if repo::slot_taken(&state.db, payload.professional_id, payload.scheduled_at).await? {
        warn!(
            professional_id = payload.professional_id,
            "appointment slot already taken"
        );
        return Err(ApiError::Conflict(
            "the selected time slot is not available".into(),
        ));
    }

    let row = repo::create(
        &state.db,
        payload.user_id,
        payload.professional_id,
        payload.scheduled_at,
        payload.reason.as_deref(),
    )
    .await
    .map_err(map_create_error)?;

    info!(appointment_id = row.id, user_id = row.user_id, "appointment booked");
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip(state))]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentOut>, ApiError> {
    let row = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("appointment not found".into()))?;
    Ok(Json(row.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    #[test]
    fn past_times_are_rejected_future_times_pass() {
        let now = datetime!(2030-06-01 10:00:00 UTC);
        assert!(is_in_past(now - Duration::minutes(1), now));
        assert!(is_in_past(now - Duration::days(365), now));
        assert!(!is_in_past(now + Duration::minutes(1), now));
        assert!(!is_in_past(now + Duration::days(30), now));
    }

    #[test]
    fn the_exact_current_instant_is_not_past() {
        let now = datetime!(2030-06-01 10:00:00 UTC);
        assert!(!is_in_past(now, now));
    }

    #[test]
    fn non_database_create_errors_stay_internal() {
        let err = map_create_error(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn plain_sqlx_errors_stay_internal() {
        let err = map_create_error(anyhow::Error::from(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
