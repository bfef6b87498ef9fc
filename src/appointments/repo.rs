use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Appointment joined with the names of both parties.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRow {
    pub id: i64,
    pub scheduled_at: OffsetDateTime,
    pub reason: Option<String>,
    pub user_id: i64,
    pub user_name: String,
    pub professional_id: i64,
    pub professional_name: String,
}

const SELECT_JOINED: &str = r#"
    SELECT a.id, a.scheduled_at, a.reason,
           a.user_id, u.name AS user_name,
           a.professional_id, p.name AS professional_name
    FROM appointments a
    INNER JOIN users u ON u.id = a.user_id
    INNER JOIN professionals p ON p.id = a.professional_id
"#;

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<AppointmentRow>> {
    let query = format!(
        r#"
        {SELECT_JOINED}
        ORDER BY a.scheduled_at DESC
        LIMIT $1 OFFSET $2
        "#
    );
    let rows = sqlx::query_as::<_, AppointmentRow>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM appointments")
        .fetch_one(db)
        .await?;
    Ok(total)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<AppointmentRow>> {
    let query = format!(
        r#"
        {SELECT_JOINED}
        WHERE a.id = $1
        "#
    );
    let row = sqlx::query_as::<_, AppointmentRow>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// A professional can hold only one appointment per instant.
pub async fn slot_taken(
    db: &PgPool,
    professional_id: i64,
    scheduled_at: OffsetDateTime,
) -> anyhow::Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM appointments WHERE professional_id = $1 AND scheduled_at = $2)",
    )
    .bind(professional_id)
    .bind(scheduled_at)
    .fetch_one(db)
    .await?;
    Ok(taken)
}

pub async fn create(
    db: &PgPool,
    user_id: i64,
    professional_id: i64,
    scheduled_at: OffsetDateTime,
    reason: Option<&str>,
) -> anyhow::Result<AppointmentRow> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO appointments (user_id, professional_id, scheduled_at, reason)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(professional_id)
    .bind(scheduled_at)
    .bind(reason)
    .fetch_one(db)
    .await?;

    let row = find_by_id(db, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("appointment {id} vanished after insert"))?;
    Ok(row)
}
