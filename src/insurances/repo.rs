use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Insurance {
    pub id: i64,
    pub name: String,
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Insurance>> {
    let rows = sqlx::query_as::<_, Insurance>("SELECT id, name FROM insurances ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(rows)
}
