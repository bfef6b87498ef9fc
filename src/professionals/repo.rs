use sqlx::{FromRow, PgPool};

/// Professional joined with its accepted insurances. The two arrays are
/// aggregated in the same order, so zipping them pairs id with name.
#[derive(Debug, Clone, FromRow)]
pub struct ProfessionalRow {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub contact: Option<String>,
    pub insurance_ids: Option<Vec<i64>>,
    pub insurance_names: Option<Vec<String>>,
}

/// Optional search filters; text filters are substring matches.
#[derive(Debug, Default)]
pub struct SearchFilters<'a> {
    pub specialty: Option<&'a str>,
    pub location: Option<&'a str>,
    pub name: Option<&'a str>,
    pub insurance_id: Option<i64>,
    pub uninsured: bool,
}

const SELECT_WITH_INSURANCES: &str = r#"
    SELECT p.id, p.name, p.specialty, p.location, p.contact,
           array_agg(s.id ORDER BY s.id) FILTER (WHERE s.id IS NOT NULL) AS insurance_ids,
           array_agg(s.name ORDER BY s.id) FILTER (WHERE s.id IS NOT NULL) AS insurance_names
    FROM professionals p
    LEFT JOIN professional_insurances pi ON pi.professional_id = p.id
    LEFT JOIN insurances s ON s.id = pi.insurance_id
"#;

pub async fn search(db: &PgPool, f: &SearchFilters<'_>) -> anyhow::Result<Vec<ProfessionalRow>> {
    let query = format!(
        r#"
        {SELECT_WITH_INSURANCES}
        WHERE ($1::text IS NULL OR p.specialty ILIKE '%' || $1 || '%')
          AND ($2::text IS NULL OR p.location ILIKE '%' || $2 || '%')
          AND ($3::text IS NULL OR p.name ILIKE '%' || $3 || '%')
          AND ($4::bigint IS NULL OR s.id = $4)
          AND (NOT $5 OR pi.professional_id IS NULL)
        GROUP BY p.id
        ORDER BY p.id
        "#
    );
    let rows = sqlx::query_as::<_, ProfessionalRow>(&query)
        .bind(f.specialty)
        .bind(f.location)
        .bind(f.name)
        .bind(f.insurance_id)
        .bind(f.uninsured)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<ProfessionalRow>> {
    let query = format!(
        r#"
        {SELECT_WITH_INSURANCES}
        WHERE p.id = $1
        GROUP BY p.id
        "#
    );
    let row = sqlx::query_as::<_, ProfessionalRow>(&query)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn exists(db: &PgPool, id: i64) -> anyhow::Result<bool> {
    let found =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM professionals WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await?;
    Ok(found)
}
