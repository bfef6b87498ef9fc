use serde::Deserialize;

/// Query-string pagination shared by the list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Non-positive limits fall back to the default, mirroring the falsy
    /// coercion clients already rely on. Keeps `?limit=0` and `?limit=-5`
    /// from reaching SQL.
    pub fn limit(&self) -> i64 {
        if self.limit <= 0 {
            default_limit()
        } else {
            self.limit
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
