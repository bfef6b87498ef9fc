use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::AppointmentRow;

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: i64,
    pub professional_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PartyRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AppointmentOut {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub reason: Option<String>,
    pub user: PartyRef,
    pub professional: PartyRef,
}

impl From<AppointmentRow> for AppointmentOut {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            scheduled_at: row.scheduled_at,
            reason: row.reason,
            user: PartyRef {
                id: row.user_id,
                name: row.user_name,
            },
            professional: PartyRef {
                id: row.professional_id,
                name: row.professional_name,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentOut>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}
