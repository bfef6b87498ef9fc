use serde::{Deserialize, Serialize};

use super::repo::ProfessionalRow;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub insurance_id: Option<i64>,
    #[serde(default)]
    pub uninsured: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InsuranceRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProfessionalOut {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub contact: Option<String>,
    pub accepted_insurances: Vec<InsuranceRef>,
}

impl From<ProfessionalRow> for ProfessionalOut {
    fn from(row: ProfessionalRow) -> Self {
        let accepted_insurances = match (row.insurance_ids, row.insurance_names) {
            (Some(ids), Some(names)) => ids
                .into_iter()
                .zip(names)
                .map(|(id, name)| InsuranceRef { id, name })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            id: row.id,
            name: row.name,
            specialty: row.specialty,
            location: row.location,
            contact: row.contact,
            accepted_insurances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insurances_are_zipped_in_order() {
        let row = ProfessionalRow {
            id: 1,
            name: "Dr. Lopez".into(),
            specialty: "Cardiology".into(),
            location: "Madrid".into(),
            contact: Some("555-0101".into()),
            insurance_ids: Some(vec![3, 7]),
            insurance_names: Some(vec!["Alfa".into(), "Beta".into()]),
        };
        let out: ProfessionalOut = row.into();
        assert_eq!(
            out.accepted_insurances,
            vec![
                InsuranceRef { id: 3, name: "Alfa".into() },
                InsuranceRef { id: 7, name: "Beta".into() },
            ]
        );
    }

    #[test]
    fn no_insurances_yields_empty_list() {
        let row = ProfessionalRow {
            id: 2,
            name: "Dr. Ruiz".into(),
            specialty: "Dermatology".into(),
            location: "Sevilla".into(),
            contact: None,
            insurance_ids: None,
            insurance_names: None,
        };
        let out: ProfessionalOut = row.into();
        assert!(out.accepted_insurances.is_empty());
    }

    #[test]
    fn uninsured_defaults_to_false() {
        let q: SearchQuery = serde_json::from_str(r#"{"specialty": "cardio"}"#).expect("parse");
        assert!(!q.uninsured);
        assert_eq!(q.specialty.as_deref(), Some("cardio"));
    }
}
