//! Equipment record shape and lookup outcome
//!
//! Field names on the wire follow the record store's `epis` table
//! (`nom`, `categorie`, `etat`, `date_peremption`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Value of `etat` for equipment in service
pub const ACTIVE_STATE: &str = "Actif";

/// A piece of personal protective equipment (EPI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,

    #[serde(rename = "nom")]
    pub name: String,

    #[serde(rename = "categorie", default)]
    pub category: Option<String>,

    #[serde(default)]
    pub reference: String,

    #[serde(rename = "fabricant", default)]
    pub manufacturer: Option<String>,

    #[serde(rename = "etat", default)]
    pub state: String,

    #[serde(
        rename = "date_peremption",
        default,
        deserialize_with = "lenient_date"
    )]
    pub expiry_date: Option<NaiveDate>,

    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,

    #[serde(rename = "affectation_courante", default)]
    pub current_assignment: Option<serde_json::Value>,

    #[serde(rename = "code_barre", default)]
    pub barcode: Option<String>,

    #[serde(rename = "localisation", default)]
    pub location: Option<String>,
}

impl Equipment {
    /// `true` when the record's state is `Actif`
    pub fn is_active(&self) -> bool {
        self.state == ACTIVE_STATE
    }

    /// Route of the full record in the detail view
    pub fn detail_route(&self) -> String {
        format!("/epis/{}", self.id)
    }

    /// Expiry date formatted the way the field teams read it (`dd/mm/yyyy`)
    pub fn expiry_label(&self) -> Option<String> {
        self.expiry_date.map(|d| d.format("%d/%m/%Y").to_string())
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d < today)
    }

    /// Human label of the current assignment, if the record carries one.
    ///
    /// The column is free-form JSON: either a plain string or an object with a
    /// name-like field.
    pub fn assignment_label(&self) -> Option<String> {
        match self.current_assignment.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Object(map) => ["nom_complet", "nom", "name", "matricule"]
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .map(str::to_string),
            _ => None,
        }
    }
}

/// Accept `YYYY-MM-DD` as well as timestamps starting with a date.
///
/// An unparseable value is logged and read as no date, so the rest of the
/// record still loads.
fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            tracing::warn!("Ignoring malformed date_peremption {:?}: {}", raw, e);
            Ok(None)
        }
    }
}

/// Result of looking up a decoded code
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A record matched the code
    Found(Box<Equipment>),
    /// No record has this code
    NotFound,
    /// Network or backend failure (message shown to the user)
    Failed(String),
}

impl LookupOutcome {
    pub fn from_result(result: Result<Option<Equipment>>) -> Self {
        match result {
            Ok(Some(equipment)) => LookupOutcome::Found(Box::new(equipment)),
            Ok(None) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::Failed(e.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookupOutcome::Found(_) => "found",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample_json() -> &'static str {
        r#"{
            "id": "b7e2",
            "nom": "Casque F1",
            "categorie": "Tête",
            "reference": "F1XF-2020",
            "fabricant": "MSA Gallet",
            "date_mise_service": "2021-03-01",
            "date_peremption": "2026-01-01",
            "etat": "Actif",
            "localisation": "Caserne Nord",
            "code_barre": "1234567890123",
            "photoUrl": "",
            "affectation_courante": {"nom": "Sgt. Martin", "matricule": "A123"},
            "historique_actions": []
        }"#
    }

    #[test]
    fn test_deserialize_record_row() {
        let eq: Equipment = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(eq.name, "Casque F1");
        assert_eq!(eq.category.as_deref(), Some("Tête"));
        assert_eq!(eq.manufacturer.as_deref(), Some("MSA Gallet"));
        assert_eq!(eq.barcode.as_deref(), Some("1234567890123"));
        assert_eq!(eq.expiry_date, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert!(eq.is_active());
    }

    #[test]
    fn test_expiry_label_format() {
        let eq: Equipment = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(eq.expiry_label().as_deref(), Some("01/01/2026"));
    }

    #[test]
    fn test_timestamp_expiry_is_accepted() {
        let json = r#"{"id":"1","nom":"Gants","date_peremption":"2027-05-04T00:00:00+00:00"}"#;
        let eq: Equipment = serde_json::from_str(json).unwrap();
        assert_eq!(eq.expiry_date, NaiveDate::from_ymd_opt(2027, 5, 4));
    }

    #[test]
    fn test_malformed_expiry_keeps_record() {
        let json = r#"{"id":"9","nom":"Bottes","etat":"Actif","date_peremption":"31/12/2026"}"#;
        let eq: Equipment = serde_json::from_str(json).unwrap();
        assert_eq!(eq.name, "Bottes");
        assert_eq!(eq.expiry_date, None);
        assert_eq!(eq.expiry_label(), None);
        assert!(eq.is_active());
    }

    #[test]
    fn test_missing_optional_fields() {
        let json = r#"{"id":"1","nom":"Gants","date_peremption":null,"categorie":null}"#;
        let eq: Equipment = serde_json::from_str(json).unwrap();
        assert_eq!(eq.expiry_date, None);
        assert_eq!(eq.category, None);
        assert!(!eq.is_active());
        assert_eq!(eq.assignment_label(), None);
    }

    #[test]
    fn test_detail_route() {
        let eq: Equipment = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(eq.detail_route(), "/epis/b7e2");
    }

    #[test]
    fn test_assignment_label_from_object() {
        let eq: Equipment = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(eq.assignment_label().as_deref(), Some("Sgt. Martin"));
    }

    #[test]
    fn test_is_expired() {
        let eq: Equipment = serde_json::from_str(sample_json()).unwrap();
        assert!(eq.is_expired(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()));
        assert!(!eq.is_expired(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(LookupOutcome::from_result(Ok(None)), LookupOutcome::NotFound);
        assert_eq!(
            LookupOutcome::from_result(Err(Error::lookup("timeout"))),
            LookupOutcome::Failed("timeout".to_string())
        );
    }
}
