//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Biological sex as recorded on the patient chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Sex {
    /// Single-letter code used in storage and JSON.
    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            "O" => Some(Sex::Other),
            _ => None,
        }
    }
}

/// A patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Store-assigned identifier; 0 until inserted
    #[serde(default)]
    pub id: i64,
    /// Full name
    pub name: String,
    pub sex: Sex,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Clinic chart number (prontuário)
    pub record_number: String,
    /// Health insurance plan (convênio)
    #[serde(default)]
    pub insurance_plan: String,
}

impl Patient {
    /// Create a new, not yet persisted patient.
    pub fn new(name: String, sex: Sex, birth_date: NaiveDate, record_number: String) -> Self {
        Self {
            id: 0,
            name,
            sex,
            birth_date,
            record_number,
            insurance_plan: String::new(),
        }
    }

    /// Check if this patient has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let birth = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        let patient = Patient::new("Ana Souza".into(), Sex::Female, birth, "P-001".into());
        assert_eq!(patient.name, "Ana Souza");
        assert_eq!(patient.insurance_plan, "");
        assert!(!patient.is_persisted());
    }

    #[test]
    fn test_sex_codes() {
        for sex in [Sex::Male, Sex::Female, Sex::Other] {
            assert_eq!(Sex::from_code(sex.code()), Some(sex));
        }
        assert_eq!(Sex::from_code("X"), None);
    }

    #[test]
    fn test_deserialize_without_id() {
        let json = r#"{
            "name": "Carlos Lima",
            "sex": "M",
            "birth_date": "1985-01-30",
            "record_number": "P-002"
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.id, 0);
        assert_eq!(patient.sex, Sex::Male);
        assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(1985, 1, 30).unwrap());
    }
}
