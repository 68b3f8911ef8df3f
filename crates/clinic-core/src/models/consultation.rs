//! Consultation models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder treatment plan that front-ends prefill; never a real plan.
pub const PLACEHOLDER_TREATMENT_PLAN: &str = "Exemplo";

/// A consultation (clinical encounter) attached to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    /// Store-assigned identifier; 0 until inserted
    #[serde(default)]
    pub id: i64,
    /// Patient the consultation belongs to
    #[serde(default)]
    pub patient_id: i64,
    /// Date the patient was seen
    pub consulted_on: NaiveDate,
    /// Chief complaint as reported by the patient
    #[serde(default)]
    pub complaint: String,
    /// ICD diagnosis code (CID)
    #[serde(default)]
    pub diagnosis_code: String,
    /// Treatment plan (conduta)
    #[serde(default)]
    pub treatment_plan: String,
    pub notes: Option<String>,
}

impl Consultation {
    /// Create a new, not yet persisted consultation.
    pub fn new(
        patient_id: i64,
        consulted_on: NaiveDate,
        diagnosis_code: String,
        treatment_plan: String,
    ) -> Self {
        Self {
            id: 0,
            patient_id,
            consulted_on,
            complaint: String::new(),
            diagnosis_code,
            treatment_plan,
            notes: None,
        }
    }
}
