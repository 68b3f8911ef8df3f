//! Declarative field rules checked before every write.

use crate::models::{Consultation, Patient, PLACEHOLDER_TREATMENT_PLAN};

/// One independent field check and the message reported when it fails.
pub struct Rule<E> {
    pub message: &'static str,
    /// Returns `true` when the entity satisfies the rule.
    pub check: fn(&E) -> bool,
}

/// Entities that carry a rule table.
pub trait Validate: Sized + 'static {
    fn rules() -> &'static [Rule<Self>];

    /// Run every rule, collecting the messages of those that fail in
    /// declaration order.
    fn violations(&self) -> Vec<String> {
        Self::rules()
            .iter()
            .filter(|rule| !(rule.check)(self))
            .map(|rule| rule.message.to_string())
            .collect()
    }
}

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

const CONSULTATION_RULES: &[Rule<Consultation>] = &[
    Rule {
        message: "Cid obrigatório",
        check: has_diagnosis_code,
    },
    Rule {
        message: "Conduta inválida",
        check: has_real_treatment_plan,
    },
    Rule {
        message: "Paciente obrigatório",
        check: has_patient,
    },
];

fn has_diagnosis_code(c: &Consultation) -> bool {
    not_blank(&c.diagnosis_code)
}

fn has_real_treatment_plan(c: &Consultation) -> bool {
    c.treatment_plan != PLACEHOLDER_TREATMENT_PLAN
}

fn has_patient(c: &Consultation) -> bool {
    c.patient_id != 0
}

impl Validate for Consultation {
    fn rules() -> &'static [Rule<Self>] {
        CONSULTATION_RULES
    }
}

const PATIENT_RULES: &[Rule<Patient>] = &[
    Rule {
        message: "Nome obrigatório",
        check: has_name,
    },
    Rule {
        message: "Prontuário obrigatório",
        check: has_record_number,
    },
    Rule {
        message: "Data de nascimento inválida",
        check: born_in_the_past,
    },
];

fn has_name(p: &Patient) -> bool {
    not_blank(&p.name)
}

fn has_record_number(p: &Patient) -> bool {
    not_blank(&p.record_number)
}

fn born_in_the_past(p: &Patient) -> bool {
    p.birth_date <= chrono::Utc::now().date_naive()
}

impl Validate for Patient {
    fn rules() -> &'static [Rule<Self>] {
        PATIENT_RULES
    }
}
