//! Consultation table mapping.

use rusqlite::types::ToSql;
use rusqlite::Row;

use super::repository::Scope;
use super::{ConsultationSort, DbResult, Entity, Repository};
use crate::models::{Consultation, ListViewModel, Pager};

impl Entity for Consultation {
    const TABLE: &'static str = "consultations";
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "consulted_on",
        "complaint",
        "diagnosis_code",
        "treatment_plan",
        "notes",
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["diagnosis_code", "treatment_plan", "complaint"];

    const CREATED_MESSAGE: &'static str = "Consulta adicionada com sucesso";
    const UPDATED_MESSAGE: &'static str = "Consulta alterada com sucesso";
    const DELETED_MESSAGE: &'static str = "Consulta eliminada com sucesso.";
    const NOT_FOUND_MESSAGE: &'static str = "Consulta não existe";

    type Sort = ConsultationSort;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.patient_id,
            &self.consulted_on,
            &self.complaint,
            &self.diagnosis_code,
            &self.treatment_plan,
            &self.notes,
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Consultation {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            consulted_on: row.get(2)?,
            complaint: row.get(3)?,
            diagnosis_code: row.get(4)?,
            treatment_plan: row.get(5)?,
            notes: row.get(6)?,
        })
    }
}

impl Repository<Consultation> {
    /// Consultations of one patient, searched and paged like [`Repository::list`].
    pub fn list_for_patient(
        &self,
        patient_id: i64,
        pager: &Pager,
    ) -> DbResult<ListViewModel<Consultation>> {
        self.list_scoped(
            pager,
            Scope {
                column: "patient_id",
                value: patient_id,
            },
        )
    }
}
