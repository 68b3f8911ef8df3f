//! Patient table mapping.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;

use super::{Entity, PatientSort};
use crate::models::{Patient, Sex};

impl ToSql for Sex {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Sex {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        Sex::from_code(code).ok_or_else(|| {
            FromSqlError::Other(format!("Unknown sex code: {}", code).into())
        })
    }
}

impl Entity for Patient {
    const TABLE: &'static str = "patients";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "sex",
        "birth_date",
        "record_number",
        "insurance_plan",
    ];
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "record_number", "insurance_plan"];

    const CREATED_MESSAGE: &'static str = "Paciente adicionado com sucesso";
    const UPDATED_MESSAGE: &'static str = "Paciente alterado com sucesso";
    const DELETED_MESSAGE: &'static str = "Paciente eliminado com sucesso.";
    const NOT_FOUND_MESSAGE: &'static str = "Paciente não existe";

    type Sort = PatientSort;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.name,
            &self.sex,
            &self.birth_date,
            &self.record_number,
            &self.insurance_plan,
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Patient {
            id: row.get(0)?,
            name: row.get(1)?,
            sex: row.get(2)?,
            birth_date: row.get(3)?,
            record_number: row.get(4)?,
            insurance_plan: row.get(5)?,
        })
    }
}
