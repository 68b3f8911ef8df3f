//! Generic paginated repository.
//!
//! One implementation serves every table: an [`Entity`] describes its table,
//! columns, searchable columns, sort table and messages, and
//! [`Repository<E>`] runs the statements.

use std::marker::PhantomData;
use std::sync::Arc;

use rusqlite::types::{ToSql, Value};
use rusqlite::{OptionalExtension, Row};
use tracing::{debug, error, info, warn};

use super::{Database, DbError, DbResult, QueryPlan, SortKey, LIKE_ESCAPE};
use crate::models::{ListViewModel, Pager, ResultViewModel};

/// A table-backed record with a store-assigned integer `id`.
pub trait Entity: Sized {
    const TABLE: &'static str;
    /// Mutable columns in binding order. `id` is implicit and always first
    /// when selecting.
    const COLUMNS: &'static [&'static str];
    /// Text columns matched against the search text.
    const SEARCH_COLUMNS: &'static [&'static str];

    const CREATED_MESSAGE: &'static str;
    const UPDATED_MESSAGE: &'static str;
    const DELETED_MESSAGE: &'static str;
    const NOT_FOUND_MESSAGE: &'static str;

    type Sort: SortKey;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    /// Values for [`Entity::COLUMNS`], same order.
    fn to_params(&self) -> Vec<&dyn ToSql>;

    /// Map a row selected as `id, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Extra equality predicate narrowing a listing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope {
    pub column: &'static str,
    pub value: i64,
}

/// Shared WHERE clause for a count query and its page query.
#[derive(Debug, Clone)]
struct Filter {
    clause: String,
    values: Vec<Value>,
}

impl Filter {
    fn new<E: Entity>(pattern: String, scope: Option<Scope>) -> Self {
        let search = E::SEARCH_COLUMNS
            .iter()
            .map(|column| format!("{} LIKE ?1 ESCAPE '{}'", column, LIKE_ESCAPE))
            .collect::<Vec<_>>()
            .join(" OR ");

        let mut clause = format!("WHERE ({})", search);
        let mut values = vec![Value::Text(pattern)];

        if let Some(scope) = scope {
            clause.push_str(&format!(" AND {} = ?2", scope.column));
            values.push(Value::Integer(scope.value));
        }

        Self { clause, values }
    }
}

fn select_columns<E: Entity>() -> String {
    std::iter::once("id")
        .chain(E::COLUMNS.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

fn count_sql<E: Entity>(filter: &Filter) -> String {
    format!("SELECT COUNT(*) FROM {} {}", E::TABLE, filter.clause)
}

fn page_sql<E: Entity>(filter: &Filter, order: &str) -> String {
    let limit_index = filter.values.len() + 1;
    format!(
        "SELECT {} FROM {} {} ORDER BY {}, id ASC LIMIT ?{} OFFSET ?{}",
        select_columns::<E>(),
        E::TABLE,
        filter.clause,
        order,
        limit_index,
        limit_index + 1
    )
}

fn insert_sql<E: Entity>() -> String {
    let placeholders = (1..=E::COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::TABLE,
        E::COLUMNS.join(", "),
        placeholders
    )
}

fn update_sql<E: Entity>() -> String {
    let assignments = E::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {}, updated_at = datetime('now') WHERE id = ?{}",
        E::TABLE,
        assignments,
        E::COLUMNS.len() + 1
    )
}

/// Log a failed operation once, at the repository boundary.
fn logged<T>(table: &'static str, op: &'static str, result: DbResult<T>) -> DbResult<T> {
    match &result {
        Err(DbError::Storage(message)) => error!(table, op, %message, "storage failure"),
        Err(DbError::NotFound(message)) => warn!(table, op, %message, "row not found"),
        Ok(_) => {}
    }
    result
}

/// CRUD and paginated search over one entity's table.
pub struct Repository<E> {
    db: Arc<Database>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Get a row by id; `None` when it does not exist.
    pub fn get_by_id(&self, id: i64) -> DbResult<Option<E>> {
        let result = self.db.connection().and_then(|conn| {
            let sql = format!(
                "SELECT {} FROM {} WHERE id = ?1",
                select_columns::<E>(),
                E::TABLE
            );
            conn.query_row(&sql, [id], E::from_row)
                .optional()
                .map_err(Into::into)
        });
        logged(E::TABLE, "get_by_id", result)
    }

    /// One page of rows matching the pager's search text, plus the total.
    pub fn list(&self, pager: &Pager) -> DbResult<ListViewModel<E>> {
        logged(E::TABLE, "list", self.list_filtered(pager, None))
    }

    pub(crate) fn list_scoped(&self, pager: &Pager, scope: Scope) -> DbResult<ListViewModel<E>> {
        logged(E::TABLE, "list", self.list_filtered(pager, Some(scope)))
    }

    fn list_filtered(&self, pager: &Pager, scope: Option<Scope>) -> DbResult<ListViewModel<E>> {
        let plan = QueryPlan::new::<E::Sort>(pager);
        let filter = Filter::new::<E>(plan.pattern.clone(), scope);
        let count_query = count_sql::<E>(&filter);
        let page_query = page_sql::<E>(&filter, plan.order);

        debug!(
            table = E::TABLE,
            order = plan.order,
            limit = plan.limit,
            offset = plan.offset,
            "running page query"
        );

        let mut conn = self.db.connection()?;
        // Count and page read the same snapshot.
        let tx = conn.transaction()?;

        let count: i64 = tx.query_row(
            &count_query,
            rusqlite::params_from_iter(filter.values.iter()),
            |row| row.get(0),
        )?;

        let items = {
            let mut page_values = filter.values.clone();
            page_values.push(Value::Integer(plan.limit));
            page_values.push(Value::Integer(plan.offset));

            let mut stmt = tx.prepare(&page_query)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(page_values.iter()), E::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        tx.commit()?;
        Ok(ListViewModel { count, items })
    }

    /// Insert a new row; the returned entity carries the assigned id.
    pub fn create(&self, mut entity: E) -> DbResult<ResultViewModel<E>> {
        let result = self.db.connection().and_then(|conn| {
            conn.execute(&insert_sql::<E>(), entity.to_params().as_slice())?;
            Ok(conn.last_insert_rowid())
        });
        let id = logged(E::TABLE, "create", result)?;

        entity.set_id(id);
        info!(table = E::TABLE, id, "row created");
        Ok(ResultViewModel::success(E::CREATED_MESSAGE, Some(entity)))
    }

    /// Overwrite every mutable column of an existing row.
    ///
    /// Existence check and write are a single conditional statement, so a
    /// concurrent delete cannot slip in between them.
    pub fn update(&self, entity: E) -> DbResult<ResultViewModel<E>> {
        let id = entity.id();
        let result = self.db.connection().and_then(|conn| {
            let mut params = entity.to_params();
            params.push(&id);
            let rows_affected = conn.execute(&update_sql::<E>(), params.as_slice())?;
            if rows_affected == 0 {
                return Err(DbError::NotFound(E::NOT_FOUND_MESSAGE.to_string()));
            }
            Ok(())
        });
        logged(E::TABLE, "update", result)?;

        info!(table = E::TABLE, id, "row updated");
        Ok(ResultViewModel::success(E::UPDATED_MESSAGE, Some(entity)))
    }

    /// Delete an existing row.
    pub fn delete(&self, id: i64) -> DbResult<ResultViewModel<E>> {
        let result = self.db.connection().and_then(|conn| {
            let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
            let rows_affected = conn.execute(&sql, [id])?;
            if rows_affected == 0 {
                return Err(DbError::NotFound(E::NOT_FOUND_MESSAGE.to_string()));
            }
            Ok(())
        });
        logged(E::TABLE, "delete", result)?;

        info!(table = E::TABLE, id, "row deleted");
        Ok(ResultViewModel::success(E::DELETED_MESSAGE, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Patient, Sex};
    use chrono::NaiveDate;

    fn setup() -> Repository<Patient> {
        Repository::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn patient(name: &str, record: &str, plan: &str) -> Patient {
        let mut patient = Patient::new(
            name.into(),
            Sex::Female,
            NaiveDate::from_ymd_opt(1980, 6, 15).unwrap(),
            record.into(),
        );
        patient.insurance_plan = plan.into();
        patient
    }

    #[test]
    fn test_generated_sql() {
        assert_eq!(
            insert_sql::<Patient>(),
            "INSERT INTO patients (name, sex, birth_date, record_number, insurance_plan) \
             VALUES (?1, ?2, ?3, ?4, ?5)"
        );
        assert_eq!(
            update_sql::<Patient>(),
            "UPDATE patients SET name = ?1, sex = ?2, birth_date = ?3, record_number = ?4, \
             insurance_plan = ?5, updated_at = datetime('now') WHERE id = ?6"
        );
    }

    #[test]
    fn test_count_and_page_share_where_clause() {
        let filter = Filter::new::<Patient>("%x%".into(), None);
        let count = count_sql::<Patient>(&filter);
        let page = page_sql::<Patient>(&filter, "name ASC");

        assert!(count.ends_with(&filter.clause));
        assert!(page.contains(&filter.clause));
        assert!(page.ends_with("ORDER BY name ASC, id ASC LIMIT ?2 OFFSET ?3"));
    }

    #[test]
    fn test_scoped_filter_binds_scope_value() {
        let filter = Filter::new::<Patient>(
            "%%".into(),
            Some(Scope {
                column: "sex",
                value: 7,
            }),
        );
        assert!(filter.clause.ends_with("AND sex = ?2"));
        assert_eq!(filter.values.len(), 2);
        assert!(page_sql::<Patient>(&filter, "id DESC").ends_with("LIMIT ?3 OFFSET ?4"));
    }

    #[test]
    fn test_create_assigns_id() {
        let repo = setup();
        let result = repo.create(patient("Ana", "P-1", "")).unwrap();
        assert!(result.success);
        assert_eq!(result.message, "Paciente adicionado com sucesso");
        let created = result.data.unwrap();
        assert!(created.id > 0);

        let stored = repo.get_by_id(created.id).unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[test]
    fn test_get_missing_is_none() {
        let repo = setup();
        assert_eq!(repo.get_by_id(999).unwrap(), None);
    }

    #[test]
    fn test_update_and_delete_missing_are_not_found() {
        let repo = setup();
        let mut ghost = patient("Ghost", "P-0", "");
        ghost.id = 12345;

        let err = repo.update(ghost).unwrap_err();
        assert_eq!(err, DbError::NotFound("Paciente não existe".into()));

        let err = repo.delete(12345).unwrap_err();
        assert_eq!(err, DbError::NotFound("Paciente não existe".into()));
    }

    #[test]
    fn test_update_overwrites_row() {
        let repo = setup();
        let mut created = repo.create(patient("Ana", "P-1", "")).unwrap().data.unwrap();

        created.name = "Ana Maria".into();
        created.insurance_plan = "Unimed".into();
        let result = repo.update(created.clone()).unwrap();
        assert_eq!(result.message, "Paciente alterado com sucesso");

        assert_eq!(repo.get_by_id(created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_delete_removes_row() {
        let repo = setup();
        let created = repo.create(patient("Ana", "P-1", "")).unwrap().data.unwrap();

        let result = repo.delete(created.id).unwrap();
        assert!(result.success);
        assert_eq!(result.data, None);
        assert_eq!(repo.get_by_id(created.id).unwrap(), None);
    }

    #[test]
    fn test_list_search_and_order() {
        let repo = setup();
        repo.create(patient("Bruno Silva", "P-1", "Unimed")).unwrap();
        repo.create(patient("Ana Costa", "P-2", "Amil")).unwrap();
        repo.create(patient("Carla Silva", "P-3", "")).unwrap();

        let page = repo.list(&Pager::new(1, 10, "nome asc", "silva")).unwrap();
        assert_eq!(page.count, 2);
        let names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno Silva", "Carla Silva"]);

        // Insurance plan is searchable too.
        let page = repo.list(&Pager::new(1, 10, "", "amil")).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].name, "Ana Costa");
    }

    #[test]
    fn test_list_default_order_is_newest_first() {
        let repo = setup();
        let first = repo.create(patient("A", "P-1", "")).unwrap().data.unwrap();
        let second = repo.create(patient("B", "P-2", "")).unwrap().data.unwrap();

        let page = repo.list(&Pager::new(1, 10, "whatever", "")).unwrap();
        assert_eq!(page.items[0].id, second.id);
        assert_eq!(page.items[1].id, first.id);
    }

    #[test]
    fn test_list_past_last_page_is_empty() {
        let repo = setup();
        repo.create(patient("A", "P-1", "")).unwrap();

        let page = repo.list(&Pager::new(5, 10, "", "")).unwrap();
        assert_eq!(page.count, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let repo = setup();
        repo.create(patient("Ana", "P_1", "")).unwrap();
        repo.create(patient("Bia", "PX1", "")).unwrap();

        let page = repo.list(&Pager::new(1, 10, "", "P_1")).unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].name, "Ana");

        let page = repo.list(&Pager::new(1, 10, "", "%")).unwrap();
        assert_eq!(page.count, 0);
    }

    #[test]
    fn test_injection_text_is_just_data() {
        let repo = setup();
        repo.create(patient("Ana", "P-1", "")).unwrap();

        let page = repo
            .list(&Pager::new(1, 10, "id; DROP TABLE patients;--", "' OR 1=1 --"))
            .unwrap();
        assert_eq!(page.count, 0);
        assert_eq!(repo.list(&Pager::default()).unwrap().count, 1);
    }

    #[test]
    fn test_constraint_violation_is_storage_error() {
        let repo = setup();
        repo.create(patient("Ana", "P-1", "")).unwrap();

        let err = repo.create(patient("Bia", "P-1", "")).unwrap_err();
        assert!(matches!(err, DbError::Storage(msg) if msg.contains("UNIQUE")));
    }
}
