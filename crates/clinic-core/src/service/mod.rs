//! Validate-then-mutate services over the repositories.
//!
//! Creates and updates run every field rule first; the repository is only
//! reached when no rule fails. Reads and deletes pass straight through.

mod rules;

pub use rules::*;

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::db::{Database, DbError, Entity, Repository};
use crate::models::{Consultation, ListViewModel, Pager, Patient, ResultViewModel};

/// Errors surfaced to the boundary layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// One or more field rules failed; nothing was written.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Update or delete targeted a row that does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    /// Caller-visible messages, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ServiceError::Validation(messages) => messages.clone(),
            ServiceError::NotFound(message) | ServiceError::Storage(message) => {
                vec![message.clone()]
            }
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(message) => ServiceError::NotFound(message),
            DbError::Storage(message) => ServiceError::Storage(message),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service for one entity type.
pub struct EntityService<E> {
    repository: Repository<E>,
}

impl<E> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

pub type PatientService = EntityService<Patient>;
pub type ConsultationService = EntityService<Consultation>;

impl<E: Entity + Validate> EntityService<E> {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repository: Repository::new(db),
        }
    }

    pub fn get(&self, id: i64) -> ServiceResult<Option<E>> {
        Ok(self.repository.get_by_id(id)?)
    }

    pub fn list(&self, pager: &Pager) -> ServiceResult<ListViewModel<E>> {
        Ok(self.repository.list(pager)?)
    }

    pub fn create(&self, entity: E) -> ServiceResult<ResultViewModel<E>> {
        Self::validate(&entity)?;
        Ok(self.repository.create(entity)?)
    }

    pub fn update(&self, entity: E) -> ServiceResult<ResultViewModel<E>> {
        Self::validate(&entity)?;
        Ok(self.repository.update(entity)?)
    }

    pub fn delete(&self, id: i64) -> ServiceResult<ResultViewModel<E>> {
        Ok(self.repository.delete(id)?)
    }

    fn validate(entity: &E) -> ServiceResult<()> {
        let violations = entity.violations();
        if violations.is_empty() {
            return Ok(());
        }
        warn!(table = E::TABLE, ?violations, "rejected invalid record");
        Err(ServiceError::Validation(violations))
    }
}

impl ConsultationService {
    pub fn list_for_patient(
        &self,
        patient_id: i64,
        pager: &Pager,
    ) -> ServiceResult<ListViewModel<Consultation>> {
        Ok(self.repository.list_for_patient(patient_id, pager)?)
    }
}
