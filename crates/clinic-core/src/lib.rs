//! Clinic Core Library
//!
//! Record management for a medical clinic: patients and their consultations,
//! stored in SQLite.
//!
//! # Architecture
//!
//! ```text
//! boundary (HTTP) ──► Service ──► Repository<E> ──► SQLite
//!                       │              │
//!               field rules      Pager → QueryPlan
//!          (all checked before    (allow-listed ORDER BY,
//!              any write)          bound LIMIT/OFFSET/LIKE)
//! ```
//!
//! # Core Principle
//!
//! **No caller text is ever spliced into SQL.** Sort keys resolve through a
//! closed enumeration; search text, limit and offset are bound parameters.
//!
//! # Modules
//!
//! - [`db`]: SQLite connection, schema, generic repository and sort tables
//! - [`models`]: Domain types (Patient, Consultation, Pager, envelopes)
//! - [`service`]: Validate-then-mutate services and the error taxonomy

pub mod db;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use db::{ConsultationSort, Database, DbError, Entity, PatientSort, Repository, SortKey};
pub use models::{Consultation, ListViewModel, Pager, Patient, ResultViewModel, Sex};
pub use service::{ConsultationService, PatientService, ServiceError, ServiceResult};
