//! Request handlers.
//!
//! The CRUD handlers are generic over [`Resource`] and registered once per
//! entity; service calls run on the blocking pool because SQLite access is
//! synchronous.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use clinic_core::db::Entity;
use clinic_core::models::DEFAULT_PAGE_SIZE;
use clinic_core::service::{EntityService, Validate};
use clinic_core::{
    Consultation, ListViewModel, Pager, Patient, ResultViewModel, ServiceResult,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// An entity exposed over REST.
pub trait Resource: Entity + Validate + Serialize + DeserializeOwned + Send + 'static {
    fn service(state: &AppState) -> &EntityService<Self>;
}

impl Resource for Patient {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.patients
    }
}

impl Resource for Consultation {
    fn service(state: &AppState) -> &EntityService<Self> {
        &state.consultations
    }
}

/// `?page&pagesize&orderby&searchtext`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub pagesize: Option<i64>,
    pub orderby: Option<String>,
    pub searchtext: Option<String>,
}

impl PageQuery {
    pub fn into_pager(self) -> Pager {
        Pager::new(
            self.page.unwrap_or(1),
            self.pagesize.unwrap_or(DEFAULT_PAGE_SIZE),
            self.orderby.unwrap_or_default(),
            self.searchtext.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}

/// GET /health
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Clinic REST API is alive".into(),
    })
}

/// GET /v1/{entity}/{id}
///
/// A missing row is a `null` body, not an error.
pub async fn get_one<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<E>>, ApiError> {
    let service = E::service(&state).clone();
    let found = run_blocking(move || service.get(id)).await?;
    Ok(Json(found))
}

/// GET /v1/{entity}/all
pub async fn list<E: Resource>(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListViewModel<E>>, ApiError> {
    let service = E::service(&state).clone();
    let pager = query.into_pager();
    let page = run_blocking(move || service.list(&pager)).await?;
    Ok(Json(page))
}

/// POST /v1/{entity}
pub async fn create<E: Resource>(
    State(state): State<AppState>,
    Json(entity): Json<E>,
) -> Result<Json<ResultViewModel<E>>, ApiError> {
    let service = E::service(&state).clone();
    let result = run_blocking(move || service.create(entity)).await?;
    Ok(Json(result))
}

/// PUT /v1/{entity}/{id}
///
/// The id in the path wins over any id in the body.
pub async fn update<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut entity): Json<E>,
) -> Result<Json<ResultViewModel<E>>, ApiError> {
    entity.set_id(id);
    let service = E::service(&state).clone();
    let result = run_blocking(move || service.update(entity)).await?;
    Ok(Json(result))
}

/// DELETE /v1/{entity}/{id}
pub async fn delete<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ResultViewModel<E>>, ApiError> {
    let service = E::service(&state).clone();
    let result = run_blocking(move || service.delete(id)).await?;
    Ok(Json(result))
}

/// GET /v1/consulta/paciente/{id}
pub async fn consultations_of_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListViewModel<Consultation>>, ApiError> {
    let service = state.consultations.clone();
    let pager = query.into_pager();
    let page = run_blocking(move || service.list_for_patient(patient_id, &pager)).await?;
    Ok(Json(page))
}
